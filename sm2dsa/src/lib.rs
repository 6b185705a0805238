#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

pub mod analysis;
pub mod dsa;
pub mod params;

#[cfg(feature = "hazmat")]
pub mod hazmat;

mod distid;
mod error;
mod keys;

pub use crate::{
    distid::{DEFAULT_DISTID, DistId, IdentityDigest},
    dsa::{Signature, Sm2Dsa},
    error::{Error, Result},
    keys::{KeyPair, PublicKey, SecretKey, random_scalar},
};
pub use digest;
pub use primecurve::{self, AffinePoint, BigUint, Curve, CurveParams};
pub use rand_core;
pub use signature;
pub use sm3;

#[cfg(feature = "sha2")]
pub use sha2;
