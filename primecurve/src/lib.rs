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

pub mod field;

#[cfg(feature = "dev")]
pub mod dev;

mod affine;
mod arithmetic;
mod curve;
mod error;
mod lookup_table;
mod memo;
mod mul;
mod params;
mod sec1;

pub use crate::{
    affine::AffinePoint,
    curve::Curve,
    error::{Error, Result},
    memo::Memo,
    mul::Multiplier,
    params::CurveParams,
};
pub use num_bigint::{self, BigUint};
pub use subtle;
