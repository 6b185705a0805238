//! SM2 Digital Signature Algorithm (SM2DSA) as defined in [draft-shen-sm2-ecdsa § 5].
//!
//! ## Usage
//!
//! NOTE: requires the `getrandom` crate feature enabled (on by default).
//!
#![cfg_attr(feature = "getrandom", doc = "```")]
#![cfg_attr(not(feature = "getrandom"), doc = "```ignore")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use rand_core::OsRng; // requires 'getrandom` feature
//! use sm2dsa::{
//!     dsa::{Signature, SigningKey, signature::Signer},
//!     params::sm2p256,
//!     SecretKey,
//! };
//!
//! // Signing
//! let curve = sm2p256();
//! let secret_key = SecretKey::random(&curve, &mut OsRng)?; // serialize with `::to_bytes()`
//! let distid = b"example@rustcrypto.org"; // distinguishing identifier
//! let signing_key: SigningKey = SigningKey::new(distid, &secret_key)?;
//! let verifying_key_bytes = signing_key.verifying_key().to_sec1_bytes(false)?;
//! let message = b"test message";
//! let signature: Signature = signing_key.sign(message);
//!
//! // Verifying
//! use sm2dsa::dsa::{VerifyingKey, signature::Verifier};
//!
//! let verifying_key: VerifyingKey = VerifyingKey::from_sec1_bytes(&curve, distid, &verifying_key_bytes)?;
//! verifying_key.verify(message, &signature)?;
//! # Ok(())
//! # }
//! ```
//!
//! The functional [`Sm2Dsa`] engine offers the same operations without
//! binding keys to an identifier up front.
//!
//! [draft-shen-sm2-ecdsa § 5]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5

#[cfg(feature = "der")]
mod der;
mod engine;
pub(crate) mod signing;
pub(crate) mod verifying;

pub use signature;

pub use self::{engine::Sm2Dsa, signing::SigningKey, verifying::VerifyingKey};

use crate::{Error, Result};
use core::fmt::{self, Debug};
use num_traits::Zero;
use primecurve::{BigUint, Curve};
use signature::SignatureEncoding;

/// SM2DSA signature.
///
/// Serialized as `r ‖ s`, each component big endian and left-padded to the
/// scalar width of its curve (`max(⌈bits(p) / 8⌉, ⌈bits(n) / 8⌉)`).
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
    width: usize,
}

impl Signature {
    /// Create a signature from its scalars, checking `r, s ∈ [1, n - 1]`.
    pub fn from_scalars(curve: &Curve, r: BigUint, s: BigUint) -> Result<Self> {
        let n = curve.order();
        if r.is_zero() || s.is_zero() || r >= *n || s >= *n {
            return Err(Error::Encoding);
        }

        Ok(Self {
            r,
            s,
            width: curve.scalar_bytes(),
        })
    }

    /// Parse a signature for `curve`, range checking both scalars.
    pub fn from_bytes(curve: &Curve, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 2 * curve.scalar_bytes() {
            return Err(Error::Encoding);
        }

        let (r, s) = bytes.split_at(curve.scalar_bytes());
        Self::from_scalars(curve, BigUint::from_bytes_be(r), BigUint::from_bytes_be(s))
    }

    /// Parse a signature without reference to a curve.
    ///
    /// The width is taken to be half the input length. Both scalars must be
    /// non-zero; the range check against `n` happens at verification time.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % 2 != 0 {
            return Err(Error::Encoding);
        }

        let width = bytes.len() / 2;
        let (r, s) = bytes.split_at(width);
        let (r, s) = (BigUint::from_bytes_be(r), BigUint::from_bytes_be(s));

        if r.is_zero() || s.is_zero() {
            return Err(Error::Encoding);
        }

        Ok(Self { r, s, width })
    }

    /// Serialize this signature as bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ret = vec![0; 2 * self.width];
        let (r_bytes, s_bytes) = ret.split_at_mut(self.width);
        write_padded(r_bytes, &self.r);
        write_padded(s_bytes, &self.s);
        ret
    }

    /// Get the `r` component of this signature
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Get the `s` component of this signature
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Split the signature into its `r` and `s` scalars.
    pub fn split_scalars(&self) -> (&BigUint, &BigUint) {
        (&self.r, &self.s)
    }

    /// Width of each serialized component in bytes.
    pub fn component_width(&self) -> usize {
        self.width
    }
}

/// Left-pad `value` into `dst`. Constructors guarantee that it fits.
fn write_padded(dst: &mut [u8], value: &BigUint) {
    let bytes = value.to_bytes_be();
    let len = bytes.len().min(dst.len());
    let start = dst.len() - len;
    dst[start..].copy_from_slice(&bytes[bytes.len() - len..]);
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sm2dsa::dsa::Signature(")?;

        for byte in self.to_bytes() {
            write!(f, "{byte:02X}")?;
        }

        write!(f, ")")
    }
}

impl From<Signature> for Vec<u8> {
    fn from(signature: Signature) -> Vec<u8> {
        signature.to_bytes()
    }
}

impl From<&Signature> for Vec<u8> {
    fn from(signature: &Signature) -> Vec<u8> {
        signature.to_bytes()
    }
}

impl SignatureEncoding for Signature {
    type Repr = Vec<u8>;

    fn to_bytes(&self) -> Self::Repr {
        self.into()
    }

    fn encoded_len(&self) -> usize {
        2 * self.width
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = signature::Error;

    fn try_from(bytes: &[u8]) -> signature::Result<Signature> {
        Ok(Signature::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::Signature;
    use crate::Error;
    use primecurve::{BigUint, dev::toy_curve};

    #[test]
    fn fixed_width_encoding() {
        let curve = toy_curve();
        let sig = Signature::from_scalars(&curve, BigUint::from(5u32), BigUint::from(17u32)).unwrap();
        assert_eq!(sig.to_bytes(), [0x05, 0x11]);
        assert_eq!(Signature::from_bytes(&curve, &[0x05, 0x11]).unwrap(), sig);
        assert_eq!(Signature::from_slice(&[0x05, 0x11]).unwrap(), sig);
        assert_eq!(format!("{sig:?}"), "sm2dsa::dsa::Signature(0511)");
    }

    #[test]
    fn padding() {
        let sig = Signature::from_slice(&[0, 0, 1, 0, 0, 2]).unwrap();
        assert_eq!(sig.component_width(), 3);
        assert_eq!(sig.r(), &BigUint::from(1u32));
        assert_eq!(sig.to_bytes(), [0, 0, 1, 0, 0, 2]);
    }

    #[test]
    fn rejects_out_of_range_scalars() {
        let curve = toy_curve();
        let reject = |r: u32, s: u32| {
            Signature::from_scalars(&curve, BigUint::from(r), BigUint::from(s)) == Err(Error::Encoding)
        };

        assert!(reject(0, 1));
        assert!(reject(1, 0));
        assert!(reject(19, 1));
        assert!(reject(1, 19));
        assert!(!reject(18, 18));

        assert_eq!(Signature::from_bytes(&curve, &[1, 1, 1]), Err(Error::Encoding));
        assert_eq!(Signature::from_slice(&[]), Err(Error::Encoding));
        assert_eq!(Signature::from_slice(&[0, 1]), Err(Error::Encoding));
        assert_eq!(Signature::from_slice(&[1, 1, 1]), Err(Error::Encoding));
    }
}
