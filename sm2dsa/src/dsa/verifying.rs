//! Support for verifying SM2DSA signatures.
//!
//! ## Algorithm
//!
//! ```text
//! B1: verify whether r' in [1,n-1], verification failed if not
//! B2: verify whether s' in [1,n-1], verification failed if not
//! B3: set M'~=ZA || M'
//! B4: calculate e'=Hv(M'~)
//! B5: calculate t = (r' + s') modn, verification failed if t=0
//! B6: calculate the point (x1', y1')=[s']G + [t]PA
//! B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
//! ```

use super::Signature;
use crate::{
    DistId, Error, IdentityDigest, PublicKey,
    distid::{hash_msg, hash_z},
};
use core::fmt::{self, Debug};
use digest::{Output, OutputSizeUser};
use num_traits::Zero;
use primecurve::{AffinePoint, BigUint, Curve, Memo, field::to_be_bytes_padded};
use signature::{Result, Verifier, hazmat::PrehashVerifier};
use sm3::Sm3;
use subtle::ConstantTimeEq;

/// SM2DSA public key used for verifying signatures are valid for a given
/// message.
///
/// ## Usage
///
/// The [`signature`] crate defines the following traits which are the
/// primary API for verifying:
///
/// - [`Verifier`]: verify a message against a provided key and signature
/// - [`PrehashVerifier`]: verify the low-level raw output bytes of a message digest
///
/// The user information hash `Z` is computed once, when the key is created,
/// and belongs to this key alone.
#[derive(Clone)]
pub struct VerifyingKey<D: IdentityDigest = Sm3> {
    /// Signer's public key.
    public_key: PublicKey,

    /// Signer's user information hash `Z`.
    identity_hash: Output<D>,

    /// Distinguishing identifier used to compute `Z`.
    distid: Vec<u8>,
}

impl<D: IdentityDigest> VerifyingKey<D> {
    /// Initialize [`VerifyingKey`] from a signer's distinguishing identifier
    /// and public key.
    pub fn new(distid: &DistId, public_key: PublicKey) -> crate::Result<Self> {
        let identity_hash = hash_z::<D>(public_key.curve(), distid, public_key.as_affine())?;

        Ok(Self {
            identity_hash,
            public_key,
            distid: distid.into(),
        })
    }

    /// Initialize [`VerifyingKey`] from a SEC1-encoded public key.
    pub fn from_sec1_bytes(curve: &Curve, distid: &DistId, bytes: &[u8]) -> crate::Result<Self> {
        Self::new(distid, PublicKey::from_sec1_bytes(curve, bytes)?)
    }

    /// Initialize [`VerifyingKey`] from an affine point.
    ///
    /// Returns an [`Error`] if the given affine point is the additive identity
    /// (a.k.a. point at infinity) or is not on the curve.
    pub fn from_affine(curve: &Curve, distid: &DistId, affine: AffinePoint) -> crate::Result<Self> {
        Self::new(distid, PublicKey::from_affine(curve, affine)?)
    }

    /// Borrow the inner [`AffinePoint`] for this public key.
    pub fn as_affine(&self) -> &AffinePoint {
        self.public_key.as_affine()
    }

    /// Borrow the inner [`PublicKey`].
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Borrow the curve.
    pub fn curve(&self) -> &Curve {
        self.public_key.curve()
    }

    /// Get the distinguishing identifier for this key.
    pub fn distid(&self) -> &DistId {
        &self.distid
    }

    /// Borrow the user information hash `Z`.
    pub fn identity_hash(&self) -> &Output<D> {
        &self.identity_hash
    }

    /// Convert this [`VerifyingKey`] into the
    /// `Elliptic-Curve-Point-to-Octet-String` encoding described in
    /// SEC 1: Elliptic Curve Cryptography (Version 2.0) section 2.3.3
    /// (page 10).
    ///
    /// <http://www.secg.org/sec1-v2.pdf>
    pub fn to_sec1_bytes(&self, compress: bool) -> crate::Result<Vec<u8>> {
        self.public_key.to_sec1_bytes(compress)
    }

    /// Compute message hash `e` according to [draft-shen-sm2-ecdsa § 5.2.1]
    ///
    /// [draft-shen-sm2-ecdsa § 5.2.1]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.2.1
    pub(crate) fn hash_msg(&self, msg: &[u8]) -> Output<D> {
        hash_msg::<D>(&self.identity_hash, msg)
    }

    /// Reduce a digest of `D` to the scalar `e`, rejecting other lengths.
    pub(crate) fn prehash_scalar(&self, prehash: &[u8]) -> crate::Result<BigUint> {
        if prehash.len() != <D as OutputSizeUser>::output_size() {
            return Err(Error::Encoding);
        }

        Ok(BigUint::from_bytes_be(prehash) % self.curve().order())
    }
}

//
// `*Verifier` trait impls
//

impl<D: IdentityDigest> PrehashVerifier<Signature> for VerifyingKey<D> {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> Result<()> {
        // B4: calculate e'=Hv(M'~)
        let e = self.prehash_scalar(prehash)?;

        if verify_prehash(self.curve(), self.as_affine(), &e, signature) {
            Ok(())
        } else {
            Err(signature::Error::new())
        }
    }
}

impl<D: IdentityDigest> Verifier<Signature> for VerifyingKey<D> {
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<()> {
        // B3: set M'~=ZA || M'
        let hash = self.hash_msg(msg);
        self.verify_prehash(&hash, signature)
    }
}

//
// Other trait impls
//

impl<D: IdentityDigest> AsRef<AffinePoint> for VerifyingKey<D> {
    fn as_ref(&self) -> &AffinePoint {
        self.as_affine()
    }
}

impl<D: IdentityDigest> Debug for VerifyingKey<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("public_key", &self.public_key)
            .field("distid", &String::from_utf8_lossy(&self.distid))
            .finish_non_exhaustive()
    }
}

impl<D: IdentityDigest> PartialEq for VerifyingKey<D> {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key && self.distid == other.distid
    }
}

impl<D: IdentityDigest> Eq for VerifyingKey<D> {}

impl<D: IdentityDigest> From<VerifyingKey<D>> for PublicKey {
    fn from(verifying_key: VerifyingKey<D>) -> PublicKey {
        verifying_key.public_key
    }
}

impl<D: IdentityDigest> From<&VerifyingKey<D>> for PublicKey {
    fn from(verifying_key: &VerifyingKey<D>) -> PublicKey {
        verifying_key.public_key.clone()
    }
}

/// Check `signature` against the public point `q` and message scalar `e`.
///
/// Never fails loudly: every rejection, including arithmetic errors on
/// malformed input, is `false`.
pub(crate) fn verify_prehash(
    curve: &Curve,
    q: &AffinePoint,
    e: &BigUint,
    signature: &Signature,
) -> bool {
    let n = curve.order();
    let (r, s) = signature.split_scalars();

    // B1: verify whether r' in [1,n-1], verification failed if not
    // B2: verify whether s' in [1,n-1], verification failed if not
    if r.is_zero() || r >= n || s.is_zero() || s >= n {
        return false;
    }

    // B5: calculate t = (r' + s') modn, verification failed if t=0
    let t = (r + s) % n;
    if t.is_zero() {
        return false;
    }

    // B6: calculate the point (x1', y1')=[s']G + [t]PA
    let mut memo = Memo::new(curve);
    let Ok(point) = memo.lincomb(curve, s, &curve.generator(), &t, q) else {
        return false;
    };
    let Some(x1) = point.x() else {
        return false;
    };

    // B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
    let expected = (e + x1) % n;
    let width = curve.scalar_bytes();

    match (to_be_bytes_padded(&expected, width), to_be_bytes_padded(r, width)) {
        (Ok(expected), Ok(r)) => expected.ct_eq(&r).into(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::verify_prehash;
    use crate::Signature;
    use primecurve::{AffinePoint, BigUint, dev::toy_curve};

    fn sig(r: u32, s: u32) -> Signature {
        Signature::from_slice(&[u8::try_from(r).unwrap(), u8::try_from(s).unwrap()]).unwrap()
    }

    /// d = 1 so Q = G; e = 0
    #[test]
    fn toy_curve_verdicts() {
        let curve = toy_curve();
        let g = curve.generator();
        let zero = BigUint::from(0u32);

        // 17G + 3G = G, x1 = 5 = r
        assert!(verify_prehash(&curve, &g, &zero, &sig(5, 17)));

        // 18G + 4G = 3G, x1 = 10 ≠ 5
        assert!(!verify_prehash(&curve, &g, &zero, &sig(5, 18)));

        // wrong message scalar
        assert!(!verify_prehash(&curve, &g, &BigUint::from(1u32), &sig(5, 17)));
    }

    #[test]
    fn out_of_range_components() {
        let curve = toy_curve();
        let g = curve.generator();
        let zero = BigUint::from(0u32);

        assert!(!verify_prehash(&curve, &g, &zero, &sig(24, 17)));
        assert!(!verify_prehash(&curve, &g, &zero, &sig(5, 36)));

        // t = r + s = n
        assert!(!verify_prehash(&curve, &g, &zero, &sig(5, 14)));
    }

    #[test]
    fn malformed_public_point() {
        let curve = toy_curve();
        let bogus = AffinePoint::from_coordinates(BigUint::from(1u32), BigUint::from(1u32));
        let zero = BigUint::from(0u32);

        assert!(!verify_prehash(&curve, &bogus, &zero, &sig(5, 17)));
        assert!(!verify_prehash(&curve, &AffinePoint::Identity, &zero, &sig(5, 17)));
    }
}
