//! Support for SM2DSA signing.
//!
//! ## Algorithm
//!
//! ```text
//! A1: set M~=ZA || M
//! A2: calculate e=Hv(M~)
//! A3: pick a random number k in [1, n-1] via a random number generator
//! A4: calculate the elliptic curve point (x1, y1)=[k]G
//! A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
//! A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
//! A7: the digital signature of M is (r, s)
//! ```

use super::{Signature, VerifyingKey, engine::Sm2Dsa};
use crate::{DistId, Error, IdentityDigest, SecretKey, keys::random_scalar};
use core::fmt::{self, Debug};
use num_traits::Zero;
use primecurve::{
    BigUint, Curve, Multiplier,
    field::{mod_inverse, mul_mod, sub_mod},
};
use signature::{
    KeypairRef, RandomizedSigner, Result,
    hazmat::RandomizedPrehashSigner,
    rand_core::CryptoRngCore,
};
use sm3::Sm3;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

#[cfg(feature = "getrandom")]
use signature::Signer;

/// SM2DSA secret key used for signing messages and producing signatures.
///
/// ## Usage
///
/// The [`signature`] crate defines the following traits which are the
/// primary API for signing:
///
/// - [`RandomizedSigner`]: sign a message using this key and a caller
///   supplied RNG
/// - [`Signer`][signature::Signer]: the same with the operating system RNG
///   (requires the `getrandom` feature)
/// - [`RandomizedPrehashSigner`]: sign the low-level raw output bytes of a
///   message digest
#[derive(Clone)]
pub struct SigningKey<D: IdentityDigest = Sm3> {
    /// Secret key.
    secret_key: SecretKey,

    /// Verifying key for this signing key.
    verifying_key: VerifyingKey<D>,
}

impl<D: IdentityDigest> SigningKey<D> {
    /// Create signing key from a signer's distinguishing identifier and
    /// secret key.
    pub fn new(distid: &DistId, secret_key: &SecretKey) -> crate::Result<Self> {
        let verifying_key = VerifyingKey::new(distid, secret_key.public_key()?)?;
        Ok(Self {
            secret_key: secret_key.clone(),
            verifying_key,
        })
    }

    /// Generate a random signing key.
    pub fn random(
        curve: &Curve,
        distid: &DistId,
        rng: &mut impl CryptoRngCore,
    ) -> crate::Result<Self> {
        Self::new(distid, &SecretKey::random(curve, rng)?)
    }

    /// Parse signing key from big endian-encoded byte slice containing a secret
    /// scalar value.
    pub fn from_slice(curve: &Curve, distid: &DistId, slice: &[u8]) -> crate::Result<Self> {
        Self::new(distid, &SecretKey::from_slice(curve, slice)?)
    }

    /// Serialize as bytes.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        self.secret_key.to_bytes()
    }

    /// Borrow the secret key.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn as_secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Get the [`VerifyingKey`] which corresponds to this [`SigningKey`].
    pub fn verifying_key(&self) -> &VerifyingKey<D> {
        &self.verifying_key
    }

    /// Get the distinguishing identifier for this key.
    pub fn distid(&self) -> &DistId {
        self.verifying_key.distid()
    }

    /// Borrow the curve.
    pub fn curve(&self) -> &Curve {
        self.secret_key.curve()
    }
}

//
// `*Signer` trait impls
//

impl<D: IdentityDigest> RandomizedPrehashSigner<Signature> for SigningKey<D> {
    fn sign_prehash_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        prehash: &[u8],
    ) -> Result<Signature> {
        let e = self.verifying_key.prehash_scalar(prehash)?;
        Ok(sign_prehash(
            self.curve(),
            &self.secret_key.to_scalar(),
            &e,
            rng,
            Sm2Dsa::<D>::DEFAULT_MAX_ATTEMPTS,
        )?)
    }
}

impl<D: IdentityDigest> RandomizedSigner<Signature> for SigningKey<D> {
    fn try_sign_with_rng(&self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<Signature> {
        // A1: set M~=ZA || M
        let hash = self.verifying_key.hash_msg(msg);
        self.sign_prehash_with_rng(rng, &hash)
    }
}

#[cfg(feature = "getrandom")]
impl<D: IdentityDigest> Signer<Signature> for SigningKey<D> {
    fn try_sign(&self, msg: &[u8]) -> Result<Signature> {
        self.try_sign_with_rng(&mut rand_core::OsRng, msg)
    }
}

//
// Other trait impls
//

impl<D: IdentityDigest> AsRef<VerifyingKey<D>> for SigningKey<D> {
    fn as_ref(&self) -> &VerifyingKey<D> {
        &self.verifying_key
    }
}

impl<D: IdentityDigest> ConstantTimeEq for SigningKey<D> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret_key.ct_eq(&other.secret_key)
    }
}

impl<D: IdentityDigest> Debug for SigningKey<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

/// Constant-time comparison
impl<D: IdentityDigest> Eq for SigningKey<D> {}
impl<D: IdentityDigest> PartialEq for SigningKey<D> {
    fn eq(&self, other: &SigningKey<D>) -> bool {
        self.ct_eq(other).into()
    }
}

impl<D: IdentityDigest> KeypairRef for SigningKey<D> {
    type VerifyingKey = VerifyingKey<D>;
}

/// Sign the message scalar `e`, drawing up to `max_attempts` nonces.
pub(crate) fn sign_prehash(
    curve: &Curve,
    d: &BigUint,
    e: &BigUint,
    rng: &mut impl CryptoRngCore,
    max_attempts: u32,
) -> crate::Result<Signature> {
    for _ in 0..max_attempts {
        // A3: pick a random number k in [1, n-1] via a random number generator
        let k = random_scalar(curve, rng)?;

        match sign_prehash_with_nonce(curve, d, e, &k) {
            Err(Error::RejectedNonce) => continue,
            result => return result,
        }
    }

    Err(Error::ExhaustedRetries)
}

/// One signing attempt with the given nonce.
///
/// Returns [`Error::RejectedNonce`] where the algorithm says to return to A3.
pub(crate) fn sign_prehash_with_nonce(
    curve: &Curve,
    d: &BigUint,
    e: &BigUint,
    k: &BigUint,
) -> crate::Result<Signature> {
    let n = curve.order();
    if k.is_zero() || k >= n {
        return Err(Error::RejectedNonce);
    }

    // A4: calculate the elliptic curve point (x1, y1)=[k]G
    let point = curve.mul(Multiplier::Ladder, k, &curve.generator())?;
    let x1 = point.x().ok_or(Error::RejectedNonce)?;

    // A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
    let r = (e + x1) % n;
    if r.is_zero() || &r + k == *n {
        return Err(Error::RejectedNonce);
    }

    // A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
    let d_plus_1_inv = mod_inverse(&(d + 1u32), n)?;
    let s = mul_mod(&d_plus_1_inv, &sub_mod(k, &mul_mod(&r, d, n), n), n);
    if s.is_zero() {
        return Err(Error::RejectedNonce);
    }

    // A7: the digital signature of M is (r, s)
    Signature::from_scalars(curve, r, s)
}

#[cfg(test)]
mod tests {
    use super::{sign_prehash, sign_prehash_with_nonce};
    use crate::{
        Error,
        distid::{hash_msg, hash_z},
        dsa::verifying::verify_prehash,
        params::sm2_example_fp256,
    };
    use hex_literal::hex;
    use primecurve::{BigUint, dev::toy_curve};
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;
    use sm3::Sm3;

    fn int(bytes: &[u8]) -> BigUint {
        BigUint::from_bytes_be(bytes)
    }

    /// GM/T 0003.5 A.2
    #[test]
    fn example_curve_vector() {
        let curve = sm2_example_fp256();
        let d = int(&hex!(
            "128B2FA8BD433C6C068C8D803DFF79792A519A55171B1B650C23661D15897263"
        ));
        let k = int(&hex!(
            "6CB28D99385C175C94F94E934817663FC176D925DD72B727260DBAAE1FB2F96F"
        ));

        let q = curve.mul_by_generator(&d).unwrap();
        let z = hash_z::<Sm3>(&curve, b"ALICE123@YAHOO.COM", &q).unwrap();
        let e = int(&hash_msg::<Sm3>(&z, b"message digest")) % curve.order();
        assert_eq!(
            e,
            int(&hex!(
                "2FE21EB4817E69973F8E49CA9CC787D47110C69963A7E62E025B94F1F6C184BF"
            ))
        );

        let sig = sign_prehash_with_nonce(&curve, &d, &e, &k).unwrap();
        assert_eq!(
            sig.to_bytes(),
            hex!(
                "40F1EC59F793D9F49E09DCEF49130D4194F79FB1EED2CAA55BACDB49C4E755D1"
                "6FC6DAC32C5D5CF10C77DFB20F7C2EB667A457872FB09EC56327A67EC7DEEBE7"
            )
        );
        assert!(verify_prehash(&curve, &q, &e, &sig));
    }

    /// d = 1, k = 1, e = 0 on y² = x³ + 2x + 2 over 𝔽₁₇
    #[test]
    fn toy_curve_by_hand() {
        let curve = toy_curve();
        let one = BigUint::from(1u32);
        let zero = BigUint::from(0u32);

        // G = (5, 1): r = 5, s = 2⁻¹·(1 - 5) = 10·15 = 17 (mod 19)
        let sig = sign_prehash_with_nonce(&curve, &one, &zero, &one).unwrap();
        assert_eq!(sig.to_bytes(), [5, 17]);
        assert!(verify_prehash(&curve, &curve.generator(), &zero, &sig));
    }

    #[test]
    fn rejected_nonces() {
        let curve = toy_curve();
        let d = BigUint::from(3u32);

        // out of range
        for k in [0u32, 19, 20] {
            assert_eq!(
                sign_prehash_with_nonce(&curve, &d, &BigUint::from(0u32), &BigUint::from(k)),
                Err(Error::RejectedNonce)
            );
        }

        // kG = G has x1 = 5: e = 14 gives r = 0
        assert_eq!(
            sign_prehash_with_nonce(&curve, &d, &BigUint::from(14u32), &BigUint::from(1u32)),
            Err(Error::RejectedNonce)
        );

        // e = 13 gives r = 18 = n - k
        assert_eq!(
            sign_prehash_with_nonce(&curve, &d, &BigUint::from(13u32), &BigUint::from(1u32)),
            Err(Error::RejectedNonce)
        );

        // kG = 2G = (6, 3): r = 6 and r·d ≡ k for d = 13, so s = 0
        assert_eq!(
            sign_prehash_with_nonce(
                &curve,
                &BigUint::from(13u32),
                &BigUint::from(0u32),
                &BigUint::from(2u32)
            ),
            Err(Error::RejectedNonce)
        );
    }

    #[test]
    fn bounded_retries() {
        let curve = toy_curve();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (d, e) = (BigUint::from(3u32), BigUint::from(8u32));

        assert_eq!(
            sign_prehash(&curve, &d, &e, &mut rng, 0),
            Err(Error::ExhaustedRetries)
        );

        for _ in 0..20 {
            let sig = sign_prehash(&curve, &d, &e, &mut rng, 64).unwrap();
            let q = curve.mul_by_generator(&d).unwrap();
            assert!(verify_prehash(&curve, &q, &e, &sig));
        }
    }
}
