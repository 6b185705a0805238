//! Functional SM2DSA interface over an explicit curve.

use super::{Signature, signing, verifying};
use crate::{
    DistId, Error, IdentityDigest, PublicKey, Result, SecretKey,
    distid::{hash_msg, hash_z},
};
use core::{
    fmt::{self, Debug},
    marker::PhantomData,
};
use digest::Output;
use primecurve::{BigUint, Curve};
use rand_core::CryptoRngCore;
use sm3::Sm3;

/// SM2DSA over one curve with the hash function `D`.
///
/// Every call takes the keys and the distinguishing identifier explicitly
/// and recomputes `Z` for them; nothing is cached between calls. Keys must
/// belong to the engine's curve, otherwise [`Error::Configuration`] is
/// returned.
///
/// ```
/// # fn example() -> Result<(), sm2dsa::Error> {
/// use rand_chacha::{ChaCha20Rng, rand_core::SeedableRng};
/// use sm2dsa::{DEFAULT_DISTID, KeyPair, Sm2Dsa, params::sm2p256};
///
/// let curve = sm2p256();
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let keypair = KeyPair::generate(&curve, &mut rng)?;
///
/// let engine: Sm2Dsa = Sm2Dsa::new(&curve);
/// let signature = engine.sign(&mut rng, b"message", keypair.secret_key(), DEFAULT_DISTID)?;
/// assert!(engine.verify(b"message", keypair.public_key(), DEFAULT_DISTID, &signature));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Sm2Dsa<D: IdentityDigest = Sm3> {
    curve: Curve,
    max_attempts: u32,
    digest: PhantomData<fn() -> D>,
}

impl<D: IdentityDigest> Sm2Dsa<D> {
    /// Default bound on nonce draws per signature.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

    /// Create an engine for `curve`.
    pub fn new(curve: &Curve) -> Self {
        Self {
            curve: curve.clone(),
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            digest: PhantomData,
        }
    }

    /// Bound the number of nonces drawn for one signature.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Borrow the curve.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Bound on nonce draws per signature.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Does `D` make this engine interoperable with standard SM2?
    pub fn is_conformant() -> bool {
        D::CONFORMANT
    }

    /// Compute the user information hash `Z` for `user_id` and `public_key`.
    pub fn compute_za(&self, user_id: &DistId, public_key: &PublicKey) -> Result<Output<D>> {
        self.check_curve(public_key.curve())?;
        hash_z::<D>(&self.curve, user_id, public_key.as_affine())
    }

    /// Compute `e = H(Z ‖ M) mod n`.
    pub fn message_scalar(&self, za: &Output<D>, message: &[u8]) -> BigUint {
        BigUint::from_bytes_be(&hash_msg::<D>(za, message)) % self.curve.order()
    }

    /// Sign `message` on behalf of `user_id`.
    ///
    /// Draws fresh nonces from `rng` until one passes the `r` and `s` checks,
    /// at most [`Sm2Dsa::max_attempts`] times; then fails with
    /// [`Error::ExhaustedRetries`].
    pub fn sign(
        &self,
        rng: &mut impl CryptoRngCore,
        message: &[u8],
        secret_key: &SecretKey,
        user_id: &DistId,
    ) -> Result<Signature> {
        self.check_curve(secret_key.curve())?;

        // A1: set M~=ZA || M
        let za = self.compute_za(user_id, &secret_key.public_key()?)?;

        // A2: calculate e=Hv(M~)
        let e = self.message_scalar(&za, message);

        signing::sign_prehash(
            &self.curve,
            &secret_key.to_scalar(),
            &e,
            rng,
            self.max_attempts,
        )
    }

    /// Verify `signature` over `message` by `user_id`.
    ///
    /// Any failure, including keys from another curve, yields `false`.
    pub fn verify(
        &self,
        message: &[u8],
        public_key: &PublicKey,
        user_id: &DistId,
        signature: &Signature,
    ) -> bool {
        self.try_verify(message, public_key, user_id, signature)
            .unwrap_or(false)
    }

    /// Like [`Sm2Dsa::verify`], but reports why no verdict could be reached:
    /// [`Error::Configuration`] for a key from another curve and
    /// [`Error::InvalidIdentity`] for an oversized identifier.
    pub fn try_verify(
        &self,
        message: &[u8],
        public_key: &PublicKey,
        user_id: &DistId,
        signature: &Signature,
    ) -> Result<bool> {
        // B3: set M'~=ZA || M'
        let za = self.compute_za(user_id, public_key)?;

        // B4: calculate e'=Hv(M'~)
        let e = self.message_scalar(&za, message);

        Ok(verifying::verify_prehash(
            &self.curve,
            public_key.as_affine(),
            &e,
            signature,
        ))
    }

    fn check_curve(&self, curve: &Curve) -> Result<()> {
        if self.curve.same_curve(curve) {
            Ok(())
        } else {
            Err(Error::Configuration)
        }
    }
}

impl<D: IdentityDigest> Clone for Sm2Dsa<D> {
    fn clone(&self) -> Self {
        Self {
            curve: self.curve.clone(),
            max_attempts: self.max_attempts,
            digest: PhantomData,
        }
    }
}

impl<D: IdentityDigest> Debug for Sm2Dsa<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sm2Dsa")
            .field("curve", &self.curve)
            .field("max_attempts", &self.max_attempts)
            .field("conformant", &D::CONFORMANT)
            .finish()
    }
}
