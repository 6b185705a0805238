//! Secret keys, public keys and key generation.

use crate::{Error, Result};
use core::fmt::{self, Debug};
use num_traits::Zero;
use primecurve::{AffinePoint, BigUint, Curve, field::to_be_bytes_padded};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

/// Give up on rejection sampling after this many draws. Each draw is
/// accepted with probability above one half, so reaching the limit means
/// the generator is broken.
const MAX_SAMPLING_ATTEMPTS: usize = 128;

/// Draw a scalar uniformly from `[1, n - 1]`.
///
/// Uses rejection sampling over `⌈bits(n) / 8⌉` random bytes with the excess
/// high bits masked off.
pub fn random_scalar(curve: &Curve, rng: &mut impl CryptoRngCore) -> Result<BigUint> {
    random_scalar_below(curve, curve.order(), rng)
}

/// Draw a scalar uniformly from `[1, bound - 1]`, sampling at the width of
/// the curve order.
fn random_scalar_below(
    curve: &Curve,
    bound: &BigUint,
    rng: &mut impl CryptoRngCore,
) -> Result<BigUint> {
    let order_bits = curve.order().bits();
    let mask = match order_bits % 8 {
        0 => u8::MAX,
        r => u8::MAX >> (8 - r),
    };

    let mut bytes = Zeroizing::new(vec![0u8; curve.params().order_bytes()]);

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        rng.try_fill_bytes(&mut bytes)?;
        bytes[0] &= mask;

        let candidate = BigUint::from_bytes_be(&bytes);
        if !candidate.is_zero() && candidate < *bound {
            return Ok(candidate);
        }
    }

    Err(Error::Rng)
}

/// SM2 secret key: a scalar `d` in `[1, n - 2]` bound to its curve.
///
/// The upper bound is one less than for other elliptic curve schemes because
/// signing divides by `1 + d`. The scalar is held in a buffer that is wiped
/// on drop.
#[derive(Clone)]
pub struct SecretKey {
    curve: Curve,
    bytes: Zeroizing<Vec<u8>>,
}

impl SecretKey {
    /// Generate a random secret key.
    pub fn random(curve: &Curve, rng: &mut impl CryptoRngCore) -> Result<Self> {
        let d = random_scalar_below(curve, &(curve.order() - 1u32), rng)?;
        Self::from_scalar(curve, &d)
    }

    /// Create a secret key from a scalar.
    ///
    /// Returns [`Error::InvalidKey`] unless `1 <= d <= n - 2`.
    pub fn from_scalar(curve: &Curve, d: &BigUint) -> Result<Self> {
        if d.is_zero() || *d >= curve.order() - 1u32 {
            return Err(Error::InvalidKey);
        }

        let bytes = Zeroizing::new(to_be_bytes_padded(d, curve.params().order_bytes())?);
        Ok(Self {
            curve: curve.clone(),
            bytes,
        })
    }

    /// Parse a big endian scalar of exactly `⌈bits(n) / 8⌉` bytes.
    pub fn from_slice(curve: &Curve, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != curve.params().order_bytes() {
            return Err(Error::Encoding);
        }

        Self::from_scalar(curve, &BigUint::from_bytes_be(bytes))
    }

    /// Serialize as big endian bytes.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        self.bytes.clone()
    }

    /// Borrow the curve this key belongs to.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Compute the matching public key `Q = d·G` with the fixed-base table.
    pub fn public_key(&self) -> Result<PublicKey> {
        let q = self.curve.mul_by_generator(&self.to_scalar())?;
        PublicKey::from_affine(&self.curve, q)
    }

    /// Secret scalar `d`.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn to_scalar(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }
}

impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        let same_curve = Choice::from(u8::from(self.curve == other.curve));
        same_curve & self.bytes.as_slice().ct_eq(other.bytes.as_slice())
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

/// Constant-time comparison
impl Eq for SecretKey {}
impl PartialEq for SecretKey {
    fn eq(&self, other: &SecretKey) -> bool {
        self.ct_eq(other).into()
    }
}

/// SM2 public key: a point `Q ≠ ∞` on its curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    curve: Curve,
    point: AffinePoint,
}

impl PublicKey {
    /// Wrap a point, rejecting the identity and points not on `curve`.
    pub fn from_affine(curve: &Curve, point: AffinePoint) -> Result<Self> {
        if point.is_identity() || !curve.contains(&point) {
            return Err(Error::InvalidKey);
        }

        Ok(Self {
            curve: curve.clone(),
            point,
        })
    }

    /// Parse a SEC1-encoded public key.
    pub fn from_sec1_bytes(curve: &Curve, bytes: &[u8]) -> Result<Self> {
        let point = curve.from_sec1_bytes(bytes)?;
        Self::from_affine(curve, point)
    }

    /// Serialize in SEC1 form.
    pub fn to_sec1_bytes(&self, compress: bool) -> Result<Vec<u8>> {
        Ok(self.curve.to_sec1_bytes(&self.point, compress)?)
    }

    /// Borrow the inner [`AffinePoint`].
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// Borrow the curve this key belongs to.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}

impl AsRef<AffinePoint> for PublicKey {
    fn as_ref(&self) -> &AffinePoint {
        self.as_affine()
    }
}

/// Secret key together with its public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a keypair: `d` uniform in `[1, n - 2]`, `Q = d·G`.
    pub fn generate(curve: &Curve, rng: &mut impl CryptoRngCore) -> Result<Self> {
        Self::from_secret_key(SecretKey::random(curve, rng)?)
    }

    /// Derive the public half from a secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Result<Self> {
        let public_key = secret_key.public_key()?;
        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Borrow the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Borrow the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Borrow the curve.
    pub fn curve(&self) -> &Curve {
        self.secret_key.curve()
    }
}
