//! Modular arithmetic over arbitrary-precision integers.
//!
//! These functions back both the base field `𝔽ₚ` of a curve and the scalar
//! field modulo the group order `n`. Inputs need not be reduced.

use crate::{Error, Result};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Bases used for Miller-Rabin. Deterministic below 3.3·10²⁴.
const MILLER_RABIN_BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Extra Miller-Rabin rounds run with bases derived from the candidate.
const DERIVED_ROUNDS: usize = 16;

/// Starting point of the derived base sequence.
const DERIVED_BASE_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Compute `a⁻¹ mod m` using the extended Euclidean algorithm.
///
/// Returns [`Error::NotInvertible`] when `a ≡ 0 (mod m)` or `gcd(a, m) ≠ 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    check_modulus(m)?;

    let a = a % m;
    if a.is_zero() {
        return Err(Error::NotInvertible);
    }

    let modulus = BigInt::from(m.clone());
    let (mut old_r, mut r) = (BigInt::from(a), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = core::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = core::mem::replace(&mut s, next_s);
    }

    // old_r = gcd(a, m) and old_s·a ≡ old_r (mod m)
    if !old_r.is_one() {
        return Err(Error::NotInvertible);
    }

    old_s
        .mod_floor(&modulus)
        .to_biguint()
        .ok_or(Error::NotInvertible)
}

/// Compute `base^exp mod m` by left-to-right square-and-multiply.
pub fn mod_pow(base: &BigUint, exp: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() {
        return Err(Error::InvalidModulus);
    }

    if m.is_one() {
        return Ok(BigUint::zero());
    }

    let base = base % m;
    let mut acc = BigUint::one();

    for i in (0..exp.bits()).rev() {
        acc = &acc * &acc % m;

        if exp.bit(i) {
            acc = acc * &base % m;
        }
    }

    Ok(acc)
}

/// Compute `a⁻¹ mod p` as `a^(p-2) mod p`.
///
/// Only meaningful when `p` is prime, in which case it agrees with
/// [`mod_inverse`].
pub fn fermat_inverse(a: &BigUint, p: &BigUint) -> Result<BigUint> {
    check_modulus(p)?;

    if (a % p).is_zero() {
        return Err(Error::NotInvertible);
    }

    mod_pow(a, &(p - 2u32), p)
}

/// Compute `(a + b) mod m`.
///
/// # Panics
///
/// If `m` is zero.
pub fn add_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// Compute `(a - b) mod m`, lifted into `[0, m)`.
///
/// # Panics
///
/// If `m` is zero.
pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    ((a % m) + m - (b % m)) % m
}

/// Compute `(a · b) mod m`.
///
/// # Panics
///
/// If `m` is zero.
pub fn mul_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    a * b % m
}

/// Compute `-a mod m`.
///
/// # Panics
///
/// If `m` is zero.
pub fn neg_mod(a: &BigUint, m: &BigUint) -> BigUint {
    sub_mod(&BigUint::zero(), a, m)
}

/// Square root modulo a prime `p ≡ 3 (mod 4)`.
///
/// Returns `None` when `a` is a non-residue or `p` has the wrong shape.
pub fn sqrt_3_mod_4(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    if (p % 4u32) != BigUint::from(3u32) {
        return None;
    }

    let exp = (p + 1u32) >> 2u32;
    let root = mod_pow(a, &exp, p).ok()?;

    if mul_mod(&root, &root, p) == a % p {
        Some(root)
    } else {
        None
    }
}

/// Miller-Rabin primality test.
///
/// Runs the fixed bases, which decide every `n` below 3.3·10²⁴, followed by
/// rounds with bases derived from `n` itself so that a composite cannot be
/// tailored to the fixed set alone. The result is still probabilistic for
/// large `n`.
pub fn is_probable_prime(n: &BigUint) -> bool {
    if *n < BigUint::from(2u32) {
        return false;
    }

    for base in MILLER_RABIN_BASES {
        let base = BigUint::from(base);

        if *n == base {
            return true;
        }

        if (n % &base).is_zero() {
            return false;
        }
    }

    let n_minus_1 = n - 1u32;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;

    MILLER_RABIN_BASES
        .into_iter()
        .map(BigUint::from)
        .chain(derived_bases(n))
        .all(|base| is_strong_probable_prime(n, &n_minus_1, &d, s, &base))
}

/// Bases in `[2, n - 2]` taken from the sequence `xᵢ₊₁ = xᵢ² + 1 mod n`.
fn derived_bases(n: &BigUint) -> impl Iterator<Item = BigUint> + '_ {
    let bound = n - 3u32;
    let mut seed = BigUint::from(DERIVED_BASE_SEED);

    (0..DERIVED_ROUNDS).map(move |_| {
        seed = (&seed * &seed + 1u32) % n;
        &seed % &bound + 2u32
    })
}

/// One Miller-Rabin round with `n - 1 = d·2ˢ`.
fn is_strong_probable_prime(
    n: &BigUint,
    n_minus_1: &BigUint,
    d: &BigUint,
    s: u64,
    base: &BigUint,
) -> bool {
    let Ok(mut x) = mod_pow(base, d, n) else {
        return false;
    };

    if x.is_one() || x == *n_minus_1 {
        return true;
    }

    for _ in 1..s {
        x = &x * &x % n;

        if x == *n_minus_1 {
            return true;
        }
    }

    false
}

/// Number of bytes needed to represent `value` in big endian.
pub fn byte_len(value: &BigUint) -> usize {
    usize::try_from(value.bits().div_ceil(8)).unwrap_or(usize::MAX)
}

/// Serialize `value` as a big endian integer left-padded to `width` bytes.
pub fn to_be_bytes_padded(value: &BigUint, width: usize) -> Result<Vec<u8>> {
    let len = byte_len(value);
    if len > width {
        return Err(Error::InvalidEncoding);
    }

    let mut out = vec![0u8; width];
    if len > 0 {
        out[width - len..].copy_from_slice(&value.to_bytes_be());
    }

    Ok(out)
}

fn check_modulus(m: &BigUint) -> Result<()> {
    if *m < BigUint::from(2u32) {
        Err(Error::InvalidModulus)
    } else {
        Ok(())
    }
}
