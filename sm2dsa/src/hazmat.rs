//! Low-level SM2DSA primitives.
//!
//! # ⚠️ Warning: Hazmat!
//!
//! YOU PROBABLY DON'T WANT TO USE THESE!
//!
//! These functions sign with a caller-chosen nonce `k`. Reusing `k`, or
//! letting anyone learn it, discloses the secret key (see [`crate::analysis`]).
//! They exist to reproduce published test vectors and to exercise the
//! analyzer.

use crate::{
    DistId, IdentityDigest, Result, SecretKey, Signature,
    distid::{hash_msg, hash_z},
    dsa::signing,
};
use primecurve::BigUint;

/// Sign `msg` on behalf of `distid` with the nonce `k`.
///
/// Performs one attempt: a nonce that the algorithm would discard fails with
/// [`Error::RejectedNonce`][crate::Error::RejectedNonce] instead of being
/// replaced.
pub fn sign_with_nonce<D: IdentityDigest>(
    secret_key: &SecretKey,
    distid: &DistId,
    msg: &[u8],
    k: &BigUint,
) -> Result<Signature> {
    let curve = secret_key.curve();
    let public_key = secret_key.public_key()?;
    let za = hash_z::<D>(curve, distid, public_key.as_affine())?;
    let e = BigUint::from_bytes_be(&hash_msg::<D>(&za, msg)) % curve.order();

    sign_prehash_with_nonce(secret_key, &e, k)
}

/// Sign the message scalar `e` with the nonce `k`.
pub fn sign_prehash_with_nonce(secret_key: &SecretKey, e: &BigUint, k: &BigUint) -> Result<Signature> {
    signing::sign_prehash_with_nonce(secret_key.curve(), &secret_key.to_scalar(), e, k)
}
