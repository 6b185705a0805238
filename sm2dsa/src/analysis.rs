//! Secret key recovery from misused signing nonces.
//!
//! An SM2 signature satisfies `k = s + (s + r)·d (mod n)`. One signature with
//! a known `k`, or two signatures whose nonces are equal (or negatives of
//! each other), are therefore enough to solve for the signer's `d`. The same
//! holds across signers and across schemes that shared a nonce.
//!
//! These functions are for auditing and testing. Every one of them returns
//! [`Error::DegenerateCase`] instead of guessing when the system of
//! equations does not determine the answer.

use crate::{Error, IdentityDigest, Result, SecretKey, Signature, dsa::VerifyingKey};
use num_traits::Zero;
use primecurve::{
    BigUint,
    field::{add_mod, mod_inverse, mul_mod, neg_mod, sub_mod},
};
use std::collections::HashMap;

/// Recover `d` from a signature made with the known nonce `k`.
///
/// ```text
/// d = (k - s)·(s + r)⁻¹ mod n
/// ```
pub fn recover_from_known_nonce(n: &BigUint, signature: &Signature, k: &BigUint) -> Result<BigUint> {
    let (r, s) = signature.split_scalars();
    let numerator = sub_mod(k, s, n);
    let denominator = add_mod(s, r, n);
    divide(&numerator, &denominator, n)
}

/// Recover `d` from two signatures by the same key with the same nonce.
///
/// ```text
/// d = (s2 - s1)·(s1 - s2 + r1 - r2)⁻¹ mod n
/// ```
pub fn recover_from_reused_nonce(
    n: &BigUint,
    first: &Signature,
    second: &Signature,
) -> Result<BigUint> {
    let (r1, s1) = first.split_scalars();
    let (r2, s2) = second.split_scalars();

    let numerator = sub_mod(s2, s1, n);
    let denominator = add_mod(&sub_mod(s1, s2, n), &sub_mod(r1, r2, n), n);
    divide(&numerator, &denominator, n)
}

/// Recover `d` from two signatures by the same key whose nonces were `k` and
/// `n - k`. Both have the same `x1`, so they look like a reuse to
/// [`find_reused_nonces`].
///
/// ```text
/// d = -(s1 + s2)·(s1 + s2 + r1 + r2)⁻¹ mod n
/// ```
pub fn recover_from_negated_nonce(
    n: &BigUint,
    first: &Signature,
    second: &Signature,
) -> Result<BigUint> {
    let (r1, s1) = first.split_scalars();
    let (r2, s2) = second.split_scalars();

    let s_sum = add_mod(s1, s2, n);
    let numerator = neg_mod(&s_sum, n);
    let denominator = add_mod(&s_sum, &add_mod(r1, r2, n), n);
    divide(&numerator, &denominator, n)
}

/// Recover the nonce of a signature from its own secret key.
///
/// ```text
/// k = s·(1 + d) + r·d mod n
/// ```
pub fn recover_nonce(n: &BigUint, d: &BigUint, signature: &Signature) -> BigUint {
    let (r, s) = signature.split_scalars();
    let one_plus_d = add_mod(d, &BigUint::from(1u32), n);
    add_mod(&mul_mod(s, &one_plus_d, n), &mul_mod(r, d, n), n)
}

/// Recover a victim's key from a signature whose nonce was also used by a
/// signer with the known key `d_a`.
pub fn recover_cross_signer(
    n: &BigUint,
    d_a: &BigUint,
    signature_a: &Signature,
    victim: &Signature,
) -> Result<BigUint> {
    let k = recover_nonce(n, d_a, signature_a);
    recover_from_known_nonce(n, victim, &k)
}

/// Recover `d` from an ECDSA signature `(r1, s1)` over the digest scalar
/// `e1` and an SM2 signature by the same key sharing its nonce.
///
/// ```text
/// ECDSA: s1·k = e1 + r1·d
/// SM2:   k    = s2 + (s2 + r2)·d
/// d = (s1·s2 - e1)·(r1 - s1·s2 - s1·r2)⁻¹ mod n
/// ```
pub fn recover_cross_scheme(
    n: &BigUint,
    ecdsa_r: &BigUint,
    ecdsa_s: &BigUint,
    e1: &BigUint,
    sm2: &Signature,
) -> Result<BigUint> {
    let (r2, s2) = sm2.split_scalars();
    let s1s2 = mul_mod(ecdsa_s, s2, n);

    let numerator = sub_mod(&s1s2, e1, n);
    let denominator = sub_mod(
        &sub_mod(ecdsa_r, &s1s2, n),
        &mul_mod(ecdsa_s, r2, n),
        n,
    );
    divide(&numerator, &denominator, n)
}

/// A signed message as observed by an auditor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transcript {
    /// Signed message.
    pub message: Vec<u8>,

    /// Signature over `message`.
    pub signature: Signature,
}

/// Two transcripts whose nonces had the same `x1`, identified by index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NonceCollision {
    /// Index of the earlier transcript.
    pub first: usize,

    /// Index of the later transcript.
    pub second: usize,
}

/// Find pairs of transcripts whose signing nonces shared `x1`.
///
/// `x1 = (r - e) mod n` is public, so a collision means the same nonce or
/// its negation was used twice. Pairs are reported in transcript order.
pub fn find_reused_nonces<D: IdentityDigest>(
    verifying_key: &VerifyingKey<D>,
    transcripts: &[Transcript],
) -> Vec<NonceCollision> {
    let n = verifying_key.curve().order();
    let mut seen: HashMap<BigUint, Vec<usize>> = HashMap::new();
    let mut collisions = Vec::new();

    for (index, transcript) in transcripts.iter().enumerate() {
        let e = BigUint::from_bytes_be(&verifying_key.hash_msg(&transcript.message)) % n;
        let x1 = sub_mod(transcript.signature.r(), &e, n);
        let earlier = seen.entry(x1).or_default();

        collisions.extend(earlier.iter().map(|&first| NonceCollision {
            first,
            second: index,
        }));
        earlier.push(index);
    }

    collisions
}

/// Recover the secret key behind `verifying_key` from transcripts with a
/// repeated or negated nonce.
///
/// Candidates are checked against the public key, so a returned key is
/// always the right one.
pub fn recover_from_transcripts<D: IdentityDigest>(
    verifying_key: &VerifyingKey<D>,
    transcripts: &[Transcript],
) -> Option<SecretKey> {
    let curve = verifying_key.curve();
    let n = curve.order();

    find_reused_nonces(verifying_key, transcripts)
        .into_iter()
        .flat_map(|NonceCollision { first, second }| {
            let (a, b) = (&transcripts[first].signature, &transcripts[second].signature);
            [
                recover_from_reused_nonce(n, a, b),
                recover_from_negated_nonce(n, a, b),
            ]
        })
        .filter_map(|d| SecretKey::from_scalar(curve, &d.ok()?).ok())
        .find(|candidate| {
            candidate
                .public_key()
                .is_ok_and(|q| &q == verifying_key.public_key())
        })
}

/// `numerator / denominator mod n`, refusing a zero denominator.
fn divide(numerator: &BigUint, denominator: &BigUint, n: &BigUint) -> Result<BigUint> {
    if denominator.is_zero() {
        return Err(Error::DegenerateCase);
    }

    let inverse = mod_inverse(denominator, n).map_err(|_| Error::DegenerateCase)?;
    Ok(mul_mod(numerator, &inverse, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        PublicKey,
        dsa::signing::sign_prehash_with_nonce,
        params::sm2_example_fp256,
    };
    use hex_literal::hex;
    use primecurve::{Curve, Multiplier, dev::toy_curve};

    const D_A: [u8; 32] = hex!("128B2FA8BD433C6C068C8D803DFF79792A519A55171B1B650C23661D15897263");
    const D_B: [u8; 32] = hex!("3945208F7B2144B13F36E38AC6D39F95889393692860B51A42FB81EF4DF7C5B8");
    const K: [u8; 32] = hex!("6CB28D99385C175C94F94E934817663FC176D925DD72B727260DBAAE1FB2F96F");
    const K2: [u8; 32] = hex!("59276E27D506861A16680F3AD9C02DCCEF3CC1FA3CDBE4CE6D54B80DEAC1BC21");

    fn int(bytes: &[u8]) -> BigUint {
        BigUint::from_bytes_be(bytes)
    }

    fn sign(curve: &Curve, d: &BigUint, e: u32, k: &BigUint) -> Signature {
        sign_prehash_with_nonce(curve, d, &BigUint::from(e), k).unwrap()
    }

    #[test]
    fn known_nonce() {
        let curve = sm2_example_fp256();
        let (d, k) = (int(&D_A), int(&K));
        let sig = sign(&curve, &d, 1, &k);

        assert_eq!(recover_from_known_nonce(curve.order(), &sig, &k).unwrap(), d);
        assert_eq!(recover_nonce(curve.order(), &d, &sig), k);
    }

    #[test]
    fn same_signer_reused_nonce() {
        let curve = sm2_example_fp256();
        let (d, k) = (int(&D_A), int(&K));
        let first = sign(&curve, &d, 1, &k);
        let second = sign(&curve, &d, 2, &k);

        assert_eq!(recover_from_reused_nonce(curve.order(), &first, &second).unwrap(), d);
    }

    #[test]
    fn negated_nonce() {
        let curve = sm2_example_fp256();
        let n = curve.order();
        let (d, k) = (int(&D_A), int(&K));
        let first = sign(&curve, &d, 1, &k);
        let second = sign(&curve, &d, 2, &(n - &k));

        assert_eq!(recover_from_negated_nonce(n, &first, &second).unwrap(), d);
    }

    #[test]
    fn cross_signer() {
        let curve = sm2_example_fp256();
        let n = curve.order();
        let (d_a, d_b, k) = (int(&D_A), int(&D_B), int(&K));
        let sig_a = sign(&curve, &d_a, 1, &k);
        let sig_b = sign(&curve, &d_b, 2, &k);

        assert_eq!(recover_nonce(n, &d_a, &sig_a), k);
        assert_eq!(recover_cross_signer(n, &d_a, &sig_a, &sig_b).unwrap(), d_b);
    }

    #[test]
    fn cross_scheme() {
        let curve = sm2_example_fp256();
        let n = curve.order();
        let (d, k) = (int(&D_A), int(&K));
        let e1 = BigUint::from(0xdead_beefu32);

        // ECDSA with the same key and nonce
        let point = curve.mul(Multiplier::Ladder, &k, &curve.generator()).unwrap();
        let r1 = point.x().unwrap() % n;
        let s1 = mul_mod(
            &mod_inverse(&k, n).unwrap(),
            &add_mod(&e1, &mul_mod(&r1, &d, n), n),
            n,
        );

        let sm2 = sign(&curve, &d, 7, &k);
        assert_eq!(recover_cross_scheme(n, &r1, &s1, &e1, &sm2).unwrap(), d);
    }

    #[test]
    fn degenerate_cases() {
        let curve = toy_curve();
        let n = curve.order();
        let (d, k) = (BigUint::from(3u32), BigUint::from(4u32));
        let sig = sign(&curve, &d, 1, &k);

        // the same signature twice carries no information
        assert_eq!(
            recover_from_reused_nonce(n, &sig, &sig),
            Err(Error::DegenerateCase)
        );

        // s + r = n
        let sig = Signature::from_scalars(&curve, BigUint::from(5u32), BigUint::from(14u32)).unwrap();
        assert_eq!(
            recover_from_known_nonce(n, &sig, &k),
            Err(Error::DegenerateCase)
        );
    }

    #[test]
    fn transcripts() {
        let curve = sm2_example_fp256();
        let secret_key = SecretKey::from_scalar(&curve, &int(&D_A)).unwrap();
        let verifying_key: VerifyingKey =
            VerifyingKey::new(b"ALICE123@YAHOO.COM", secret_key.public_key().unwrap()).unwrap();
        let n = curve.order();

        let transcript = |message: &[u8], k: &BigUint| {
            let e = BigUint::from_bytes_be(&verifying_key.hash_msg(message)) % n;
            Transcript {
                message: message.to_vec(),
                signature: sign_prehash_with_nonce(&curve, &secret_key.to_scalar(), &e, k).unwrap(),
            }
        };

        let (k, k2) = (int(&K), int(&K2));
        let clean = [transcript(b"first", &k), transcript(b"second", &k2)];
        assert!(find_reused_nonces(&verifying_key, &clean).is_empty());
        assert_eq!(recover_from_transcripts(&verifying_key, &clean), None);

        let reused = [
            transcript(b"first", &k),
            transcript(b"second", &k2),
            transcript(b"third", &k),
        ];
        assert_eq!(
            find_reused_nonces(&verifying_key, &reused),
            [NonceCollision { first: 0, second: 2 }]
        );
        assert_eq!(
            recover_from_transcripts(&verifying_key, &reused),
            Some(secret_key.clone())
        );

        let negated = [transcript(b"first", &k), transcript(b"second", &(n - &k))];
        assert_eq!(
            find_reused_nonces(&verifying_key, &negated),
            [NonceCollision { first: 0, second: 1 }]
        );
        let recovered = recover_from_transcripts(&verifying_key, &negated).unwrap();
        assert_eq!(
            PublicKey::from(&verifying_key),
            recovered.public_key().unwrap()
        );
    }
}
