//! Fixed-nonce signing: published vectors, the hand-checked toy curve and
//! key recovery end to end.

use hex_literal::hex;
use primecurve::dev::toy_curve;
use sm2dsa::{
    BigUint, Error, PublicKey, SecretKey, Sm2Dsa,
    analysis::{recover_cross_signer, recover_from_reused_nonce, recover_nonce},
    dsa::{
        VerifyingKey,
        signature::{Verifier, hazmat::PrehashVerifier},
    },
    hazmat::{sign_prehash_with_nonce, sign_with_nonce},
    params::sm2_example_fp256,
};
use sm3::Sm3;

const IDENTITY: &[u8] = b"ALICE123@YAHOO.COM";
const SECRET_KEY: [u8; 32] =
    hex!("128B2FA8BD433C6C068C8D803DFF79792A519A55171B1B650C23661D15897263");
const PUBLIC_KEY: [u8; 65] = hex!(
    "04"
    "0AE4C7798AA0F119471BEE11825BE46202BB79E2A5844495E97C04FF4DF2548A"
    "7C0240F88F1CD4E16352A73C17B7F16F07353E53A176D684A9FE0C6BB798E857"
);
const NONCE: [u8; 32] = hex!("6CB28D99385C175C94F94E934817663FC176D925DD72B727260DBAAE1FB2F96F");

/// GM/T 0003.5 A.2
#[test]
fn example_curve_vector() {
    let curve = sm2_example_fp256();
    let secret_key = SecretKey::from_slice(&curve, &SECRET_KEY).unwrap();
    assert_eq!(
        secret_key.public_key().unwrap().to_sec1_bytes(false).unwrap(),
        PUBLIC_KEY
    );

    let k = BigUint::from_bytes_be(&NONCE);
    let sig = sign_with_nonce::<Sm3>(&secret_key, IDENTITY, b"message digest", &k).unwrap();
    assert_eq!(
        sig.to_bytes(),
        hex!(
            "40F1EC59F793D9F49E09DCEF49130D4194F79FB1EED2CAA55BACDB49C4E755D1"
            "6FC6DAC32C5D5CF10C77DFB20F7C2EB667A457872FB09EC56327A67EC7DEEBE7"
        )
    );

    let vk: VerifyingKey = VerifyingKey::from_sec1_bytes(&curve, IDENTITY, &PUBLIC_KEY).unwrap();
    assert!(vk.verify(b"message digest", &sig).is_ok());
}

/// d = 1, k = 1 on y² = x³ + 2x + 2 over 𝔽₁₇ with G = (5, 1) of order 19
#[test]
fn toy_curve_scenario() {
    let curve = toy_curve();
    let one = BigUint::from(1u32);
    let secret_key = SecretKey::from_scalar(&curve, &one).unwrap();
    let public_key = secret_key.public_key().unwrap();
    assert_eq!(public_key.as_affine(), &curve.generator());

    // e = 0: r = 5, s = 2⁻¹·(1 - 5) = 17
    let sig = sign_prehash_with_nonce(&secret_key, &BigUint::from(0u32), &one).unwrap();
    assert_eq!(sig.to_bytes(), [5, 17]);

    let vk: VerifyingKey = VerifyingKey::new(b"", public_key).unwrap();
    assert!(vk.verify_prehash(&[0; 32], &sig).is_ok());

    // s + 1
    let tampered = sm2dsa::Signature::from_scalars(&curve, BigUint::from(5u32), BigUint::from(18u32))
        .unwrap();
    assert!(vk.verify_prehash(&[0; 32], &tampered).is_err());
}

#[test]
fn toy_curve_engine_roundtrip() {
    let curve = toy_curve();
    let engine: Sm2Dsa = Sm2Dsa::new(&curve);
    let secret_key = SecretKey::from_scalar(&curve, &BigUint::from(1u32)).unwrap();
    let public_key = secret_key.public_key().unwrap();

    let signed = (1..19u32)
        .filter_map(|k| sign_with_nonce::<Sm3>(&secret_key, b"", b"abc", &BigUint::from(k)).ok())
        .collect::<Vec<_>>();
    assert!(!signed.is_empty());

    for sig in &signed {
        assert!(engine.verify(b"abc", &public_key, b"", sig));
    }
}

#[test]
fn nonce_checks_are_not_retried() {
    let curve = toy_curve();
    let secret_key = SecretKey::from_scalar(&curve, &BigUint::from(3u32)).unwrap();

    assert_eq!(
        sign_prehash_with_nonce(&secret_key, &BigUint::from(0u32), &BigUint::from(0u32)),
        Err(Error::RejectedNonce)
    );

    // x1 = 5 for k = 1, so e = 14 makes r = 0
    assert_eq!(
        sign_prehash_with_nonce(&secret_key, &BigUint::from(14u32), &BigUint::from(1u32)),
        Err(Error::RejectedNonce)
    );
}

#[test]
fn same_signer_recovery() {
    let curve = sm2_example_fp256();
    let secret_key = SecretKey::from_slice(&curve, &SECRET_KEY).unwrap();
    let k = BigUint::from_bytes_be(&NONCE);

    let first = sign_with_nonce::<Sm3>(&secret_key, IDENTITY, b"first message", &k).unwrap();
    let second = sign_with_nonce::<Sm3>(&secret_key, IDENTITY, b"second message", &k).unwrap();

    let d = recover_from_reused_nonce(curve.order(), &first, &second).unwrap();
    assert_eq!(SecretKey::from_scalar(&curve, &d).unwrap(), secret_key);
}

#[test]
fn cross_signer_recovery() {
    let curve = sm2_example_fp256();
    let attacker = SecretKey::from_slice(&curve, &SECRET_KEY).unwrap();
    let victim = SecretKey::from_slice(
        &curve,
        &hex!("3945208F7B2144B13F36E38AC6D39F95889393692860B51A42FB81EF4DF7C5B8"),
    )
    .unwrap();
    let k = BigUint::from_bytes_be(&NONCE);

    let sig_a = sign_with_nonce::<Sm3>(&attacker, b"attacker", b"hello", &k).unwrap();
    let sig_b = sign_with_nonce::<Sm3>(&victim, b"victim", b"transfer", &k).unwrap();

    let n = curve.order();
    assert_eq!(recover_nonce(n, &attacker.to_scalar(), &sig_a), k);

    let d = recover_cross_signer(n, &attacker.to_scalar(), &sig_a, &sig_b).unwrap();
    let recovered = SecretKey::from_scalar(&curve, &d).unwrap();
    assert_eq!(recovered, victim);
    assert_eq!(
        recovered.public_key().unwrap(),
        PublicKey::from_sec1_bytes(&curve, &victim.public_key().unwrap().to_sec1_bytes(true).unwrap())
            .unwrap()
    );
}
