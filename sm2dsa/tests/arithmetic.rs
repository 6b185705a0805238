//! Curve arithmetic on the SM2 recommended curve.

use hex_literal::hex;
use proptest::prelude::*;
use sm2dsa::{
    AffinePoint, BigUint, PublicKey,
    params::sm2p256,
    primecurve::{
        self, Memo, Multiplier,
        field::{fermat_inverse, mod_inverse, mod_pow},
    },
};

/// 2G
const DOUBLE_G: [u8; 65] = hex!(
    "04"
    "56cefd60d7c87c000d58ef57fa73ba4d9c0dfa08c08a7331495c2e1da3f2bd52"
    "31b7e7e6cc8189f668535ce0f8eaf1bd6de84c182f6c8e716f780d3a970a23c3"
);

#[test]
fn known_multiple() {
    let curve = sm2p256();
    let two_g = curve.double(&curve.generator()).unwrap();
    assert_eq!(curve.to_sec1_bytes(&two_g, false).unwrap(), DOUBLE_G);
    assert_eq!(curve.from_sec1_bytes(&DOUBLE_G).unwrap(), two_g);
}

#[test]
fn order_annihilates_generator() {
    let curve = sm2p256();
    let n = curve.order().clone();

    for strategy in Multiplier::ALL {
        assert_eq!(
            curve.mul(strategy, &n, &curve.generator()).unwrap(),
            AffinePoint::Identity
        );
    }
}

#[test]
fn negation() {
    let curve = sm2p256();
    let g = curve.generator();
    let n_minus_1 = curve.order() - 1u32;

    assert_eq!(curve.mul_by_generator(&n_minus_1).unwrap(), curve.neg(&g));
    assert_eq!(curve.add(&g, &curve.neg(&g)).unwrap(), AffinePoint::Identity);
}

#[test]
fn compressed_public_keys() {
    let curve = sm2p256();

    for d in [1u32, 2, 3, 0xdead_beef] {
        let q = curve.mul_by_generator(&BigUint::from(d)).unwrap();
        let public_key = PublicKey::from_affine(&curve, q).unwrap();
        let compressed = public_key.to_sec1_bytes(true).unwrap();

        assert_eq!(compressed.len(), 33);
        assert_eq!(PublicKey::from_sec1_bytes(&curve, &compressed).unwrap(), public_key);
    }
}

#[test]
fn memo_on_recommended_curve() {
    let curve = sm2p256();
    let mut memo = Memo::new(&curve);
    let g = curve.generator();
    let k = BigUint::from(0x1234_5678_9abc_def0u64);

    let expected = curve.mul(Multiplier::DoubleAndAdd, &k, &g).unwrap();
    assert_eq!(memo.mul(&curve, &k, &g).unwrap(), expected);

    let inverses = memo.cached_inverses();
    assert!(inverses > 0);
    assert_eq!(memo.mul(&curve, &k, &g).unwrap(), expected);
    assert_eq!(memo.cached_inverses(), inverses);
}

prop_compose! {
    fn scalar()(bytes in any::<[u8; 32]>()) -> BigUint {
        BigUint::from_bytes_be(&bytes)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn multipliers_agree(k in scalar()) {
        let curve = sm2p256();
        let g = curve.generator();
        let expected = curve.mul(Multiplier::DoubleAndAdd, &k, &g).unwrap();

        for strategy in Multiplier::ALL {
            prop_assert_eq!(&curve.mul(strategy, &k, &g).unwrap(), &expected);
        }
    }

    #[test]
    fn multipliers_agree_on_other_points(j in scalar(), k in scalar()) {
        let curve = sm2p256();
        let j = j % curve.order();
        prop_assume!(j > BigUint::from(1u32));

        let point = curve.mul_by_generator(&j).unwrap();
        let expected = curve.mul(Multiplier::DoubleAndAdd, &k, &point).unwrap();

        for strategy in [Multiplier::Ladder, Multiplier::Simultaneous] {
            prop_assert_eq!(&curve.mul(strategy, &k, &point).unwrap(), &expected);
        }

        prop_assert_eq!(
            curve.mul(Multiplier::FixedBaseWindow, &k, &point),
            Err(primecurve::Error::CurveMismatch)
        );
    }

    #[test]
    fn lincomb_matches_sum(k1 in scalar(), k2 in scalar()) {
        let curve = sm2p256();
        let g = curve.generator();
        let p = curve.mul_by_generator(&BigUint::from(7u32)).unwrap();

        let expected = curve
            .add(
                &curve.mul(Multiplier::DoubleAndAdd, &k1, &g).unwrap(),
                &curve.mul(Multiplier::DoubleAndAdd, &k2, &p).unwrap(),
            )
            .unwrap();

        prop_assert_eq!(&curve.lincomb(&k1, &g, &k2, &p).unwrap(), &expected);
        prop_assert_eq!(&Memo::new(&curve).lincomb(&curve, &k1, &g, &k2, &p).unwrap(), &expected);
    }

    #[test]
    fn inverses_agree(a in scalar()) {
        let curve = sm2p256();
        let p = curve.params().p();
        prop_assume!(&a % p != BigUint::from(0u32));

        let inverse = mod_inverse(&a, p).unwrap();
        prop_assert_eq!(&fermat_inverse(&a, p).unwrap(), &inverse);
        prop_assert_eq!(mod_pow(&a, &BigUint::from(3u32), p).unwrap(), a.modpow(&BigUint::from(3u32), p));
    }
}
