//! Named curve parameter sets.

use primecurve::{Curve, CurveParams};
use std::sync::{Arc, LazyLock};

/// SM2 recommended curve from GM/T 0003.5-2012, a.k.a. `sm2p256v1`.
static SM2P256: LazyLock<Curve> = LazyLock::new(|| {
    load(
        "fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff",
        "fffffffeffffffffffffffffffffffffffffffff00000000fffffffffffffffc",
        "28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93",
        "32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7",
        "bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0",
        "fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123",
    )
});

/// 256-bit prime field curve used by the worked examples of GM/T 0003.5.
static SM2_EXAMPLE_FP256: LazyLock<Curve> = LazyLock::new(|| {
    load(
        "8542d69e4c044f18e8b92435bf6ff7de457283915c45517d722edb8b08f1dfc3",
        "787968b4fa32c3fd2417842e73bbfeff2f3c848b6831d7e0ec65228b3937e498",
        "63e4c6d3b23b0c849cf84241484bfe48f61d59a5b16ba06e6e12d1da27c5249a",
        "421debd61b62eab6746434ebc3cc315e32220b3badd50bdc4c4e6c147fedd43d",
        "0680512bcbb42c07d47349d2153b70c4e5d7fdfcbfa36ea1a85841b9e46e09a2",
        "8542d69e4c044f18e8b92435bf6ff7dd297720630485628d5ae74ee7c32e79b7",
    )
});

/// SM2 recommended 256-bit curve.
///
/// The context, including its fixed-base table, is built on first use and
/// shared afterwards; the returned value is a cheap clone.
pub fn sm2p256() -> Curve {
    SM2P256.clone()
}

/// Example 256-bit curve of GM/T 0003.5 (not for production use).
pub fn sm2_example_fp256() -> Curve {
    SM2_EXAMPLE_FP256.clone()
}

/// Parameters are compile-time constants known to be valid.
#[allow(clippy::panic)]
fn load(p: &str, a: &str, b: &str, gx: &str, gy: &str, n: &str) -> Curve {
    let curve = CurveParams::from_be_hex(p, a, b, gx, gy, n)
        .and_then(|params| Curve::new(Arc::new(params)));

    match curve {
        Ok(curve) => curve,
        Err(err) => panic!("invalid built-in curve parameters: {err}"),
    }
}
