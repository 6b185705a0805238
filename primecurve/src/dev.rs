//! Development-related functionality.
//!
//! Small curves whose multiples can be checked by hand. Never use them for
//! anything but tests.

use crate::{Curve, CurveParams};

/// `y² = x³ + 2x + 2` over `𝔽₁₇` with `G = (5, 1)` of order 19.
///
/// ```text
/// 1G = (5, 1)   2G = (6, 3)   3G = (10, 6)   18G = (5, 16)
/// ```
pub fn toy_curve() -> Curve {
    load("11", "2", "2", "5", "1", "13")
}

/// `y² = x³ + 2x + 3` over `𝔽₉₇` with `G = (3, 6)` of order 5.
///
/// ```text
/// 1G = (3, 6)   2G = (80, 10)   3G = (80, 87)   4G = (3, 91)
/// ```
pub fn toy_curve_97() -> Curve {
    load("61", "2", "3", "3", "6", "5")
}

#[allow(clippy::unwrap_used)]
fn load(p: &str, a: &str, b: &str, gx: &str, gy: &str, n: &str) -> Curve {
    Curve::new(CurveParams::from_be_hex(p, a, b, gx, gy, n).unwrap()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::{toy_curve, toy_curve_97};
    use crate::{AffinePoint, Multiplier};
    use num_bigint::BigUint;

    #[test]
    fn documented_multiples() {
        let curve = toy_curve_97();
        let expected = [(80u32, 10u32), (80, 87), (3, 91)];

        for (k, (x, y)) in (2u32..).zip(expected) {
            let point = curve
                .mul(Multiplier::DoubleAndAdd, &BigUint::from(k), &curve.generator())
                .unwrap();
            assert_eq!(point, AffinePoint::from_coordinates(x.into(), y.into()));
        }

        assert_eq!(toy_curve().order(), &BigUint::from(19u32));
    }
}
