//! Group law in affine coordinates.
//!
//! ```text
//! λ = (y₂ - y₁) / (x₂ - x₁)      P ≠ ±Q
//! λ = (3x₁² + a) / 2y₁           P = Q
//! x₃ = λ² - x₁ - x₂
//! y₃ = λ(x₁ - x₃) - y₁
//! ```

use crate::{
    AffinePoint, Curve, Result,
    field::{mod_inverse, mul_mod, neg_mod, sub_mod},
};
use num_bigint::BigUint;
use num_traits::Zero;

impl Curve {
    /// Returns `lhs + rhs`.
    pub fn add(&self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
        let p = self.params().p();
        self.add_with(lhs, rhs, |v| mod_inverse(v, p))
    }

    /// Returns `point + point`.
    pub fn double(&self, point: &AffinePoint) -> Result<AffinePoint> {
        let p = self.params().p();
        self.double_with(point, |v| mod_inverse(v, p))
    }

    /// Returns `-point`, i.e. `(x, -y mod p)`.
    pub fn neg(&self, point: &AffinePoint) -> AffinePoint {
        match point.coordinates() {
            None => AffinePoint::Identity,
            Some((x, y)) => AffinePoint::from_coordinates(x.clone(), neg_mod(y, self.params().p())),
        }
    }

    /// Returns `lhs - rhs`.
    pub fn sub(&self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
        self.add(lhs, &self.neg(rhs))
    }

    /// Addition with a caller-provided inversion routine in `𝔽ₚ`.
    pub(crate) fn add_with<F>(
        &self,
        lhs: &AffinePoint,
        rhs: &AffinePoint,
        mut invert: F,
    ) -> Result<AffinePoint>
    where
        F: FnMut(&BigUint) -> Result<BigUint>,
    {
        let Some((x1, y1)) = lhs.coordinates() else {
            return Ok(rhs.clone());
        };
        let Some((x2, y2)) = rhs.coordinates() else {
            return Ok(lhs.clone());
        };

        if x1 == x2 {
            return if y1 == y2 {
                self.double_with(lhs, invert)
            } else {
                Ok(AffinePoint::Identity)
            };
        }

        let p = self.params().p();
        let lambda = mul_mod(&sub_mod(y2, y1, p), &invert(&sub_mod(x2, x1, p))?, p);
        Ok(self.chord(&lambda, x1, y1, x2))
    }

    /// Doubling with a caller-provided inversion routine in `𝔽ₚ`.
    pub(crate) fn double_with<F>(&self, point: &AffinePoint, mut invert: F) -> Result<AffinePoint>
    where
        F: FnMut(&BigUint) -> Result<BigUint>,
    {
        let Some((x, y)) = point.coordinates() else {
            return Ok(AffinePoint::Identity);
        };

        // vertical tangent: point of order two
        if y.is_zero() {
            return Ok(AffinePoint::Identity);
        }

        let p = self.params().p();
        let numerator = (BigUint::from(3u32) * x * x + self.params().a()) % p;
        let denominator = (y << 1u32) % p;
        let lambda = mul_mod(&numerator, &invert(&denominator)?, p);
        Ok(self.chord(&lambda, x, y, x))
    }

    /// Third intersection of the line with slope `λ` through `(x₁, y₁)`,
    /// reflected over the x-axis.
    fn chord(&self, lambda: &BigUint, x1: &BigUint, y1: &BigUint, x2: &BigUint) -> AffinePoint {
        let p = self.params().p();
        let x3 = sub_mod(&sub_mod(&mul_mod(lambda, lambda, p), x1, p), x2, p);
        let y3 = sub_mod(&mul_mod(lambda, &sub_mod(x1, &x3, p), p), y1, p);
        AffinePoint::from_coordinates(x3, y3)
    }
}
