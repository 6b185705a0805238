//! Curve domain parameters.

use crate::{AffinePoint, Error, Result, field};
use num_bigint::BigUint;
use num_traits::Zero;

/// Domain parameters of a short Weierstrass curve `y² = x³ + ax + b` over
/// `𝔽ₚ` with a base point `G` of prime order `n`.
///
/// Parameters are validated once at construction and are immutable
/// afterwards. Share them between contexts with [`Arc`][std::sync::Arc]
/// (see [`Curve`][crate::Curve]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CurveParams {
    p: BigUint,
    a: BigUint,
    b: BigUint,
    gx: BigUint,
    gy: BigUint,
    n: BigUint,
}

impl CurveParams {
    /// Validate and create curve parameters.
    ///
    /// Checks that `p > 3` and `n` are prime, that `a` and `b` are reduced
    /// and give a non-singular curve, and that `G` satisfies the curve
    /// equation. That `n` is the order of `G` is checked by
    /// [`Curve::new`][crate::Curve::new], which has the arithmetic to do so.
    ///
    /// Primality is established with Miller-Rabin
    /// ([`field::is_probable_prime`]), which large composites crafted against
    /// it may still pass. Parameters are assumed to come from a trusted
    /// source such as a published standard.
    pub fn new(
        p: BigUint,
        a: BigUint,
        b: BigUint,
        gx: BigUint,
        gy: BigUint,
        n: BigUint,
    ) -> Result<Self> {
        if p <= BigUint::from(3u32) || !field::is_probable_prime(&p) {
            return Err(Error::InvalidParams);
        }

        if a >= p || b >= p || gx >= p || gy >= p {
            return Err(Error::InvalidParams);
        }

        if !field::is_probable_prime(&n) {
            return Err(Error::InvalidParams);
        }

        let params = Self { p, a, b, gx, gy, n };

        // 4a³ + 27b² ≠ 0
        let discriminant = (BigUint::from(4u32) * params.a.modpow(&BigUint::from(3u32), &params.p)
            + BigUint::from(27u32) * &params.b * &params.b)
            % &params.p;

        if discriminant.is_zero() || !params.satisfies_equation(&params.gx, &params.gy) {
            return Err(Error::InvalidParams);
        }

        Ok(params)
    }

    /// Parse parameters from big endian hexadecimal strings.
    pub fn from_be_hex(p: &str, a: &str, b: &str, gx: &str, gy: &str, n: &str) -> Result<Self> {
        Self::new(
            parse_hex(p)?,
            parse_hex(a)?,
            parse_hex(b)?,
            parse_hex(gx)?,
            parse_hex(gy)?,
            parse_hex(n)?,
        )
    }

    /// Field modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Coefficient `a` in the curve equation.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Coefficient `b` in the curve equation.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Generator x-coordinate.
    pub fn gx(&self) -> &BigUint {
        &self.gx
    }

    /// Generator y-coordinate.
    pub fn gy(&self) -> &BigUint {
        &self.gy
    }

    /// Order `n` of the generator.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Base point `G`.
    pub fn generator(&self) -> AffinePoint {
        AffinePoint::from_coordinates(self.gx.clone(), self.gy.clone())
    }

    /// Is `point` the base point of these parameters?
    pub fn is_generator(&self, point: &AffinePoint) -> bool {
        point.coordinates() == Some((&self.gx, &self.gy))
    }

    /// Size of a serialized field element in bytes: `⌈bits(p) / 8⌉`.
    pub fn field_bytes(&self) -> usize {
        field::byte_len(&self.p)
    }

    /// Size of a serialized scalar in bytes: `⌈bits(n) / 8⌉`.
    pub fn order_bytes(&self) -> usize {
        field::byte_len(&self.n)
    }

    /// `y² ≡ x³ + ax + b (mod p)` for reduced coordinates.
    pub(crate) fn satisfies_equation(&self, x: &BigUint, y: &BigUint) -> bool {
        if *x >= self.p || *y >= self.p {
            return false;
        }

        let lhs = y * y % &self.p;
        let rhs = (x * x % &self.p * x + &self.a * x + &self.b) % &self.p;
        lhs == rhs
    }
}

fn parse_hex(hex: &str) -> Result<BigUint> {
    BigUint::parse_bytes(hex.as_bytes(), 16).ok_or(Error::InvalidEncoding)
}
