//! Scalar multiplication.

use crate::{AffinePoint, Curve, Error, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use subtle::{Choice, ConditionallySelectable};

/// Scalar multiplication strategy.
///
/// All strategies compute the same group element for the same inputs. They
/// differ in cost and in whether the sequence of group operations depends on
/// the bits of the scalar.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Multiplier {
    /// Left-to-right binary method. Variable time: public scalars only.
    DoubleAndAdd,

    /// Base-`2^w` digits against the precomputed table of multiples of `G`.
    ///
    /// Only defined for the generator of the curve. There is no windowed
    /// path for arbitrary points.
    FixedBaseWindow,

    /// Montgomery ladder over a fixed number of bits. Use for secret scalars.
    Ladder,

    /// Shamir's trick; `mul` evaluates `k·P + 0·∞`.
    Simultaneous,
}

impl Multiplier {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::DoubleAndAdd,
        Self::FixedBaseWindow,
        Self::Ladder,
        Self::Simultaneous,
    ];

    /// Does the sequence of group operations and table accesses avoid
    /// depending on the scalar's bits?
    pub fn is_secret_safe(self) -> bool {
        matches!(self, Self::FixedBaseWindow | Self::Ladder)
    }
}

impl Curve {
    /// Compute `k·point` with the given strategy.
    ///
    /// Returns [`Error::CurveMismatch`] for [`Multiplier::FixedBaseWindow`]
    /// with any point other than the generator, and [`Error::InvalidPoint`]
    /// when `point` is not on the curve.
    pub fn mul(
        &self,
        strategy: Multiplier,
        k: &BigUint,
        point: &AffinePoint,
    ) -> Result<AffinePoint> {
        if !self.contains(point) {
            return Err(Error::InvalidPoint);
        }

        match strategy {
            Multiplier::DoubleAndAdd => double_and_add(self, k, point),
            Multiplier::FixedBaseWindow => {
                if !self.params().is_generator(point) {
                    return Err(Error::CurveMismatch);
                }
                self.mul_by_generator(k)
            }
            Multiplier::Ladder => self.mul_ladder(k, point),
            Multiplier::Simultaneous => {
                simultaneous(&mut Direct(self), k, point, &BigUint::zero(), &AffinePoint::Identity)
            }
        }
    }

    /// Compute `k·G` from the fixed-base table.
    ///
    /// Every digit costs `w` doublings and one addition, and each table
    /// entry is picked by a full scan.
    pub fn mul_by_generator(&self, k: &BigUint) -> Result<AffinePoint> {
        let table = self.table();
        let window = u64::from(table.window());
        let digits = self.order().bits().max(k.bits()).div_ceil(window);
        let mut acc = AffinePoint::Identity;

        for i in (0..digits).rev() {
            for _ in 0..window {
                acc = self.double(&acc)?;
            }

            acc = self.add(&acc, &table.select(digit(k, i * window, window)))?;
        }

        Ok(acc)
    }

    /// Compute `k·point` with a Montgomery ladder.
    ///
    /// Runs over `max(bits(n), bits(k))` bits with exactly one addition and
    /// one doubling per bit. The two running points are swapped through
    /// their fixed-width encodings under a [`Choice`].
    pub fn mul_ladder(&self, k: &BigUint, point: &AffinePoint) -> Result<AffinePoint> {
        let width = self.params().field_bytes();
        let bits = self.order().bits().max(k.bits());

        let mut r0 = AffinePoint::Identity.to_fixed_bytes(width)?;
        let mut r1 = point.to_fixed_bytes(width)?;

        for i in (0..bits).rev() {
            let choice = Choice::from(u8::from(k.bit(i)));
            conditional_swap(&mut r0, &mut r1, choice);

            let p0 = AffinePoint::from_fixed_bytes(&r0, width);
            let p1 = AffinePoint::from_fixed_bytes(&r1, width);
            r1 = self.add(&p0, &p1)?.to_fixed_bytes(width)?;
            r0 = self.double(&p0)?.to_fixed_bytes(width)?;

            conditional_swap(&mut r0, &mut r1, choice);
        }

        Ok(AffinePoint::from_fixed_bytes(&r0, width))
    }

    /// Compute `k1·p1 + k2·p2` with Shamir's trick.
    pub fn lincomb(
        &self,
        k1: &BigUint,
        p1: &AffinePoint,
        k2: &BigUint,
        p2: &AffinePoint,
    ) -> Result<AffinePoint> {
        if !self.contains(p1) || !self.contains(p2) {
            return Err(Error::InvalidPoint);
        }

        simultaneous(&mut Direct(self), k1, p1, k2, p2)
    }
}

/// Group operations used by the generic multipliers.
pub(crate) trait PointOps {
    fn add(&mut self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint>;
    fn double(&mut self, point: &AffinePoint) -> Result<AffinePoint>;
}

/// Uncached group operations.
struct Direct<'a>(&'a Curve);

impl PointOps for Direct<'_> {
    fn add(&mut self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
        self.0.add(lhs, rhs)
    }

    fn double(&mut self, point: &AffinePoint) -> Result<AffinePoint> {
        self.0.double(point)
    }
}

pub(crate) fn double_and_add(
    curve: &Curve,
    k: &BigUint,
    point: &AffinePoint,
) -> Result<AffinePoint> {
    double_and_add_with(&mut Direct(curve), k, point)
}

/// Left-to-right binary method: one doubling per bit, one addition per set
/// bit.
pub(crate) fn double_and_add_with<O: PointOps>(
    ops: &mut O,
    k: &BigUint,
    point: &AffinePoint,
) -> Result<AffinePoint> {
    let mut acc = AffinePoint::Identity;

    for i in (0..k.bits()).rev() {
        acc = ops.double(&acc)?;

        if k.bit(i) {
            acc = ops.add(&acc, point)?;
        }
    }

    Ok(acc)
}

/// Shamir's trick over the table `{∞, p1, p2, p1 + p2}` indexed by
/// `(bit_i(k1), bit_i(k2))`.
pub(crate) fn simultaneous<O: PointOps>(
    ops: &mut O,
    k1: &BigUint,
    p1: &AffinePoint,
    k2: &BigUint,
    p2: &AffinePoint,
) -> Result<AffinePoint> {
    let table = [
        AffinePoint::Identity,
        p1.clone(),
        p2.clone(),
        ops.add(p1, p2)?,
    ];

    let mut acc = AffinePoint::Identity;

    for i in (0..k1.bits().max(k2.bits())).rev() {
        acc = ops.double(&acc)?;

        let index = usize::from(k1.bit(i)) | (usize::from(k2.bit(i)) << 1);
        if index != 0 {
            acc = ops.add(&acc, &table[index])?;
        }
    }

    Ok(acc)
}

/// Extract the `window`-bit digit of `k` starting at bit `offset`.
fn digit(k: &BigUint, offset: u64, window: u64) -> usize {
    (0..window).fold(0usize, |acc, j| acc | (usize::from(k.bit(offset + j)) << j))
}

fn conditional_swap(a: &mut [u8], b: &mut [u8], choice: Choice) {
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        u8::conditional_swap(x, y, choice);
    }
}
