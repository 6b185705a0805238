//! Affine curve points.

use crate::{Result, field};
use num_bigint::BigUint;

/// Point on a short Weierstrass curve in affine coordinates.
///
/// Values are never mutated in place: every group operation returns a new
/// point. Coordinates are reduced modulo `p` when produced by a [`Curve`]
/// and equality is plain coordinate equality.
///
/// [`Curve`]: crate::Curve
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AffinePoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    #[default]
    Identity,

    /// Any other point.
    Finite {
        /// x-coordinate
        x: BigUint,

        /// y-coordinate
        y: BigUint,
    },
}

impl AffinePoint {
    /// Create a point from its coordinates without checking the curve
    /// equation. See [`Curve::point`] for the validating constructor.
    ///
    /// [`Curve::point`]: crate::Curve::point
    pub fn from_coordinates(x: BigUint, y: BigUint) -> Self {
        Self::Finite { x, y }
    }

    /// Is this point the point at infinity?
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Borrow the x-coordinate, if any.
    pub fn x(&self) -> Option<&BigUint> {
        self.coordinates().map(|(x, _)| x)
    }

    /// Borrow the y-coordinate, if any.
    pub fn y(&self) -> Option<&BigUint> {
        self.coordinates().map(|(_, y)| y)
    }

    /// Borrow both coordinates, or `None` for the identity.
    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            Self::Identity => None,
            Self::Finite { x, y } => Some((x, y)),
        }
    }

    /// Fixed-width encoding `flag ‖ x ‖ y` used for constant-time selection.
    ///
    /// The identity encodes as all zeroes.
    pub(crate) fn to_fixed_bytes(&self, width: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(1 + 2 * width);

        match self {
            Self::Identity => out.resize(1 + 2 * width, 0),
            Self::Finite { x, y } => {
                out.push(1);
                out.extend_from_slice(&field::to_be_bytes_padded(x, width)?);
                out.extend_from_slice(&field::to_be_bytes_padded(y, width)?);
            }
        }

        Ok(out)
    }

    /// Inverse of [`AffinePoint::to_fixed_bytes`].
    pub(crate) fn from_fixed_bytes(bytes: &[u8], width: usize) -> Self {
        match bytes.split_first() {
            Some((1, coords)) if coords.len() == 2 * width => {
                let (x, y) = coords.split_at(width);
                Self::Finite {
                    x: BigUint::from_bytes_be(x),
                    y: BigUint::from_bytes_be(y),
                }
            }
            _ => Self::Identity,
        }
    }
}
