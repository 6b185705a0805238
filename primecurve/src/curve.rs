//! Arithmetic context for one set of curve parameters.

use crate::{
    AffinePoint, CurveParams, Error, Result, lookup_table::BasepointTable, mul::double_and_add,
};
use core::fmt::{self, Debug};
use num_bigint::BigUint;
use std::sync::Arc;

/// Arithmetic context for a curve.
///
/// Holds the shared [`CurveParams`] and the fixed-base table of multiples of
/// the generator. Both are read-only after construction and reference
/// counted, so cloning a `Curve` is cheap and clones may be sent to other
/// threads.
#[derive(Clone)]
pub struct Curve {
    params: Arc<CurveParams>,
    table: Arc<BasepointTable>,
}

impl Curve {
    /// Default window size of the fixed-base table, in bits.
    pub const DEFAULT_WINDOW: u8 = 4;

    /// Largest supported window size, in bits.
    pub const MAX_WINDOW: u8 = 8;

    /// Create a context with the default window size.
    pub fn new(params: impl Into<Arc<CurveParams>>) -> Result<Self> {
        Self::with_window(params, Self::DEFAULT_WINDOW)
    }

    /// Create a context whose fixed-base table covers `window` bits per
    /// digit, i.e. holds the `2^window` multiples `∞, G, …, (2^window - 1)G`.
    ///
    /// Returns [`Error::InvalidParams`] when the window is out of range or
    /// `n·G ≠ ∞`.
    pub fn with_window(params: impl Into<Arc<CurveParams>>, window: u8) -> Result<Self> {
        if window == 0 || window > Self::MAX_WINDOW {
            return Err(Error::InvalidParams);
        }

        let mut curve = Self {
            params: params.into(),
            table: Arc::default(),
        };

        let generator = curve.params.generator();
        if !double_and_add(&curve, curve.params.n(), &generator)?.is_identity() {
            return Err(Error::InvalidParams);
        }

        curve.table = Arc::new(BasepointTable::new(&curve, window)?);
        Ok(curve)
    }

    /// Borrow the curve parameters.
    pub fn params(&self) -> &CurveParams {
        &self.params
    }

    /// Borrow the shared handle to the curve parameters.
    pub fn shared_params(&self) -> &Arc<CurveParams> {
        &self.params
    }

    /// Base point `G`.
    pub fn generator(&self) -> AffinePoint {
        self.params.generator()
    }

    /// Order `n` of the generator.
    pub fn order(&self) -> &BigUint {
        self.params.n()
    }

    /// Window size of the fixed-base table, in bits.
    pub fn window(&self) -> u8 {
        self.table.window()
    }

    /// Width of a serialized scalar in fixed-width encodings such as
    /// signatures: the larger of the field and order sizes in bytes.
    pub fn scalar_bytes(&self) -> usize {
        self.params.field_bytes().max(self.params.order_bytes())
    }

    /// Do both contexts operate on the same curve?
    pub fn same_curve(&self, other: &Curve) -> bool {
        Arc::ptr_eq(&self.params, &other.params) || self.params == other.params
    }

    /// Validating point constructor.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<AffinePoint> {
        if self.params.satisfies_equation(&x, &y) {
            Ok(AffinePoint::from_coordinates(x, y))
        } else {
            Err(Error::InvalidPoint)
        }
    }

    /// Does `point` lie on this curve? The identity always does.
    pub fn contains(&self, point: &AffinePoint) -> bool {
        match point.coordinates() {
            None => true,
            Some((x, y)) => self.params.satisfies_equation(x, y),
        }
    }

    pub(crate) fn table(&self) -> &BasepointTable {
        &self.table
    }
}

impl Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curve")
            .field("params", &self.params)
            .field("window", &self.table.window())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.same_curve(other)
    }
}

impl Eq for Curve {}
