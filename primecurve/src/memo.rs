//! Memoized variable-time arithmetic.

use crate::{
    AffinePoint, Curve, CurveParams, Error, Result, field,
    mul::{self, PointOps},
};
use num_bigint::BigUint;
use std::{collections::HashMap, sync::Arc};

/// Cache of modular inverses and point sums for one curve.
///
/// A `Memo` is an owned value meant to live for one computation, e.g. one
/// signature verification. It remembers the parameters it was created for
/// and returns [`Error::CurveMismatch`] when handed a [`Curve`] over
/// different parameters, so cached results never leak between curves.
///
/// Only public values should pass through a `Memo`: lookups take variable
/// time. The ladder is never memoized.
#[derive(Clone, Debug)]
pub struct Memo {
    params: Arc<CurveParams>,
    inverses: HashMap<(BigUint, BigUint), BigUint>,
    sums: HashMap<(AffinePoint, AffinePoint), AffinePoint>,
}

impl Memo {
    /// Create an empty cache bound to `curve`.
    pub fn new(curve: &Curve) -> Self {
        Self {
            params: Arc::clone(curve.shared_params()),
            inverses: HashMap::new(),
            sums: HashMap::new(),
        }
    }

    /// Cached [`field::mod_inverse`].
    pub fn invert(&mut self, a: &BigUint, m: &BigUint) -> Result<BigUint> {
        cached_inverse(&mut self.inverses, a, m)
    }

    /// Cached [`Curve::add`].
    pub fn add(
        &mut self,
        curve: &Curve,
        lhs: &AffinePoint,
        rhs: &AffinePoint,
    ) -> Result<AffinePoint> {
        self.check(curve)?;

        let key = (lhs.clone(), rhs.clone());
        if let Some(sum) = self.sums.get(&key) {
            return Ok(sum.clone());
        }

        let p = curve.params().p();
        let inverses = &mut self.inverses;
        let sum = curve.add_with(lhs, rhs, |v| cached_inverse(inverses, v, p))?;
        self.sums.insert(key, sum.clone());
        Ok(sum)
    }

    /// Cached [`Curve::double`].
    pub fn double(&mut self, curve: &Curve, point: &AffinePoint) -> Result<AffinePoint> {
        self.add(curve, point, point)
    }

    /// Double-and-add through the cache.
    pub fn mul(&mut self, curve: &Curve, k: &BigUint, point: &AffinePoint) -> Result<AffinePoint> {
        self.check(curve)?;
        if !curve.contains(point) {
            return Err(Error::InvalidPoint);
        }

        mul::double_and_add_with(&mut Cached { curve, memo: self }, k, point)
    }

    /// Simultaneous `k1·p1 + k2·p2` through the cache.
    pub fn lincomb(
        &mut self,
        curve: &Curve,
        k1: &BigUint,
        p1: &AffinePoint,
        k2: &BigUint,
        p2: &AffinePoint,
    ) -> Result<AffinePoint> {
        self.check(curve)?;
        if !curve.contains(p1) || !curve.contains(p2) {
            return Err(Error::InvalidPoint);
        }

        mul::simultaneous(&mut Cached { curve, memo: self }, k1, p1, k2, p2)
    }

    /// Number of cached inverses.
    pub fn cached_inverses(&self) -> usize {
        self.inverses.len()
    }

    /// Number of cached point sums.
    pub fn cached_sums(&self) -> usize {
        self.sums.len()
    }

    /// Drop every cached entry.
    pub fn clear(&mut self) {
        self.inverses.clear();
        self.sums.clear();
    }

    fn check(&self, curve: &Curve) -> Result<()> {
        if Arc::ptr_eq(&self.params, curve.shared_params()) || *self.params == *curve.params() {
            Ok(())
        } else {
            Err(Error::CurveMismatch)
        }
    }
}

fn cached_inverse(
    cache: &mut HashMap<(BigUint, BigUint), BigUint>,
    a: &BigUint,
    m: &BigUint,
) -> Result<BigUint> {
    let key = (a.clone(), m.clone());
    if let Some(inverse) = cache.get(&key) {
        return Ok(inverse.clone());
    }

    let inverse = field::mod_inverse(a, m)?;
    cache.insert(key, inverse.clone());
    Ok(inverse)
}

struct Cached<'a> {
    curve: &'a Curve,
    memo: &'a mut Memo,
}

impl PointOps for Cached<'_> {
    fn add(&mut self, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
        self.memo.add(self.curve, lhs, rhs)
    }

    fn double(&mut self, point: &AffinePoint) -> Result<AffinePoint> {
        self.memo.double(self.curve, point)
    }
}
