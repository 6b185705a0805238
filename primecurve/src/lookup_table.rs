use crate::{AffinePoint, Curve, Result};
use subtle::{ConditionallySelectable, ConstantTimeEq};

/// Precomputed multiples `[∞, G, 2G, ..., (2^w - 1)G]` of the generator.
///
/// Entries are also kept in their fixed-width encoding so that a lookup can
/// scan the whole table and select the wanted entry byte by byte.
#[derive(Clone, Debug, Default)]
pub(crate) struct BasepointTable {
    window: u8,
    width: usize,
    points: Vec<AffinePoint>,
    encoded: Vec<Vec<u8>>,
}

impl BasepointTable {
    /// Compute the table for `curve` with `window` bits per digit.
    pub(crate) fn new(curve: &Curve, window: u8) -> Result<Self> {
        let width = curve.params().field_bytes();
        let generator = curve.generator();
        let len = 1usize << window;

        let mut points = Vec::with_capacity(len);
        points.push(AffinePoint::Identity);

        for j in 1..len {
            let next = curve.add(&points[j - 1], &generator)?;
            points.push(next);
        }

        let encoded = points
            .iter()
            .map(|point| point.to_fixed_bytes(width))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            window,
            width,
            points,
            encoded,
        })
    }

    /// Bits per digit.
    pub(crate) fn window(&self) -> u8 {
        self.window
    }

    /// Number of entries, `2^w`.
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, digit: usize) -> Option<&AffinePoint> {
        self.points.get(digit)
    }

    /// Given `0 <= digit < 2^w`, returns `digit·G`, touching every entry.
    pub(crate) fn select(&self, digit: usize) -> AffinePoint {
        debug_assert!(digit < self.len());

        let mut t = vec![0u8; 1 + 2 * self.width];

        for (j, entry) in self.encoded.iter().enumerate() {
            let c = j.ct_eq(&digit);

            for (dst, src) in t.iter_mut().zip(entry) {
                dst.conditional_assign(src, c);
            }
        }

        AffinePoint::from_fixed_bytes(&t, self.width)
    }
}
