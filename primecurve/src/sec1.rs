//! SEC1 point encoding.
//!
//! ```text
//! identity      00
//! compressed    02 ‖ x   (y even)
//!               03 ‖ x   (y odd)
//! uncompressed  04 ‖ x ‖ y
//! ```

use crate::{AffinePoint, Curve, Error, Result, field};
use num_bigint::BigUint;

const TAG_IDENTITY: u8 = 0x00;
const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

impl Curve {
    /// Serialize `point` in SEC1 form, with coordinates padded to the field
    /// width.
    pub fn to_sec1_bytes(&self, point: &AffinePoint, compress: bool) -> Result<Vec<u8>> {
        let width = self.params().field_bytes();

        let Some((x, y)) = point.coordinates() else {
            return Ok(vec![TAG_IDENTITY]);
        };

        let mut out = Vec::with_capacity(1 + 2 * width);

        if compress {
            out.push(if y.bit(0) {
                TAG_COMPRESSED_ODD
            } else {
                TAG_COMPRESSED_EVEN
            });
            out.extend_from_slice(&field::to_be_bytes_padded(x, width)?);
        } else {
            out.push(TAG_UNCOMPRESSED);
            out.extend_from_slice(&field::to_be_bytes_padded(x, width)?);
            out.extend_from_slice(&field::to_be_bytes_padded(y, width)?);
        }

        Ok(out)
    }

    /// Parse a SEC1-encoded point and check that it lies on the curve.
    ///
    /// Compressed points are only supported when `p ≡ 3 (mod 4)`; otherwise
    /// they are rejected with [`Error::InvalidEncoding`].
    pub fn from_sec1_bytes(&self, bytes: &[u8]) -> Result<AffinePoint> {
        let width = self.params().field_bytes();
        let (&tag, body) = bytes.split_first().ok_or(Error::InvalidEncoding)?;

        match tag {
            TAG_IDENTITY if body.is_empty() => Ok(AffinePoint::Identity),
            TAG_UNCOMPRESSED if body.len() == 2 * width => {
                let (x, y) = body.split_at(width);
                self.point(BigUint::from_bytes_be(x), BigUint::from_bytes_be(y))
            }
            TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD if body.len() == width => {
                self.decompress(BigUint::from_bytes_be(body), tag == TAG_COMPRESSED_ODD)
            }
            _ => Err(Error::InvalidEncoding),
        }
    }

    /// Recover `y` from `x` and its parity.
    fn decompress(&self, x: BigUint, odd: bool) -> Result<AffinePoint> {
        let params = self.params();
        let p = params.p();

        if p % 4u32 != BigUint::from(3u32) {
            return Err(Error::InvalidEncoding);
        }

        if x >= *p {
            return Err(Error::InvalidPoint);
        }

        let rhs = (&x * &x % p * &x + params.a() * &x + params.b()) % p;
        let mut y = field::sqrt_3_mod_4(&rhs, p).ok_or(Error::InvalidPoint)?;

        if y.bit(0) != odd {
            y = field::neg_mod(&y, p);

            // y = 0 has no odd twin
            if y.bit(0) != odd {
                return Err(Error::InvalidPoint);
            }
        }

        self.point(x, y)
    }
}
