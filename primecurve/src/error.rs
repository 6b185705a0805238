//! Error type

use core::fmt::{self, Display};

/// Result type with the `primecurve` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Curve arithmetic errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The operand has no inverse modulo the modulus: it is zero, or it
    /// shares a factor with the modulus.
    NotInvertible,

    /// The modulus is zero or one.
    InvalidModulus,

    /// Curve parameters failed validation.
    InvalidParams,

    /// The point does not satisfy the curve equation.
    InvalidPoint,

    /// Malformed or oversized encoding.
    InvalidEncoding,

    /// A value bound to one set of curve parameters was used with another.
    CurveMismatch,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotInvertible => "value is not invertible modulo the modulus",
            Self::InvalidModulus => "modulus must be at least 2",
            Self::InvalidParams => "invalid curve parameters",
            Self::InvalidPoint => "point is not on the curve",
            Self::InvalidEncoding => "invalid encoding",
            Self::CurveMismatch => "value belongs to different curve parameters",
        })
    }
}

impl std::error::Error for Error {}
