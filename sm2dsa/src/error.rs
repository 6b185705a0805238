//! Error type

use core::fmt::{self, Display};

/// Result type with the `sm2dsa` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// SM2DSA errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Modular arithmetic failed, e.g. an inverse of zero was requested.
    Domain,

    /// Values bound to different curves, or invalid curve parameters.
    Configuration,

    /// Every signing attempt drew a nonce that had to be rejected.
    ExhaustedRetries,

    /// A recovery equation has a zero denominator.
    DegenerateCase,

    /// The random number generator failed.
    Rng,

    /// Secret scalar out of range or public point invalid.
    InvalidKey,

    /// Distinguishing identifier longer than `2^13 - 1` bytes.
    InvalidIdentity,

    /// Malformed signature or key encoding.
    Encoding,

    /// The supplied nonce yields `r = 0`, `r + k = n` or `s = 0`.
    RejectedNonce,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Domain => "modular arithmetic error",
            Self::Configuration => "curve configuration mismatch",
            Self::ExhaustedRetries => "signing retries exhausted",
            Self::DegenerateCase => "degenerate recovery equation",
            Self::Rng => "random number generator failure",
            Self::InvalidKey => "invalid key",
            Self::InvalidIdentity => "distinguishing identifier too long",
            Self::Encoding => "invalid encoding",
            Self::RejectedNonce => "nonce rejected",
        })
    }
}

impl std::error::Error for Error {}

impl From<primecurve::Error> for Error {
    fn from(err: primecurve::Error) -> Self {
        match err {
            primecurve::Error::NotInvertible | primecurve::Error::InvalidModulus => Self::Domain,
            primecurve::Error::InvalidParams | primecurve::Error::CurveMismatch => {
                Self::Configuration
            }
            primecurve::Error::InvalidPoint => Self::InvalidKey,
            primecurve::Error::InvalidEncoding => Self::Encoding,
        }
    }
}

impl From<rand_core::Error> for Error {
    fn from(_: rand_core::Error) -> Self {
        Self::Rng
    }
}

impl From<Error> for signature::Error {
    fn from(err: Error) -> Self {
        signature::Error::from_source(err)
    }
}
