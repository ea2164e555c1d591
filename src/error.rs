//! Error conditions exposed by the KangarooTwelve core.

use core::fmt;

/// The three synchronous error conditions of the KangarooTwelve core.
///
/// `CapabilityRaceViolation` (mutating the dispatch capability flags while
/// a [`crate::KangarooTwelve`] instance exists) is deliberately not a
/// variant here: the specification calls it implementer-defined undefined
/// behavior, not a recoverable error, so there is nothing to detect or
/// return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `update`/`final` called after the instance left the ABSORBING
    /// phase, or `squeeze` called before `final` or on an instance
    /// initialized with a nonzero output length.
    WrongPhase,
    /// `k12_oneshot`/[`crate::KangarooTwelve::oneshot`] called with
    /// `output_len == 0`: ambiguous between streaming and empty output.
    ZeroLengthRequest,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WrongPhase => f.write_str("operation not valid in the instance's current phase"),
            Error::ZeroLengthRequest => {
                f.write_str("oneshot requires output_len > 0; use streaming squeeze for output_len == 0")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
