//! Error types for usm-keytools.
//!
//! This module provides:
//!
//! - [`Error`] - The error type returned by every key operation
//! - [`ArgumentErrorKind`] - Details for malformed or mismatched inputs
//! - [`UpstreamErrorKind`] - Failures reported by the hash engine or random source
//! - [`ErrorCategory`] and [`Status`] - Coarse classifications for callers that
//!   only need to know *what kind* of failure happened
//!
//! # Error Handling
//!
//! Every operation either succeeds, fails generically, or fails because the
//! requested hash transform is not available. [`Status`] captures exactly that
//! three-way outcome:
//!
//! ```
//! use usm_keytools::{HashTransform, KeyTools, Status};
//!
//! let tools = KeyTools::new();
//! let result = tools.master_key(&HashTransform::Md5.oid(), b"short");
//! assert_eq!(Status::of(&result), Status::GenErr);
//! ```

use crate::oid::Oid;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid argument error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentErrorKind {
    /// A required byte sequence was empty.
    Empty { what: &'static str },
    /// OID text could not be parsed.
    MalformedOid,
    /// Transform OID does not have the fixed transform length.
    TransformLength { expected: usize, actual: usize },
    /// Destination buffer cannot hold the result.
    BufferTooSmall { needed: usize, capacity: usize },
    /// Key is shorter than the transform's proper length.
    KeyTooShort { needed: usize, actual: usize },
    /// Old and new key lengths differ.
    KeyLengthMismatch { old: usize, new: usize },
    /// KeyChange string is not exactly twice the old key length.
    KeyChangeLength { expected: usize, actual: usize },
    /// Key is longer than the transform digest can cover.
    KeyLongerThanDigest { key_len: usize, digest_len: usize },
    /// Localization input would exceed the working buffer limit.
    InputTooLarge { length: usize, max: usize },
}

impl std::fmt::Display for ArgumentErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { what } => write!(f, "{} must not be empty", what),
            Self::MalformedOid => write!(f, "malformed OID"),
            Self::TransformLength { expected, actual } => write!(
                f,
                "transform OID must have {} arcs, got {}",
                expected, actual
            ),
            Self::BufferTooSmall { needed, capacity } => write!(
                f,
                "output buffer too small: need {} bytes, have {}",
                needed, capacity
            ),
            Self::KeyTooShort { needed, actual } => {
                write!(f, "key too short: need {} bytes, got {}", needed, actual)
            }
            Self::KeyLengthMismatch { old, new } => write!(
                f,
                "old key is {} bytes but new key is {} bytes",
                old, new
            ),
            Self::KeyChangeLength { expected, actual } => write!(
                f,
                "KeyChange string must be {} bytes, got {}",
                expected, actual
            ),
            Self::KeyLongerThanDigest {
                key_len,
                digest_len,
            } => write!(
                f,
                "{}-byte key exceeds {}-byte transform digest",
                key_len, digest_len
            ),
            Self::InputTooLarge { length, max } => {
                write!(f, "input of {} bytes exceeds maximum {}", length, max)
            }
        }
    }
}

/// Failures reported by a hash engine or random source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// The hash engine reported an error.
    HashFailed,
    /// The hash engine produced fewer bytes than its proper length.
    ShortDigest { expected: usize, actual: usize },
    /// The random source reported an error.
    RandomFailed,
    /// The random source supplied fewer bytes than requested.
    ShortRandom { requested: usize, supplied: usize },
}

impl std::fmt::Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashFailed => write!(f, "hash engine failed"),
            Self::ShortDigest { expected, actual } => write!(
                f,
                "hash engine produced {} bytes, expected {}",
                actual, expected
            ),
            Self::RandomFailed => write!(f, "random source failed"),
            Self::ShortRandom {
                requested,
                supplied,
            } => write!(
                f,
                "random source supplied {} of {} requested bytes",
                supplied, requested
            ),
        }
    }
}

/// The error type for all key operations.
///
/// # Example
///
/// ```
/// use usm_keytools::{Error, ErrorCategory, HashTransform, KeyTools};
///
/// let tools = KeyTools::new();
/// let err = tools
///     .master_key(&HashTransform::Sha1.oid(), b"1234567")
///     .unwrap_err();
///
/// assert!(matches!(err, Error::PassphraseTooShort { len: 7, min: 8 }));
/// assert_eq!(err.category(), ErrorCategory::PolicyViolation);
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Missing, malformed or mismatched input.
    #[error("invalid argument: {kind}")]
    InvalidArgument { kind: ArgumentErrorKind },

    /// Passphrase is below the USM minimum length.
    #[error("passphrase is {len} bytes; minimum is {min}")]
    PassphraseTooShort { len: usize, min: usize },

    /// The hash engine cannot provide the requested transform.
    #[error("hash transform {transform} is not available")]
    TransformUnavailable { transform: Oid },

    /// The hash engine or random source failed.
    #[error("upstream failure: {kind}")]
    Upstream { kind: UpstreamErrorKind },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing, malformed or mismatched input.
    InvalidArgument,
    /// Input violated a security policy (passphrase length).
    PolicyViolation,
    /// The requested transform could not be resolved to a working engine.
    CapabilityUnavailable,
    /// A collaborator reported an error of its own.
    UpstreamFailure,
}

/// Three-way operation outcome.
///
/// Mirrors the classic `SNMPERR_SUCCESS` / `SNMPERR_GENERR` /
/// `SNMPERR_KT_NOT_AVAILABLE` return codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The operation succeeded.
    Success,
    /// Any failure other than an unavailable transform.
    GenErr,
    /// The hash capability could not be instantiated for the transform.
    NotAvailable,
}

impl Status {
    /// Classify an operation result.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(e) => e.status(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::GenErr => write!(f, "genErr"),
            Self::NotAvailable => write!(f, "notAvailable"),
        }
    }
}

impl Error {
    pub(crate) fn invalid(kind: ArgumentErrorKind) -> Self {
        Self::InvalidArgument { kind }
    }

    pub(crate) fn upstream(kind: UpstreamErrorKind) -> Self {
        Self::Upstream { kind }
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } | Self::Config(_) => ErrorCategory::InvalidArgument,
            Self::PassphraseTooShort { .. } => ErrorCategory::PolicyViolation,
            Self::TransformUnavailable { .. } => ErrorCategory::CapabilityUnavailable,
            Self::Upstream { .. } => ErrorCategory::UpstreamFailure,
        }
    }

    /// The three-way status code for this error.
    pub fn status(&self) -> Status {
        match self.category() {
            ErrorCategory::CapabilityUnavailable => Status::NotAvailable,
            _ => Status::GenErr,
        }
    }
}
