//! Random byte capability.
//!
//! KeyChange encoding needs a fresh random delta for every update. The
//! source is a [`RandomSource`] so callers can plug in their own entropy
//! (or a deterministic source in tests); [`OsRandom`] uses the operating
//! system CSPRNG via `getrandom`.

use crate::error::{Error, Result, UpstreamErrorKind};

/// Source of cryptographically suitable random bytes.
pub trait RandomSource {
    /// Fill `buf` with random bytes.
    ///
    /// Returns the number of bytes actually supplied, counted from the front
    /// of `buf`. Callers treat anything short of `buf.len()` as a failure.
    fn fill(&self, buf: &mut [u8]) -> Result<usize>;
}

/// Operating system random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        let requested = buf.len();
        getrandom::fill(buf).map_err(|e| {
            tracing::warn!(
                target: "usm_keytools::random",
                { usm.requested = requested, error = %e },
                "OS random source failed"
            );
            Error::upstream(UpstreamErrorKind::RandomFailed)
        })?;
        Ok(requested)
    }
}
