//! Shared test infrastructure for usm-keytools.
//!
//! Provides a toy hash engine with a 4-byte proper length, a fault-injecting
//! engine and scripted random sources.

// Not all test files use all utilities
#![allow(dead_code)]

pub mod faulty;

pub use faulty::{Fault, FaultyEngine};

use std::sync::atomic::{AtomicUsize, Ordering};

use usm_keytools::{
    ArgumentErrorKind, DigestEngine, Error, HashContext, HashEngine, HashTransform, Oid,
    RandomSource, Result, UpstreamErrorKind,
};

/// Arbitrary 10-arc transform OID under an enterprise arc.
pub fn toy_transform() -> Oid {
    usm_keytools::oid!(1, 3, 6, 1, 4, 1, 99999, 1, 1, 1)
}

/// Engine ID used by the toy scenario.
pub const TOY_ENGINE_ID: &[u8] = &[0x80, 0x00, 0x00, 0x00, 0x01];

/// Toy transform: SHA-256 truncated to 4 bytes.
///
/// Any other transform OID is delegated to [`DigestEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ToyEngine;

pub const TOY_PROPER_LENGTH: usize = 4;

struct ToyContext(Box<dyn HashContext>);

impl HashContext for ToyContext {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        self.0.update(data)
    }

    fn finish(self: Box<Self>, out: &mut [u8]) -> Result<usize> {
        if out.len() < TOY_PROPER_LENGTH {
            return Err(Error::InvalidArgument {
                kind: ArgumentErrorKind::BufferTooSmall {
                    needed: TOY_PROPER_LENGTH,
                    capacity: out.len(),
                },
            });
        }
        let mut full = [0u8; 32];
        self.0.finish(&mut full)?;
        out[..TOY_PROPER_LENGTH].copy_from_slice(&full[..TOY_PROPER_LENGTH]);
        Ok(TOY_PROPER_LENGTH)
    }
}

impl HashEngine for ToyEngine {
    fn proper_length(&self, transform: &Oid) -> Result<usize> {
        if *transform == toy_transform() {
            Ok(TOY_PROPER_LENGTH)
        } else {
            DigestEngine.proper_length(transform)
        }
    }

    fn begin(&self, transform: &Oid) -> Result<Box<dyn HashContext>> {
        if *transform == toy_transform() {
            let inner = DigestEngine.begin(&HashTransform::Sha256.oid())?;
            Ok(Box::new(ToyContext(inner)))
        } else {
            DigestEngine.begin(transform)
        }
    }
}

/// Repeats a fixed byte pattern.
#[derive(Debug, Clone)]
pub struct FixedRandom(pub Vec<u8>);

impl RandomSource for FixedRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        for (dst, src) in buf.iter_mut().zip(self.0.iter().cycle()) {
            *dst = *src;
        }
        Ok(buf.len())
    }
}

/// Counts how often it is asked for bytes.
#[derive(Debug, Default)]
pub struct CountingRandom {
    pub calls: AtomicUsize,
}

impl CountingRandom {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RandomSource for CountingRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        buf.fill(0x5A);
        Ok(buf.len())
    }
}

/// Supplies fewer bytes than requested.
#[derive(Debug, Clone, Copy)]
pub struct ShortRandom {
    pub limit: usize,
}

impl RandomSource for ShortRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        let n = self.limit.min(buf.len());
        buf[..n].fill(0xA5);
        Ok(n)
    }
}

/// Always fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingRandom;

impl RandomSource for FailingRandom {
    fn fill(&self, _buf: &mut [u8]) -> Result<usize> {
        Err(Error::Upstream {
            kind: UpstreamErrorKind::RandomFailed,
        })
    }
}
