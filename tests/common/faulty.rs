//! Fault-injecting hash engine.
//!
//! Wraps [`DigestEngine`] and breaks it in one configurable way, to exercise
//! the upstream failure paths of every key operation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use usm_keytools::{DigestEngine, Error, HashContext, HashEngine, Oid, Result, UpstreamErrorKind};

/// How a [`FaultyEngine`] misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `update` succeeds this many times, then fails with `HashFailed`.
    FailUpdateAfter(usize),
    /// `finish` writes and reports only this many bytes.
    ShortFinish(usize),
}

/// A [`DigestEngine`] with an injected fault.
///
/// Proper lengths are reported truthfully; only streaming misbehaves.
#[derive(Debug, Clone)]
pub struct FaultyEngine {
    fault: Fault,
    updates: Arc<AtomicUsize>,
}

impl FaultyEngine {
    /// Fail every `update` after the first `n`.
    pub fn fail_update_after(n: usize) -> Self {
        Self::new(Fault::FailUpdateAfter(n))
    }

    /// Report a digest of only `n` bytes.
    pub fn short_finish(n: usize) -> Self {
        Self::new(Fault::ShortFinish(n))
    }

    fn new(fault: Fault) -> Self {
        Self {
            fault,
            updates: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Successful `update` calls across all contexts so far.
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

struct FaultyContext {
    inner: Box<dyn HashContext>,
    fault: Fault,
    updates: Arc<AtomicUsize>,
}

impl HashContext for FaultyContext {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        match self.fault {
            Fault::FailUpdateAfter(n) if self.updates.load(Ordering::SeqCst) >= n => {
                return Err(Error::Upstream {
                    kind: UpstreamErrorKind::HashFailed,
                });
            }
            _ => {}
        }
        self.inner.update(data)?;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn finish(self: Box<Self>, out: &mut [u8]) -> Result<usize> {
        match self.fault {
            Fault::ShortFinish(n) => {
                let n = n.min(out.len());
                out[..n].fill(0xEE);
                Ok(n)
            }
            Fault::FailUpdateAfter(_) => self.inner.finish(out),
        }
    }
}

impl HashEngine for FaultyEngine {
    fn proper_length(&self, transform: &Oid) -> Result<usize> {
        DigestEngine.proper_length(transform)
    }

    fn begin(&self, transform: &Oid) -> Result<Box<dyn HashContext>> {
        Ok(Box::new(FaultyContext {
            inner: DigestEngine.begin(transform)?,
            fault: self.fault,
            updates: Arc::clone(&self.updates),
        }))
    }
}
