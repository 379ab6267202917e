//! Internal utilities.

use std::ops::{Deref, DerefMut};

use zeroize::Zeroize;

/// Caller output buffer that is wiped on drop unless the operation commits.
///
/// Every key operation wraps its destination in this guard first, so any
/// early return (including `?`) leaves the caller with zeros rather than a
/// half-written key.
pub(crate) struct WipeOnError<'a> {
    buf: &'a mut [u8],
    committed: bool,
}

impl<'a> WipeOnError<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            committed: false,
        }
    }

    /// Keep the buffer contents.
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for WipeOnError<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buf
    }
}

impl DerefMut for WipeOnError<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buf
    }
}

impl Drop for WipeOnError<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.buf.zeroize();
        }
    }
}
