//! Hash engine capability.
//!
//! Key operations never pick a hash function themselves. They ask a
//! [`HashEngine`] to resolve the transform OID they were given, either to a
//! proper length, a streaming [`HashContext`], or a one-shot digest.
//!
//! [`DigestEngine`] is the standard engine, backed by the RustCrypto `md-5`,
//! `sha1` and `sha2` crates. Custom engines (hardware tokens, test doubles)
//! implement the same trait.

use digest::Digest;
use digest::generic_array::GenericArray;

use crate::error::{ArgumentErrorKind, Error, Result, UpstreamErrorKind};
use crate::oid::Oid;
use crate::transform::HashTransform;

/// An in-progress streaming digest.
pub trait HashContext {
    /// Feed more input.
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Finish the digest, writing it to the front of `out`.
    ///
    /// Returns the number of bytes written. Fails if `out` is shorter than
    /// the digest.
    fn finish(self: Box<Self>, out: &mut [u8]) -> Result<usize>;
}

/// Hash capability selected by transform OID.
pub trait HashEngine {
    /// Proper (native digest) length of `transform`.
    fn proper_length(&self, transform: &Oid) -> Result<usize>;

    /// Start a streaming digest for `transform`.
    fn begin(&self, transform: &Oid) -> Result<Box<dyn HashContext>>;

    /// Hash `input` in one shot into the front of `out`.
    ///
    /// Returns the number of bytes written.
    fn hash(&self, transform: &Oid, input: &[u8], out: &mut [u8]) -> Result<usize> {
        let mut ctx = self.begin(transform)?;
        ctx.update(input)?;
        ctx.finish(out)
    }
}

/// Hash engine for the standard USM transforms.
///
/// ```
/// use usm_keytools::{DigestEngine, HashEngine, HashTransform};
///
/// let engine = DigestEngine;
/// let sha1 = HashTransform::Sha1.oid();
/// assert_eq!(engine.proper_length(&sha1).unwrap(), 20);
///
/// let mut out = [0u8; 20];
/// assert_eq!(engine.hash(&sha1, b"abc", &mut out).unwrap(), 20);
/// assert_eq!(out[..4], [0xa9, 0x99, 0x3e, 0x36]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestEngine;

impl HashEngine for DigestEngine {
    fn proper_length(&self, transform: &Oid) -> Result<usize> {
        Ok(HashTransform::from_oid(transform)?.digest_len())
    }

    fn begin(&self, transform: &Oid) -> Result<Box<dyn HashContext>> {
        let resolved = HashTransform::from_oid(transform)?;
        tracing::trace!(target: "usm_keytools::hash", { usm.transform = %resolved }, "starting digest");
        Ok(match resolved {
            HashTransform::Md5 => DigestContext::<md5::Md5>::boxed(),
            HashTransform::Sha1 => DigestContext::<sha1::Sha1>::boxed(),
            HashTransform::Sha224 => DigestContext::<sha2::Sha224>::boxed(),
            HashTransform::Sha256 => DigestContext::<sha2::Sha256>::boxed(),
            HashTransform::Sha384 => DigestContext::<sha2::Sha384>::boxed(),
            HashTransform::Sha512 => DigestContext::<sha2::Sha512>::boxed(),
        })
    }
}

struct DigestContext<D>(D);

impl<D> DigestContext<D>
where
    D: Digest + 'static,
{
    fn boxed() -> Box<dyn HashContext> {
        Box::new(Self(D::new()))
    }
}

impl<D> HashContext for DigestContext<D>
where
    D: Digest,
{
    fn update(&mut self, data: &[u8]) -> Result<()> {
        Digest::update(&mut self.0, data);
        Ok(())
    }

    fn finish(self: Box<Self>, out: &mut [u8]) -> Result<usize> {
        let len = <D as Digest>::output_size();
        if out.len() < len {
            return Err(Error::invalid(ArgumentErrorKind::BufferTooSmall {
                needed: len,
                capacity: out.len(),
            }));
        }
        // Finalize in place; no intermediate digest copy.
        let Self(digest) = *self;
        digest.finalize_into(GenericArray::from_mut_slice(&mut out[..len]));
        Ok(len)
    }
}

/// Run a one-shot hash and insist on at least `len` bytes of output.
pub(crate) fn hash_exact<H>(
    hash: &H,
    transform: &Oid,
    input: &[u8],
    out: &mut [u8],
    len: usize,
) -> Result<()>
where
    H: HashEngine + ?Sized,
{
    let written = hash.hash(transform, input, out)?;
    if written < len {
        return Err(Error::upstream(UpstreamErrorKind::ShortDigest {
            expected: len,
            actual: written,
        }));
    }
    Ok(())
}
