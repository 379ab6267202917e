//! Password to key transformation (RFC 3414 Section A.2.1).

use zeroize::Zeroizing;

use super::{USM_LENGTH_KU_HASHBLOCK, USM_LENGTH_P_MIN, require_capacity, require_non_empty};
use crate::error::{Error, Result, UpstreamErrorKind};
use crate::hash::HashEngine;
use crate::keytools::KeyToolsConfig;
use crate::oid::Oid;
use crate::transform::check_transform_oid;
use crate::util::WipeOnError;

/// Convert a passphrase into a master key Ku.
///
/// The passphrase is repeated to fill 1MB, which is hashed with `transform`
/// in 64-byte blocks. The digest is written to the front of `out`, and its
/// length (the transform's proper length) is returned.
///
/// # Errors
///
/// - [`Error::PassphraseTooShort`] if `passphrase` is shorter than
///   [`USM_LENGTH_P_MIN`]
/// - [`Error::InvalidArgument`] for a malformed transform OID or an `out`
///   smaller than the proper length
/// - [`Error::TransformUnavailable`] if `hash` cannot provide `transform`
///
/// On error `out` is zeroed.
///
/// # Example
///
/// ```
/// use usm_keytools::{DigestEngine, HashTransform, format::hex, usm};
///
/// let mut ku = [0u8; 16];
/// let len = usm::derive_master_key(&DigestEngine, &HashTransform::Md5.oid(), b"maplesyrup", &mut ku)?;
///
/// assert_eq!(len, 16);
/// assert_eq!(hex::encode(&ku), "9faf3283884e92834ebc9847d8edd963");
/// # Ok::<(), usm_keytools::Error>(())
/// ```
pub fn derive_master_key<H>(
    hash: &H,
    transform: &Oid,
    passphrase: &[u8],
    out: &mut [u8],
) -> Result<usize>
where
    H: HashEngine + ?Sized,
{
    derive_master_key_with(hash, &KeyToolsConfig::default(), transform, passphrase, out)
}

/// Enforce the passphrase floor: the configured minimum, never below
/// [`USM_LENGTH_P_MIN`].
pub(crate) fn check_passphrase(config: &KeyToolsConfig, passphrase: &[u8]) -> Result<()> {
    let min_len = config.min_passphrase_len.max(USM_LENGTH_P_MIN);
    if passphrase.len() < min_len {
        tracing::warn!(
            target: "usm_keytools::derive",
            { usm.passphrase_len = passphrase.len(), usm.min_len = min_len },
            "rejecting passphrase shorter than USM minimum"
        );
        return Err(Error::PassphraseTooShort {
            len: passphrase.len(),
            min: min_len,
        });
    }
    Ok(())
}

pub(crate) fn derive_master_key_with<H>(
    hash: &H,
    config: &KeyToolsConfig,
    transform: &Oid,
    passphrase: &[u8],
    out: &mut [u8],
) -> Result<usize>
where
    H: HashEngine + ?Sized,
{
    let mut out = WipeOnError::new(out);

    check_transform_oid(transform)?;
    require_non_empty(&out, "output buffer")?;

    check_passphrase(config, passphrase)?;

    let proper_len = hash.proper_length(transform)?;
    require_capacity(&out, proper_len)?;

    let mut ctx = hash.begin(transform)?;
    let mut block = Zeroizing::new([0u8; USM_LENGTH_KU_HASHBLOCK]);
    let mut index = 0;
    let mut streamed = 0;

    // Whole blocks only: the expansion length is rounded up to a block multiple.
    while streamed < config.expansion_len {
        for byte in block.iter_mut() {
            *byte = passphrase[index];
            index = (index + 1) % passphrase.len();
        }
        ctx.update(&block[..])?;
        streamed += USM_LENGTH_KU_HASHBLOCK;
    }

    let written = ctx.finish(&mut out[..proper_len])?;
    if written != proper_len {
        return Err(Error::upstream(UpstreamErrorKind::ShortDigest {
            expected: proper_len,
            actual: written,
        }));
    }

    tracing::debug!(
        target: "usm_keytools::derive",
        { usm.transform = %transform, usm.streamed = streamed, usm.key_len = proper_len },
        "derived master key"
    );

    out.commit();
    Ok(proper_len)
}
