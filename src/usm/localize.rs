//! Key localization (RFC 3414 Section A.2.2).

use zeroize::Zeroizing;

use super::{MAX_LOCALIZE_INPUT, require_capacity, require_non_empty};
use crate::error::{ArgumentErrorKind, Error, Result};
use crate::hash::{HashEngine, hash_exact};
use crate::oid::Oid;
use crate::transform::check_transform_oid;
use crate::util::WipeOnError;

/// Bind a master key to an engine ID.
///
/// Computes `Kul = H(Ku || engineID || Ku)`, using the first proper-length
/// bytes of `master_key`, writes it to the front of `out`, and returns its
/// length.
///
/// Privacy keys are localized with the user's *authentication* transform;
/// choosing the transform is up to the caller.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] for a malformed transform OID, an empty
///   engine ID, a master key or `out` shorter than the proper length, or an
///   input larger than [`MAX_LOCALIZE_INPUT`]
/// - [`Error::TransformUnavailable`] if `hash` cannot provide `transform`
///
/// On error `out` is zeroed.
///
/// # Example
///
/// ```
/// use usm_keytools::{DigestEngine, HashTransform, format::hex, usm};
///
/// let md5 = HashTransform::Md5.oid();
/// let ku = hex::decode("9faf3283884e92834ebc9847d8edd963").unwrap();
/// let engine_id = hex::decode("000000000000000000000002").unwrap();
///
/// let mut kul = [0u8; 16];
/// usm::localize_key(&DigestEngine, &md5, &ku, &engine_id, &mut kul)?;
/// assert_eq!(hex::encode(&kul), "526f5eed9fcce26f8964c2930787d82b");
/// # Ok::<(), usm_keytools::Error>(())
/// ```
pub fn localize_key<H>(
    hash: &H,
    transform: &Oid,
    master_key: &[u8],
    engine_id: &[u8],
    out: &mut [u8],
) -> Result<usize>
where
    H: HashEngine + ?Sized,
{
    let mut out = WipeOnError::new(out);

    check_transform_oid(transform)?;
    require_non_empty(master_key, "master key")?;
    require_non_empty(engine_id, "engine ID")?;
    require_non_empty(&out, "output buffer")?;

    let proper_len = hash.proper_length(transform)?;
    require_capacity(&out, proper_len)?;
    if master_key.len() < proper_len {
        return Err(Error::invalid(ArgumentErrorKind::KeyTooShort {
            needed: proper_len,
            actual: master_key.len(),
        }));
    }

    let total = 2 * proper_len + engine_id.len();
    if total > MAX_LOCALIZE_INPUT {
        tracing::debug!(
            target: "usm_keytools::localize",
            { usm.engine_id_len = engine_id.len(), usm.input_len = total },
            "localization input exceeds working buffer limit"
        );
        return Err(Error::invalid(ArgumentErrorKind::InputTooLarge {
            length: total,
            max: MAX_LOCALIZE_INPUT,
        }));
    }

    let ku = &master_key[..proper_len];
    let mut input = Zeroizing::new(Vec::with_capacity(total));
    input.extend_from_slice(ku);
    input.extend_from_slice(engine_id);
    input.extend_from_slice(ku);

    hash_exact(hash, transform, &input, &mut out, proper_len)?;

    tracing::debug!(
        target: "usm_keytools::localize",
        { usm.transform = %transform, usm.engine_id_len = engine_id.len(), usm.key_len = proper_len },
        "localized key"
    );

    out.commit();
    Ok(proper_len)
}
