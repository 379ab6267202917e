//! KeyChange textual convention (RFC 3414 Section 5).
//!
//! A KeyChange string lets a manager replace a user's key while only the old
//! key is shared:
//!
//! ```text
//! keychange = random || (H(oldkey || random) XOR newkey)
//! ```
//!
//! Both halves are `L` bytes, where `L` is the key length capped at the
//! transform's proper length.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{require_capacity, require_non_empty};
use crate::error::{ArgumentErrorKind, Error, Result, UpstreamErrorKind};
use crate::format::hex;
use crate::hash::{HashEngine, hash_exact};
use crate::oid::Oid;
use crate::random::RandomSource;
use crate::transform::check_transform_oid;
use crate::util::WipeOnError;

/// Encode `new_key` under `old_key` as a KeyChange string.
///
/// Writes `2 * L` bytes to the front of `out` and returns `2 * L`, where
/// `L = min(old_key.len(), proper length)`. Keys may be shorter than the
/// digest (e.g. a 16-byte privacy key changed through SHA-1); the digest is
/// then truncated to the key length before the XOR.
///
/// Keys longer than the proper length are only encoded up to the proper
/// length; the remaining bytes are not carried by the KeyChange string.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if either key is empty, the keys differ in
///   length, or `out` is smaller than `2 * old_key.len()`. These are checked
///   before any random bytes are requested.
/// - [`Error::TransformUnavailable`] if `hash` cannot provide `transform`
/// - [`Error::Upstream`] if `random` fails or supplies fewer than `L` bytes
///
/// On error `out` is zeroed.
pub fn encode_keychange<H, R>(
    hash: &H,
    random: &R,
    transform: &Oid,
    old_key: &[u8],
    new_key: &[u8],
    out: &mut [u8],
) -> Result<usize>
where
    H: HashEngine + ?Sized,
    R: RandomSource + ?Sized,
{
    let mut out = WipeOnError::new(out);

    check_transform_oid(transform)?;
    require_non_empty(old_key, "old key")?;
    require_non_empty(new_key, "new key")?;
    require_non_empty(&out, "output buffer")?;

    let proper_len = hash.proper_length(transform)?;

    if old_key.len() != new_key.len() {
        tracing::debug!(
            target: "usm_keytools::keychange",
            { usm.old_key_len = old_key.len(), usm.new_key_len = new_key.len() },
            "rejecting KeyChange between keys of different length"
        );
        return Err(Error::invalid(ArgumentErrorKind::KeyLengthMismatch {
            old: old_key.len(),
            new: new_key.len(),
        }));
    }
    require_capacity(&out, 2 * old_key.len())?;

    let len = old_key.len().min(proper_len);
    if len < old_key.len() {
        tracing::debug!(
            target: "usm_keytools::keychange",
            { usm.key_len = old_key.len(), usm.proper_len = proper_len },
            "key longer than transform digest; encoding leading bytes only"
        );
    }

    let mut delta = Zeroizing::new(vec![0u8; len]);
    let supplied = random.fill(&mut delta)?;
    if supplied != len {
        tracing::warn!(
            target: "usm_keytools::keychange",
            { usm.requested = len, usm.supplied = supplied },
            "random source returned short"
        );
        return Err(Error::upstream(UpstreamErrorKind::ShortRandom {
            requested: len,
            supplied,
        }));
    }

    let mut input = Zeroizing::new(Vec::with_capacity(2 * len));
    input.extend_from_slice(&old_key[..len]);
    input.extend_from_slice(&delta);

    let mut digest = Zeroizing::new(vec![0u8; proper_len]);
    hash_exact(hash, transform, &input, &mut digest, len)?;

    let (random_half, rest) = out.split_at_mut(len);
    random_half.copy_from_slice(&delta);
    for ((dst, d), n) in rest[..len].iter_mut().zip(&digest[..len]).zip(&new_key[..len]) {
        *dst = d ^ n;
    }

    tracing::debug!(
        target: "usm_keytools::keychange",
        { usm.transform = %transform, usm.key_len = len },
        "encoded KeyChange"
    );

    out.commit();
    Ok(2 * len)
}

/// Recover the new key from a KeyChange string.
///
/// `keychange` must be exactly twice as long as `old_key`. The new key,
/// `old_key.len()` bytes long, is written to the front of `out` and its
/// length returned.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `old_key` is empty, `keychange` is not
///   `2 * old_key.len()` bytes, `out` is smaller than `old_key`, or `old_key`
///   is longer than the transform's digest
/// - [`Error::TransformUnavailable`] if `hash` cannot provide `transform`
///
/// On error `out` is zeroed.
pub fn decode_keychange<H>(
    hash: &H,
    transform: &Oid,
    old_key: &[u8],
    keychange: &[u8],
    out: &mut [u8],
) -> Result<usize>
where
    H: HashEngine + ?Sized,
{
    let mut out = WipeOnError::new(out);

    check_transform_oid(transform)?;
    require_non_empty(old_key, "old key")?;
    require_non_empty(keychange, "KeyChange string")?;
    require_non_empty(&out, "output buffer")?;

    let proper_len = hash.proper_length(transform)?;

    let len = old_key.len();
    if keychange.len() != 2 * len {
        tracing::debug!(
            target: "usm_keytools::keychange",
            { usm.old_key_len = len, usm.keychange_len = keychange.len() },
            "rejecting KeyChange string of wrong length"
        );
        return Err(Error::invalid(ArgumentErrorKind::KeyChangeLength {
            expected: 2 * len,
            actual: keychange.len(),
        }));
    }
    require_capacity(&out, len)?;
    if len > proper_len {
        return Err(Error::invalid(ArgumentErrorKind::KeyLongerThanDigest {
            key_len: len,
            digest_len: proper_len,
        }));
    }

    let (delta, encoded) = keychange.split_at(len);

    let mut input = Zeroizing::new(Vec::with_capacity(2 * len));
    input.extend_from_slice(old_key);
    input.extend_from_slice(delta);

    let mut digest = Zeroizing::new(vec![0u8; proper_len]);
    hash_exact(hash, transform, &input, &mut digest, len)?;

    for ((dst, d), e) in out[..len].iter_mut().zip(&digest[..len]).zip(encoded) {
        *dst = d ^ e;
    }

    tracing::debug!(
        target: "usm_keytools::keychange",
        { usm.transform = %transform, usm.key_len = len },
        "decoded KeyChange"
    );

    out.commit();
    Ok(len)
}

/// An encoded KeyChange string.
///
/// The first half is the random delta, the second half the masked new key.
/// Neither half reveals the new key without the old one, so `Debug` shows
/// the hex encoding. The bytes are still wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyChange {
    bytes: Vec<u8>,
}

impl KeyChange {
    /// Wrap a KeyChange string received off the wire.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The full wire encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the string is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The random delta (first half).
    pub fn delta(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() / 2]
    }

    /// The masked new key (second half).
    pub fn masked_key(&self) -> &[u8] {
        &self.bytes[self.bytes.len() / 2..]
    }
}

impl PartialEq for KeyChange {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl Eq for KeyChange {}

impl std::fmt::Debug for KeyChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("KeyChange")
            .field(&format_args!("{}", hex::Bytes(&self.bytes)))
            .finish()
    }
}

impl std::fmt::Display for KeyChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::Bytes(&self.bytes))
    }
}

impl AsRef<[u8]> for KeyChange {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::hash::DigestEngine;
    use crate::transform::HashTransform;

    /// Repeats a fixed byte pattern and counts calls.
    struct PatternRandom {
        pattern: Vec<u8>,
        calls: Cell<usize>,
    }

    impl PatternRandom {
        fn new(pattern: &[u8]) -> Self {
            Self {
                pattern: pattern.to_vec(),
                calls: Cell::new(0),
            }
        }
    }

    impl RandomSource for PatternRandom {
        fn fill(&self, buf: &mut [u8]) -> Result<usize> {
            self.calls.set(self.calls.get() + 1);
            for (dst, src) in buf.iter_mut().zip(self.pattern.iter().cycle()) {
                *dst = *src;
            }
            Ok(buf.len())
        }
    }

    /// Supplies at most `limit` bytes.
    struct ShortRandom {
        limit: usize,
    }

    impl RandomSource for ShortRandom {
        fn fill(&self, buf: &mut [u8]) -> Result<usize> {
            let n = self.limit.min(buf.len());
            buf[..n].fill(0x5A);
            Ok(n)
        }
    }

    fn md5(data: &[u8]) -> [u8; 16] {
        let mut out = [0u8; 16];
        DigestEngine
            .hash(&HashTransform::Md5.oid(), data, &mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_encode_layout() {
        let old_key = [0x05u8; 16];
        let new_key = [0x01u8; 16];
        let random = PatternRandom::new(&[0xAA, 0xBB, 0xCC, 0xDD]);
        let mut out = [0u8; 32];

        let n = encode_keychange(
            &DigestEngine,
            &random,
            &HashTransform::Md5.oid(),
            &old_key,
            &new_key,
            &mut out,
        )
        .unwrap();
        assert_eq!(n, 32);

        let delta = [0xAA, 0xBB, 0xCC, 0xDD].repeat(4);
        assert_eq!(out[..16], delta[..]);

        let digest = md5(&[&old_key[..], &delta[..]].concat());
        let expected: Vec<u8> = digest.iter().zip(&new_key).map(|(d, k)| d ^ k).collect();
        assert_eq!(out[16..], expected[..]);
    }

    #[test]
    fn test_roundtrip() {
        let oid = HashTransform::Sha1.oid();
        let old_key: Vec<u8> = (0..20).collect();
        let new_key: Vec<u8> = (100..120).collect();
        let random = PatternRandom::new(&[0x42, 0x17]);

        let mut kc = [0u8; 40];
        let n = encode_keychange(&DigestEngine, &random, &oid, &old_key, &new_key, &mut kc).unwrap();

        let mut recovered = [0u8; 20];
        let m = decode_keychange(&DigestEngine, &oid, &old_key, &kc[..n], &mut recovered).unwrap();
        assert_eq!(m, 20);
        assert_eq!(recovered[..], new_key[..]);
    }

    #[test]
    fn test_short_key_under_long_digest() {
        // 16-byte privacy key changed through SHA-1
        let oid = HashTransform::Sha1.oid();
        let old_key = [0x33u8; 16];
        let new_key = [0x44u8; 16];
        let random = PatternRandom::new(&[0x99]);

        let mut kc = [0u8; 40];
        let n = encode_keychange(&DigestEngine, &random, &oid, &old_key, &new_key, &mut kc).unwrap();
        assert_eq!(n, 32);
        assert_eq!(kc[32..], [0u8; 8]);

        let mut recovered = [0u8; 16];
        decode_keychange(&DigestEngine, &oid, &old_key, &kc[..n], &mut recovered).unwrap();
        assert_eq!(recovered, new_key);
    }

    #[test]
    fn test_long_key_truncated_to_proper_length() {
        let oid = HashTransform::Md5.oid();
        let old_key = [0x10u8; 24];
        let new_key = [0x20u8; 24];
        let random = PatternRandom::new(&[0x01]);

        let mut kc = [0u8; 48];
        let n = encode_keychange(&DigestEngine, &random, &oid, &old_key, &new_key, &mut kc).unwrap();
        assert_eq!(n, 32);
    }

    #[test]
    fn test_length_mismatch_rejected_before_random() {
        let random = PatternRandom::new(&[0xAB]);
        let mut out = [0xEEu8; 64];
        let err = encode_keychange(
            &DigestEngine,
            &random,
            &HashTransform::Md5.oid(),
            &[1u8; 16],
            &[2u8; 20],
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidArgument {
                kind: ArgumentErrorKind::KeyLengthMismatch { old: 16, new: 20 }
            }
        ));
        assert_eq!(random.calls.get(), 0);
        assert_eq!(out, [0u8; 64]);
    }

    #[test]
    fn test_small_output_rejected_before_random() {
        let random = PatternRandom::new(&[0xAB]);
        let mut out = [0u8; 31];
        let err = encode_keychange(
            &DigestEngine,
            &random,
            &HashTransform::Md5.oid(),
            &[1u8; 16],
            &[2u8; 16],
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidArgument {
                kind: ArgumentErrorKind::BufferTooSmall {
                    needed: 32,
                    capacity: 31
                }
            }
        ));
        assert_eq!(random.calls.get(), 0);
    }

    #[test]
    fn test_short_random_wipes_output() {
        let mut out = [0xEEu8; 32];
        let err = encode_keychange(
            &DigestEngine,
            &ShortRandom { limit: 8 },
            &HashTransform::Md5.oid(),
            &[1u8; 16],
            &[2u8; 16],
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Upstream {
                kind: UpstreamErrorKind::ShortRandom {
                    requested: 16,
                    supplied: 8
                }
            }
        ));
        assert_eq!(out, [0u8; 32]);
    }

    #[test]
    fn test_decode_wrong_length_rejected() {
        let mut out = [0xEEu8; 16];
        let err = decode_keychange(
            &DigestEngine,
            &HashTransform::Md5.oid(),
            &[1u8; 16],
            &[0u8; 31],
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidArgument {
                kind: ArgumentErrorKind::KeyChangeLength {
                    expected: 32,
                    actual: 31
                }
            }
        ));
        assert_eq!(out, [0u8; 16]);
    }

    #[test]
    fn test_decode_small_output_rejected() {
        let mut out = [0u8; 15];
        let err = decode_keychange(
            &DigestEngine,
            &HashTransform::Md5.oid(),
            &[1u8; 16],
            &[0u8; 32],
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                kind: ArgumentErrorKind::BufferTooSmall { .. }
            }
        ));
    }

    #[test]
    fn test_decode_key_longer_than_digest_rejected() {
        let mut out = [0u8; 24];
        let err = decode_keychange(
            &DigestEngine,
            &HashTransform::Md5.oid(),
            &[1u8; 24],
            &[0u8; 48],
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                kind: ArgumentErrorKind::KeyLongerThanDigest {
                    key_len: 24,
                    digest_len: 16
                }
            }
        ));
    }

    #[test]
    fn test_keychange_halves() {
        let kc = KeyChange::from_bytes(vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(kc.delta(), &[1, 2, 3]);
        assert_eq!(kc.masked_key(), &[4, 5, 6]);
        assert_eq!(kc.to_string(), "010203040506");
        assert_eq!(format!("{:?}", kc), "KeyChange(010203040506)");
        assert_eq!(kc, KeyChange::from_bytes(vec![1, 2, 3, 4, 5, 6]));
        assert_ne!(kc, KeyChange::from_bytes(vec![1, 2, 3, 4, 5, 7]));
    }
}
