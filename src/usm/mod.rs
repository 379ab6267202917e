//! USM key management (RFC 3414 Section 2.6, Appendix A; RFC 3414 Section 5).
//!
//! The four operations here are pure functions over caller buffers:
//!
//! - [`derive_master_key`]: passphrase to master key Ku (1MB expansion + hash)
//! - [`localize_key`]: bind Ku to an engine ID, giving Kul
//! - [`encode_keychange`]: encode a new key under the old one (KeyChange TC)
//! - [`decode_keychange`]: recover the new key from a KeyChange string
//!
//! Each takes the [`HashEngine`](crate::HashEngine) (and, for encoding, the
//! [`RandomSource`](crate::RandomSource)) explicitly. Scratch buffers are
//! zeroized on every exit path, and the caller's output buffer is wiped if
//! the operation fails.
//!
//! [`KeyTools`](crate::KeyTools) wraps these in an owned-value API.

mod derive;
mod key;
mod keychange;
mod localize;

pub use derive::derive_master_key;
pub use key::{LocalizedKey, MasterKey};
pub use keychange::{KeyChange, decode_keychange, encode_keychange};
pub use localize::localize_key;

pub(crate) use derive::{check_passphrase, derive_master_key_with};

use crate::error::{ArgumentErrorKind, Error, Result};

/// Minimum passphrase length (`USM_LENGTH_P_MIN`).
///
/// Shorter passphrases are always rejected with
/// [`Error::PassphraseTooShort`]. The floor can be raised through
/// [`KeyToolsConfig`](crate::KeyToolsConfig) but never lowered.
pub const USM_LENGTH_P_MIN: usize = 8;

/// Number of passphrase bytes hashed into Ku (RFC 3414 A.2.1: 1MB).
pub const USM_LENGTH_EXPANDED_PASSPHRASE: usize = 1_048_576;

/// Size of each expansion block fed to the hash.
pub const USM_LENGTH_KU_HASHBLOCK: usize = 64;

/// Upper bound on the `Ku || engineID || Ku` localization input.
pub const MAX_LOCALIZE_INPUT: usize = 4096;

fn require_non_empty(bytes: &[u8], what: &'static str) -> Result<()> {
    if bytes.is_empty() {
        return Err(Error::invalid(ArgumentErrorKind::Empty { what }));
    }
    Ok(())
}

fn require_capacity(out: &[u8], needed: usize) -> Result<()> {
    if out.len() < needed {
        return Err(Error::invalid(ArgumentErrorKind::BufferTooSmall {
            needed,
            capacity: out.len(),
        }));
    }
    Ok(())
}
