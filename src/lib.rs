// The Error enum carries the offending transform OID inline.
#![allow(clippy::result_large_err)]

//! # usm-keytools
//!
//! SNMPv3 User-based Security Model key management (RFC 3414, RFC 7860).
//!
//! ## Features
//!
//! - Passphrase to master key (Ku) derivation with the 1MB expansion
//! - Key localization to an authoritative engine ID (Kul)
//! - KeyChange encoding and decoding for remote key updates
//! - MD5, SHA-1 and SHA-2 transforms selected by OID
//! - Pluggable hash engine and random source
//! - Keys and scratch buffers wiped from memory with `zeroize`
//!
//! ## Quick Start
//!
//! ```rust
//! use usm_keytools::{HashTransform, KeyTools, format::hex};
//!
//! fn main() -> Result<(), usm_keytools::Error> {
//!     let tools = KeyTools::new();
//!     let sha = HashTransform::Sha1.oid();
//!     let engine_id = hex::decode("000000000000000000000002").unwrap();
//!
//!     let kul = tools.localized_key_from_passphrase(&sha, b"maplesyrup", &engine_id)?;
//!     assert_eq!(
//!         hex::encode(kul.as_bytes()),
//!         "6695febc9288e36282235fc7151f128497b38f3f"
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Changing a Key
//!
//! ```rust
//! use usm_keytools::{HashTransform, KeyTools};
//!
//! # fn main() -> Result<(), usm_keytools::Error> {
//! let tools = KeyTools::new();
//! let md5 = HashTransform::Md5.oid();
//! let engine_id = [0x80, 0x00, 0x00, 0x00, 0x01];
//!
//! let old = tools.localized_key_from_passphrase(&md5, b"maplesyrup", &engine_id)?;
//! let new = tools.localized_key_from_passphrase(&md5, b"newsyrup", &engine_id)?;
//!
//! // Sent in a SET of usmUserAuthKeyChange
//! let keychange = tools.encode_keychange(&md5, old.as_bytes(), new.as_bytes())?;
//!
//! // Agent side
//! let recovered = tools.decode_keychange(&md5, old.as_bytes(), &keychange)?;
//! assert_eq!(recovered, new);
//! # Ok(())
//! # }
//! ```
//!
//! ## Buffer-level API
//!
//! The functions in [`usm`] write into caller-provided buffers and take the
//! hash engine and random source as explicit arguments. [`KeyTools`] is a
//! thin owned-value wrapper over them.

pub mod error;
pub mod format;
pub mod hash;
pub mod keytools;
pub mod oid;
pub mod random;
pub mod transform;
pub mod usm;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use error::{ArgumentErrorKind, Error, ErrorCategory, Result, Status, UpstreamErrorKind};
pub use hash::{DigestEngine, HashContext, HashEngine};
pub use keytools::{KeyTools, KeyToolsBuilder, KeyToolsConfig};
pub use oid::Oid;
pub use random::{OsRandom, RandomSource};
pub use transform::{HashTransform, ParseTransformError, USM_LENGTH_OID_TRANSFORM};
pub use usm::{KeyChange, LocalizedKey, MasterKey};
