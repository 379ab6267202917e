//! Owned-value key management API.
//!
//! [`KeyTools`] bundles a [`HashEngine`], a [`RandomSource`] and a
//! [`KeyToolsConfig`], and exposes the USM operations as methods that
//! return [`MasterKey`], [`LocalizedKey`] and [`KeyChange`] values instead of
//! writing into caller buffers.
//!
//! # Example
//!
//! ```
//! use usm_keytools::{HashTransform, KeyTools};
//!
//! # fn main() -> usm_keytools::Result<()> {
//! let tools = KeyTools::new();
//! let sha = HashTransform::Sha1.oid();
//!
//! let ku = tools.master_key(&sha, b"maplesyrup")?;
//! let kul = tools.localize(&ku, &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2])?;
//! assert_eq!(kul.len(), 20);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hash::{DigestEngine, HashEngine};
use crate::oid::Oid;
use crate::random::{OsRandom, RandomSource};
use crate::transform::check_transform_oid;
use crate::usm::{
    self, KeyChange, LocalizedKey, MasterKey, USM_LENGTH_EXPANDED_PASSPHRASE, USM_LENGTH_P_MIN,
};

/// Tunable parameters for key derivation.
///
/// The defaults are the RFC 3414 values. Interoperable deployments should
/// not change `expansion_len`; it exists for test fixtures and toy engines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyToolsConfig {
    /// Bytes of repeated passphrase hashed into Ku. Rounded up to a whole
    /// 64-byte block.
    pub expansion_len: usize,
    /// Minimum passphrase length. Values below [`USM_LENGTH_P_MIN`] are
    /// rejected by [`validate`](Self::validate) and ignored at use time.
    pub min_passphrase_len: usize,
}

impl Default for KeyToolsConfig {
    fn default() -> Self {
        Self {
            expansion_len: USM_LENGTH_EXPANDED_PASSPHRASE,
            min_passphrase_len: USM_LENGTH_P_MIN,
        }
    }
}

impl KeyToolsConfig {
    /// Check the configuration for values that would weaken or break
    /// derivation.
    pub fn validate(&self) -> Result<()> {
        if self.expansion_len == 0 {
            return Err(Error::Config("expansion length must be non-zero".into()));
        }
        if self.min_passphrase_len < USM_LENGTH_P_MIN {
            return Err(Error::Config(
                format!(
                    "minimum passphrase length {} is below the USM floor of {}",
                    self.min_passphrase_len, USM_LENGTH_P_MIN
                )
                .into(),
            ));
        }
        Ok(())
    }
}

/// USM key management with owned results.
///
/// Cheap to clone; the engine and random source are shared.
#[derive(Clone)]
pub struct KeyTools {
    hash: Arc<dyn HashEngine + Send + Sync>,
    random: Arc<dyn RandomSource + Send + Sync>,
    config: KeyToolsConfig,
}

impl KeyTools {
    /// Key tools with [`DigestEngine`], [`OsRandom`] and the default config.
    pub fn new() -> Self {
        Self {
            hash: Arc::new(DigestEngine),
            random: Arc::new(OsRandom),
            config: KeyToolsConfig::default(),
        }
    }

    /// Start building customized key tools.
    pub fn builder() -> KeyToolsBuilder {
        KeyToolsBuilder::new()
    }

    /// Active configuration.
    pub fn config(&self) -> &KeyToolsConfig {
        &self.config
    }

    /// Proper (digest) length of `transform` under this engine.
    pub fn proper_length(&self, transform: &Oid) -> Result<usize> {
        self.hash.proper_length(transform)
    }

    /// Derive the master key Ku from a passphrase.
    ///
    /// Arguments are checked in the same order as
    /// [`usm::derive_master_key`]: transform OID shape, then the passphrase
    /// floor, then transform availability.
    pub fn master_key(&self, transform: &Oid, passphrase: &[u8]) -> Result<MasterKey> {
        check_transform_oid(transform)?;
        usm::check_passphrase(&self.config, passphrase)?;
        let mut buf = vec![0u8; self.proper_length(transform)?];
        let len = usm::derive_master_key_with(
            self.hash.as_ref(),
            &self.config,
            transform,
            passphrase,
            &mut buf,
        )?;
        buf.truncate(len);
        Ok(MasterKey::from_bytes(transform.clone(), buf))
    }

    /// Localize a master key to `engine_id` using the key's own transform.
    pub fn localize(&self, master_key: &MasterKey, engine_id: &[u8]) -> Result<LocalizedKey> {
        let transform = master_key.transform();
        let mut buf = vec![0u8; self.proper_length(transform)?];
        let len = usm::localize_key(
            self.hash.as_ref(),
            transform,
            master_key.as_bytes(),
            engine_id,
            &mut buf,
        )?;
        buf.truncate(len);
        Ok(LocalizedKey::from_bytes(transform.clone(), buf))
    }

    /// Derive and localize in one step.
    ///
    /// The intermediate master key is wiped before returning.
    pub fn localized_key_from_passphrase(
        &self,
        transform: &Oid,
        passphrase: &[u8],
        engine_id: &[u8],
    ) -> Result<LocalizedKey> {
        let master = self.master_key(transform, passphrase)?;
        self.localize(&master, engine_id)
    }

    /// Encode `new_key` under `old_key` with a fresh random delta.
    ///
    /// Both keys must have the same length. Keys longer than the transform's
    /// proper length are encoded up to that length only.
    pub fn encode_keychange(
        &self,
        transform: &Oid,
        old_key: &[u8],
        new_key: &[u8],
    ) -> Result<KeyChange> {
        let mut buf = vec![0u8; 2 * old_key.len()];
        let len = usm::encode_keychange(
            self.hash.as_ref(),
            self.random.as_ref(),
            transform,
            old_key,
            new_key,
            &mut buf,
        )?;
        buf.truncate(len);
        Ok(KeyChange::from_bytes(buf))
    }

    /// Recover the new key from a KeyChange string.
    pub fn decode_keychange(
        &self,
        transform: &Oid,
        old_key: &[u8],
        keychange: &KeyChange,
    ) -> Result<LocalizedKey> {
        let mut buf = vec![0u8; old_key.len()];
        let len = usm::decode_keychange(
            self.hash.as_ref(),
            transform,
            old_key,
            keychange.as_bytes(),
            &mut buf,
        )?;
        buf.truncate(len);
        Ok(LocalizedKey::from_bytes(transform.clone(), buf))
    }

    /// Build the KeyChange string that moves a user from one passphrase to
    /// another on `engine_id`.
    ///
    /// Both passphrases are derived and localized with `transform`.
    pub fn keychange_from_passphrases(
        &self,
        transform: &Oid,
        old_passphrase: &[u8],
        new_passphrase: &[u8],
        engine_id: &[u8],
    ) -> Result<KeyChange> {
        let old_key = self.localized_key_from_passphrase(transform, old_passphrase, engine_id)?;
        let new_key = self.localized_key_from_passphrase(transform, new_passphrase, engine_id)?;
        self.encode_keychange(transform, old_key.as_bytes(), new_key.as_bytes())
    }
}

impl Default for KeyTools {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyTools")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`KeyTools`].
///
/// ```
/// use usm_keytools::{DigestEngine, KeyTools};
///
/// let tools = KeyTools::builder()
///     .hash_engine(DigestEngine)
///     .min_passphrase_len(12)
///     .build()
///     .unwrap();
/// assert_eq!(tools.config().min_passphrase_len, 12);
///
/// assert!(KeyTools::builder().min_passphrase_len(4).build().is_err());
/// ```
pub struct KeyToolsBuilder {
    hash: Arc<dyn HashEngine + Send + Sync>,
    random: Arc<dyn RandomSource + Send + Sync>,
    config: KeyToolsConfig,
}

impl KeyToolsBuilder {
    fn new() -> Self {
        Self {
            hash: Arc::new(DigestEngine),
            random: Arc::new(OsRandom),
            config: KeyToolsConfig::default(),
        }
    }

    /// Use a custom hash engine (default: [`DigestEngine`]).
    pub fn hash_engine(mut self, hash: impl HashEngine + Send + Sync + 'static) -> Self {
        self.hash = Arc::new(hash);
        self
    }

    /// Use a custom random source (default: [`OsRandom`]).
    pub fn random_source(mut self, random: impl RandomSource + Send + Sync + 'static) -> Self {
        self.random = Arc::new(random);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: KeyToolsConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the passphrase expansion length.
    pub fn expansion_len(mut self, len: usize) -> Self {
        self.config.expansion_len = len;
        self
    }

    /// Raise the minimum passphrase length.
    pub fn min_passphrase_len(mut self, len: usize) -> Self {
        self.config.min_passphrase_len = len;
        self
    }

    /// Validate the configuration and build.
    pub fn build(self) -> Result<KeyTools> {
        self.config.validate()?;
        Ok(KeyTools {
            hash: self.hash,
            random: self.random,
            config: self.config,
        })
    }
}
