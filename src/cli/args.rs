//! Command-line argument structures for the `usm-key` tool.
//!
//! Reusable clap argument groups: transform selection, passphrase and key
//! inputs, and logging flags.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use clap::Parser;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::format::hex;
use crate::oid::Oid;
use crate::transform::HashTransform;

/// Non-empty byte string given on the command line as hex (optional `0x`
/// prefix). Wiped on drop; `Debug` shows only the length.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    /// The decoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for HexBytes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| format!("invalid hex '{}': {}", s, e))?;
        if bytes.is_empty() {
            return Err("hex value must not be empty".into());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HexBytes")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl Deref for HexBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

/// Passphrase given on the command line. Wiped on drop and redacted in
/// `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase(String);

impl Passphrase {
    /// The passphrase bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for Passphrase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// Hash transform selection.
#[derive(Debug, Parser)]
pub struct TransformArgs {
    /// Hash transform: MD5, SHA, SHA-224, SHA-256, SHA-384, SHA-512, or a
    /// transform OID.
    #[arg(short = 'a', long = "auth-protocol", default_value = "SHA")]
    pub transform: HashTransform,
}

impl TransformArgs {
    /// OID of the selected transform.
    pub fn oid(&self) -> Oid {
        self.transform.oid()
    }
}

/// Passphrase input for derivation.
#[derive(Debug, Parser)]
pub struct PassphraseArgs {
    /// Passphrase (at least 8 characters).
    #[arg(short = 'p', long = "passphrase", env = "USM_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Passphrase,
}

/// Authoritative engine ID.
#[derive(Debug, Parser)]
pub struct EngineArgs {
    /// Authoritative engine ID as hex (e.g. 800000090300aabbccddeeff).
    #[arg(short = 'e', long = "engine-id")]
    pub engine_id: HexBytes,
}

/// Old and new key material for KeyChange encoding.
///
/// Either both keys are given as hex, or both passphrases are given together
/// with an engine ID and localized first.
#[derive(Debug, Parser)]
pub struct KeyChangeInputArgs {
    /// Old localized key as hex.
    #[arg(long = "old-key", requires = "new_key",
          conflicts_with_all = ["old_passphrase", "new_passphrase"])]
    pub old_key: Option<HexBytes>,

    /// New localized key as hex.
    #[arg(long = "new-key", requires = "old_key")]
    pub new_key: Option<HexBytes>,

    /// Old passphrase (localized with --engine-id).
    #[arg(long = "old-passphrase", env = "USM_OLD_PASSPHRASE", hide_env_values = true,
          requires_all = ["new_passphrase", "engine_id"])]
    pub old_passphrase: Option<Passphrase>,

    /// New passphrase (localized with --engine-id).
    #[arg(long = "new-passphrase", env = "USM_NEW_PASSPHRASE", hide_env_values = true,
          requires = "old_passphrase")]
    pub new_passphrase: Option<Passphrase>,

    /// Authoritative engine ID as hex, for passphrase input.
    #[arg(short = 'e', long = "engine-id")]
    pub engine_id: Option<HexBytes>,
}

/// Resolved KeyChange input.
pub enum KeyChangeInput<'a> {
    /// Localized keys given directly.
    Keys { old: &'a [u8], new: &'a [u8] },
    /// Passphrases to derive and localize.
    Passphrases {
        old: &'a [u8],
        new: &'a [u8],
        engine_id: &'a [u8],
    },
}

impl KeyChangeInputArgs {
    /// Resolve the argument combination.
    pub fn input(&self) -> Result<KeyChangeInput<'_>, String> {
        match (
            &self.old_key,
            &self.new_key,
            &self.old_passphrase,
            &self.new_passphrase,
        ) {
            (Some(old), Some(new), None, None) => Ok(KeyChangeInput::Keys {
                old: old.as_bytes(),
                new: new.as_bytes(),
            }),
            (None, None, Some(old), Some(new)) => {
                let engine_id = self
                    .engine_id
                    .as_deref()
                    .ok_or("--engine-id is required with passphrases")?;
                Ok(KeyChangeInput::Passphrases {
                    old: old.as_bytes(),
                    new: new.as_bytes(),
                    engine_id,
                })
            }
            _ => Err(
                "give either --old-key and --new-key, or --old-passphrase and --new-passphrase"
                    .into(),
            ),
        }
    }
}

/// Logging control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Enable debug logging (usm_keytools=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (usm_keytools=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    ///
    /// Logs go to stderr so stdout carries only the hex result.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "usm_keytools=trace"
        } else if self.debug {
            "usm_keytools=debug"
        } else {
            "usm_keytools=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}
