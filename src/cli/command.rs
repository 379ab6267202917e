//! `usm-key` subcommands and their execution.
//!
//! Each subcommand produces one line of lowercase hex on success.

use clap::Subcommand;

use super::args::{
    EngineArgs, HexBytes, KeyChangeInput, KeyChangeInputArgs, PassphraseArgs, TransformArgs,
};
use crate::error::{Error, Result};
use crate::format::hex;
use crate::keytools::KeyTools;
use crate::usm::KeyChange;

/// A `usm-key` operation.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the master key Ku for a passphrase.
    Ku {
        #[command(flatten)]
        transform: TransformArgs,

        #[command(flatten)]
        passphrase: PassphraseArgs,
    },

    /// Print the localized key Kul for a passphrase and engine ID.
    Kul {
        #[command(flatten)]
        transform: TransformArgs,

        #[command(flatten)]
        passphrase: PassphraseArgs,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Encode a new key under the old one as a KeyChange string.
    EncodeKeychange {
        #[command(flatten)]
        transform: TransformArgs,

        #[command(flatten)]
        input: KeyChangeInputArgs,
    },

    /// Recover the new key from a KeyChange string.
    DecodeKeychange {
        #[command(flatten)]
        transform: TransformArgs,

        /// Old localized key as hex.
        #[arg(long = "old-key")]
        old_key: HexBytes,

        /// KeyChange string as hex.
        #[arg(long = "keychange")]
        keychange: HexBytes,
    },
}

impl Command {
    /// Run the command with the default key tools.
    pub fn run(&self) -> Result<String> {
        self.run_with(&KeyTools::new())
    }

    /// Run the command with the given key tools, returning the hex result.
    pub fn run_with(&self, tools: &KeyTools) -> Result<String> {
        match self {
            Self::Ku {
                transform,
                passphrase,
            } => {
                let ku = tools.master_key(&transform.oid(), passphrase.passphrase.as_bytes())?;
                Ok(hex::encode(ku.as_bytes()))
            }
            Self::Kul {
                transform,
                passphrase,
                engine,
            } => {
                let kul = tools.localized_key_from_passphrase(
                    &transform.oid(),
                    passphrase.passphrase.as_bytes(),
                    engine.engine_id.as_bytes(),
                )?;
                Ok(hex::encode(kul.as_bytes()))
            }
            Self::EncodeKeychange { transform, input } => {
                let oid = transform.oid();
                let keychange = match input.input().map_err(|e| Error::Config(e.into()))? {
                    KeyChangeInput::Keys { old, new } => tools.encode_keychange(&oid, old, new)?,
                    KeyChangeInput::Passphrases {
                        old,
                        new,
                        engine_id,
                    } => tools.keychange_from_passphrases(&oid, old, new, engine_id)?,
                };
                Ok(keychange.to_string())
            }
            Self::DecodeKeychange {
                transform,
                old_key,
                keychange,
            } => {
                let keychange = KeyChange::from_bytes(keychange.as_bytes());
                let new_key =
                    tools.decode_keychange(&transform.oid(), old_key.as_bytes(), &keychange)?;
                Ok(hex::encode(new_key.as_bytes()))
            }
        }
    }
}
