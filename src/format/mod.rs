//! Formatting utilities for key material.
//!
//! Keys, engine IDs and KeyChange strings are exchanged as hexadecimal text.
//!
//! ```
//! use usm_keytools::format::hex;
//!
//! let engine_id = hex::decode("0x8000000001").unwrap();
//! assert_eq!(hex::encode(&engine_id), "8000000001");
//! ```

pub mod hex;
