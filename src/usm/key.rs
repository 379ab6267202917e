//! Owned key values.
//!
//! [`MasterKey`] and [`LocalizedKey`] carry their bytes together with the
//! transform that produced them. Both wipe their bytes on drop, redact them
//! from `Debug` output and compare in constant time.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::oid::Oid;

/// Master key Ku derived from a passphrase.
///
/// Ku is the same for every engine. It should be localized with
/// [`KeyTools::localize`](crate::KeyTools::localize) before use on the wire.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: Vec<u8>,
    #[zeroize(skip)]
    transform: Oid,
}

/// Localized key Kul, bound to one engine ID.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LocalizedKey {
    key: Vec<u8>,
    #[zeroize(skip)]
    transform: Oid,
}

macro_rules! key_impls {
    ($name:ident) => {
        impl $name {
            /// Wrap existing key material (e.g. loaded from a config store).
            pub fn from_bytes(transform: Oid, key: impl Into<Vec<u8>>) -> Self {
                Self {
                    key: key.into(),
                    transform,
                }
            }

            /// Transform OID the key was produced with.
            pub fn transform(&self) -> &Oid {
                &self.transform
            }

            /// Raw key bytes.
            pub fn as_bytes(&self) -> &[u8] {
                &self.key
            }

            /// Key length in bytes.
            pub fn len(&self) -> usize {
                self.key.len()
            }

            /// Check if the key is empty.
            pub fn is_empty(&self) -> bool {
                self.key.is_empty()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("transform", &format_args!("{}", self.transform))
                    .field("len", &self.key.len())
                    .finish_non_exhaustive()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.transform == other.transform && bool::from(self.key.ct_eq(&other.key))
            }
        }

        impl Eq for $name {}

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.key
            }
        }
    };
}

key_impls!(MasterKey);
key_impls!(LocalizedKey);
