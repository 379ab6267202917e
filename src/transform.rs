//! Hash transform identifiers (RFC 3414, RFC 7860).
//!
//! USM names each authentication protocol by an OID under
//! `snmpAuthProtocols` (1.3.6.1.6.3.10.1.1). Key derivation, localization and
//! KeyChange encoding all run through the hash function behind that OID, and
//! every key they produce has the hash's native digest length, called the
//! transform's *proper length*.

use crate::error::{ArgumentErrorKind, Error, Result};
use crate::oid::Oid;

/// Number of arcs in every USM transform OID.
pub const USM_LENGTH_OID_TRANSFORM: usize = 10;

/// `snmpAuthProtocols` prefix shared by all supported transforms.
const AUTH_PROTOCOLS_PREFIX: [u32; 9] = [1, 3, 6, 1, 6, 3, 10, 1, 1];

/// Error returned when parsing a transform name fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTransformError {
    input: String,
}

impl std::fmt::Display for ParseTransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown hash transform '{}'; expected one of: MD5, SHA, SHA-224, SHA-256, SHA-384, SHA-512, or a transform OID",
            self.input
        )
    }
}

impl std::error::Error for ParseTransformError {}

/// Supported hash transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HashTransform {
    /// usmHMACMD5AuthProtocol (RFC 3414)
    Md5,
    /// usmHMACSHAAuthProtocol (RFC 3414)
    Sha1,
    /// usmHMAC128SHA224AuthProtocol (RFC 7860)
    Sha224,
    /// usmHMAC192SHA256AuthProtocol (RFC 7860)
    Sha256,
    /// usmHMAC256SHA384AuthProtocol (RFC 7860)
    Sha384,
    /// usmHMAC384SHA512AuthProtocol (RFC 7860)
    Sha512,
}

impl HashTransform {
    /// All supported transforms, weakest first.
    pub const ALL: [HashTransform; 6] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    /// Last arc of the transform OID.
    fn leaf(self) -> u32 {
        match self {
            Self::Md5 => 2,
            Self::Sha1 => 3,
            Self::Sha224 => 4,
            Self::Sha256 => 5,
            Self::Sha384 => 6,
            Self::Sha512 => 7,
        }
    }

    /// The transform's OID.
    ///
    /// ```
    /// use usm_keytools::HashTransform;
    ///
    /// assert_eq!(HashTransform::Sha1.oid().to_string(), "1.3.6.1.6.3.10.1.1.3");
    /// ```
    pub fn oid(self) -> Oid {
        let mut arcs = [0u32; USM_LENGTH_OID_TRANSFORM];
        arcs[..AUTH_PROTOCOLS_PREFIX.len()].copy_from_slice(&AUTH_PROTOCOLS_PREFIX);
        arcs[USM_LENGTH_OID_TRANSFORM - 1] = self.leaf();
        Oid::from_slice(&arcs)
    }

    /// Resolve a transform OID.
    ///
    /// OIDs of the wrong length are invalid arguments; well-formed OIDs that
    /// name no supported transform are reported as unavailable.
    pub fn from_oid(oid: &Oid) -> Result<Self> {
        check_transform_oid(oid)?;
        let arcs = oid.arcs();
        if arcs[..AUTH_PROTOCOLS_PREFIX.len()] != AUTH_PROTOCOLS_PREFIX {
            return Err(Error::TransformUnavailable {
                transform: oid.clone(),
            });
        }
        Self::ALL
            .into_iter()
            .find(|t| t.leaf() == arcs[USM_LENGTH_OID_TRANSFORM - 1])
            .ok_or_else(|| Error::TransformUnavailable {
                transform: oid.clone(),
            })
    }

    /// Native digest length in bytes (the "proper length").
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl From<HashTransform> for Oid {
    fn from(transform: HashTransform) -> Self {
        transform.oid()
    }
}

impl std::fmt::Display for HashTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "MD5"),
            Self::Sha1 => write!(f, "SHA"),
            Self::Sha224 => write!(f, "SHA-224"),
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
        }
    }
}

impl std::str::FromStr for HashTransform {
    type Err = ParseTransformError;

    /// Accepts protocol names (`MD5`, `SHA`, `SHA-256`, ...) or a dotted
    /// transform OID.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MD5" => Ok(Self::Md5),
            "SHA" | "SHA1" | "SHA-1" => Ok(Self::Sha1),
            "SHA224" | "SHA-224" => Ok(Self::Sha224),
            "SHA256" | "SHA-256" => Ok(Self::Sha256),
            "SHA384" | "SHA-384" => Ok(Self::Sha384),
            "SHA512" | "SHA-512" => Ok(Self::Sha512),
            _ => Oid::parse(s)
                .and_then(|oid| Self::from_oid(&oid))
                .map_err(|_| ParseTransformError {
                    input: s.to_string(),
                }),
        }
    }
}

/// Reject transform OIDs that are not exactly [`USM_LENGTH_OID_TRANSFORM`] arcs.
pub(crate) fn check_transform_oid(oid: &Oid) -> Result<()> {
    if oid.len() != USM_LENGTH_OID_TRANSFORM {
        tracing::debug!(
            target: "usm_keytools::transform",
            { usm.transform = %oid, usm.arcs = oid.len() },
            "rejecting transform OID of wrong length"
        );
        return Err(Error::invalid(ArgumentErrorKind::TransformLength {
            expected: USM_LENGTH_OID_TRANSFORM,
            actual: oid.len(),
        }));
    }
    Ok(())
}
