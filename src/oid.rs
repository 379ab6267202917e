//! Object Identifier (OID) type.
//!
//! Hash transforms are selected by OID (e.g. `usmHMACSHAAuthProtocol`,
//! 1.3.6.1.6.3.10.1.1.3). Arcs are stored as `SmallVec<[u32; 16]>` so
//! transform identifiers never touch the heap.

use crate::error::{ArgumentErrorKind, Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Object Identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// # Examples
    ///
    /// ```
    /// use usm_keytools::oid::Oid;
    ///
    /// let oid = Oid::new(vec![1, 3, 6, 1, 6, 3, 10, 1, 1, 2]);
    /// assert_eq!(oid.len(), 10);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted notation (e.g. "1.3.6.1.6.3.10.1.1.3").
    ///
    /// A leading dot is accepted. Empty components are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use usm_keytools::oid::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6.1.6.3.10.1.1.3").unwrap();
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 6, 3, 10, 1, 1, 3]);
    ///
    /// assert!(Oid::parse("1..3").is_err());
    /// assert!(Oid::parse("1.x.3").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.strip_prefix('.').unwrap_or(s);
        if body.is_empty() {
            return Ok(Self::empty());
        }

        body.split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| Error::invalid(ArgumentErrorKind::MalformedOid))
            })
            .collect::<Result<SmallVec<[u32; 16]>>>()
            .map(|arcs| Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

/// Macro to build an OID from literal arcs.
///
/// # Examples
///
/// ```
/// use usm_keytools::oid;
///
/// let sha = oid!(1, 3, 6, 1, 6, 3, 10, 1, 1, 3);
/// assert_eq!(sha.to_string(), "1.3.6.1.6.3.10.1.1.3");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
