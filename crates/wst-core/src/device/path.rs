//! Hierarchical derivation paths as understood by the device.
//!
//! The device expects the full index sequence, starting with the root marker
//! `0` that stands for `m`. Command arguments supply the sequence as a JSON
//! array, e.g. `[0,2147483692,2147483708,2147483648,0,0]` for
//! `m/44'/60'/0'/0/0`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered sequence of child indices, root marker first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// The index that must open every path.
    pub const ROOT: u32 = 0;

    /// Offset of hardened child indices.
    pub const HARDENED: u32 = 0x8000_0000;

    /// Builds a path from raw indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if the sequence is empty or
    /// does not start with [`Self::ROOT`].
    pub fn new(indices: Vec<u32>) -> Result<Self> {
        match indices.first() {
            None => Err(Error::InvalidDerivationPath("path is empty".to_string())),
            Some(&first) if first != Self::ROOT => Err(Error::InvalidDerivationPath(format!(
                "path must start with {}, got {first}",
                Self::ROOT
            ))),
            Some(_) => Ok(Self(indices)),
        }
    }

    /// Parses a path from its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if the text is not a JSON array
    /// of unsigned 32-bit integers or violates [`Self::new`].
    pub fn from_json(json: &str) -> Result<Self> {
        let indices: Vec<u32> = serde_json::from_str(json)
            .map_err(|e| Error::InvalidDerivationPath(format!("{json}: {e}")))?;
        Self::new(indices)
    }

    /// Returns every index, root marker included.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// Returns the number of indices, root marker included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a path holds at least the root marker.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

impl TryFrom<Vec<u32>> for DerivationPath {
    type Error = Error;

    fn try_from(indices: Vec<u32>) -> Result<Self> {
        Self::new(indices)
    }
}

impl From<DerivationPath> for Vec<u32> {
    fn from(path: DerivationPath) -> Self {
        path.0
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0[1..] {
            if *index >= Self::HARDENED {
                write!(f, "/{}'", index - Self::HARDENED)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}
