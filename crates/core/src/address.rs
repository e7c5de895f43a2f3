//! Address - Opaque account identifier
//!
//! Addresses are raw bytes (1..=255 long so they fit a one-byte length
//! prefix in store keys). The text form is lowercase hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum address length in bytes
pub const MAX_ADDRESS_LEN: usize = 255;

/// Length of derived module addresses
pub const MODULE_ADDRESS_LEN: usize = 20;

/// Errors that can occur when building or parsing addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address cannot be empty")]
    Empty,

    #[error("Address too long ({0} bytes, max 255)")]
    TooLong(usize),

    #[error("Invalid address encoding: {0}")]
    InvalidEncoding(String),
}

/// Account address
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(Vec<u8>);

impl Address {
    /// Create an address from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, AddressError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(AddressError::Empty);
        }
        if bytes.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong(bytes.len()));
        }
        Ok(Self(bytes))
    }

    /// Deterministic address of a module account: `sha256(name)[..20]`
    pub fn module(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        Self(digest[..MODULE_ADDRESS_LEN].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed address; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AddressError::Empty);
        }
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
        Self::new(bytes)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}
