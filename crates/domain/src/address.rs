//! Chain addresses.

use primitive_types::H160;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when parsing an address from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The text does not hold exactly 40 hex digits.
    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),
    /// The text holds a non-hex character.
    #[error("address contains non-hex characters: {0:?}")]
    InvalidHex(String),
}

/// A 20-byte chain address identifying a token or a pair contract.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address(pub H160);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self(H160([0u8; 20]));

    /// Creates an address from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }

    /// Returns the canonical text form: `0x` followed by 40 lowercase hex digits.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parses an address, with or without the `0x` prefix, in any case.
    ///
    /// # Errors
    /// Returns [`AddressError`] if the text is not 40 hex digits.
    pub fn from_hex(text: &str) -> Result<Self, AddressError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 40 {
            return Err(AddressError::InvalidLength(digits.len()));
        }
        H160::from_str(digits)
            .map(Self)
            .map_err(|_| AddressError::InvalidHex(text.to_string()))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<H160> for Address {
    fn from(h: H160) -> Self {
        Self(h)
    }
}
