//! Synthetic phone-number identifiers.
//!
//! A `SyntheticIdentifier` is the join key between a dispatched build request
//! (it is sent as the SMS sender) and the artifact record that eventually
//! shows up in the content store (its `sender_phone`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Country-code prefix plus fixed digit group shared by every identifier.
pub const IDENTIFIER_PREFIX: &str = "+1999";

/// Number of token-derived digits following the prefix.
pub const IDENTIFIER_DIGITS: usize = 7;

/// Identifier used for callers that supply no token.
pub const SENTINEL_IDENTIFIER: &str = "+19990000000";

/// A fixed-format synthetic phone number: `+1999` followed by 7 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SyntheticIdentifier(String);

impl SyntheticIdentifier {
    /// The stable identifier for anonymous callers.
    pub fn sentinel() -> Self {
        Self(SENTINEL_IDENTIFIER.to_string())
    }

    /// Build an identifier from exactly seven ASCII digits.
    pub fn from_digits(digits: &str) -> Result<Self, IdentifierError> {
        if digits.len() != IDENTIFIER_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::Malformed(format!(
                "{IDENTIFIER_PREFIX}{digits}"
            )));
        }
        Ok(Self(format!("{IDENTIFIER_PREFIX}{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == SENTINEL_IDENTIFIER
    }
}

impl fmt::Display for SyntheticIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SyntheticIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(IDENTIFIER_PREFIX)
            .ok_or_else(|| IdentifierError::Malformed(s.to_string()))?;
        Self::from_digits(digits).map_err(|_| IdentifierError::Malformed(s.to_string()))
    }
}

impl TryFrom<String> for SyntheticIdentifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SyntheticIdentifier> for String {
    fn from(id: SyntheticIdentifier) -> Self {
        id.0
    }
}
