use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SupportError};

pub const MIN_IDENTIFIER_LEN: usize = 3;
pub const MAX_IDENTIFIER_LEN: usize = 12;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("valid token regex"));

/// A numeric user, listing or brand-request identifier.
///
/// Always 3 to 12 ASCII digits, so `first_digit` and `last_digit` cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SupportError::malformed(raw, "identifier is empty"));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SupportError::malformed(raw, "identifiers contain digits only"));
        }
        if !(MIN_IDENTIFIER_LEN..=MAX_IDENTIFIER_LEN).contains(&raw.len()) {
            return Err(SupportError::malformed(
                raw,
                format!(
                    "identifiers are {} to {} digits long",
                    MIN_IDENTIFIER_LEN, MAX_IDENTIFIER_LEN
                ),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Pull the identifier out of a free-text turn.
    ///
    /// The first alphanumeric token that contains a digit is taken as the
    /// identifier, so "my id is 1001" and "#1001." both work while "12a4"
    /// is rejected rather than silently truncated.
    pub fn extract(text: &str) -> Result<Self> {
        let candidate = TOKEN
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|token| token.bytes().any(|b| b.is_ascii_digit()));

        match candidate {
            Some(token) => Self::parse(token),
            None => Err(SupportError::malformed(
                text.trim(),
                "no identifier found in message",
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn first_digit(&self) -> u8 {
        self.0.as_bytes()[0] - b'0'
    }

    pub fn last_digit(&self) -> u8 {
        self.0.as_bytes()[self.0.len() - 1] - b'0'
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = SupportError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_digits() {
        let id = Identifier::parse(" 1001 ").unwrap();
        assert_eq!(id.as_str(), "1001");
        assert_eq!(id.first_digit(), 1);
        assert_eq!(id.last_digit(), 1);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = Identifier::parse("10a1").unwrap_err();
        assert!(matches!(err, SupportError::MalformedIdentifier { .. }));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Identifier::parse("12").is_err());
        assert!(Identifier::parse("1234567890123").is_err());
        assert!(Identifier::parse("123").is_ok());
        assert!(Identifier::parse("123456789012").is_ok());
    }

    #[test]
    fn extract_finds_identifier_in_sentence() {
        let id = Identifier::extract("Sure, my user id is 5005.").unwrap();
        assert_eq!(id.as_str(), "5005");

        let id = Identifier::extract("listing #1002 please").unwrap();
        assert_eq!(id.as_str(), "1002");
    }

    #[test]
    fn extract_rejects_text_without_digits() {
        let err = Identifier::extract("I need help with my listing").unwrap_err();
        match err {
            SupportError::MalformedIdentifier { reason, .. } => {
                assert!(reason.contains("no identifier"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extract_rejects_mixed_token() {
        assert!(Identifier::extract("id 12a4").is_err());
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let id: Identifier = serde_json::from_str("\"2002\"").unwrap();
        assert_eq!(id.as_str(), "2002");
        assert!(serde_json::from_str::<Identifier>("\"abc\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"2002\"");
    }
}
