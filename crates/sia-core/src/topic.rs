use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::LookupKind;

/// What the user wants help with once their account is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[default]
    Listing,
    Brand,
}

impl Topic {
    pub fn lookup_kind(self) -> LookupKind {
        match self {
            Self::Listing => LookupKind::Listing,
            Self::Brand => LookupKind::Brand,
        }
    }

    /// Keyword match on a user turn. `None` when the text names neither.
    pub fn detect(text: &str) -> Option<Self> {
        let text = text.to_ascii_lowercase();
        let mentions_rfa = text
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word == "rfa");
        if text.contains("brand") || mentions_rfa {
            Some(Self::Brand)
        } else if text.contains("listing") || text.contains("product") {
            Some(Self::Listing)
        } else if text.contains("approval") {
            Some(Self::Brand)
        } else {
            None
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Brand => write!(f, "brand"),
        }
    }
}
