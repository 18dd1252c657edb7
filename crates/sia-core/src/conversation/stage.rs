use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifier::Identifier;
use crate::status::LookupKind;
use crate::topic::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationOutcome {
    Continue,
    Terminate,
    EscalateToTicket,
}

impl ConversationOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

impl fmt::Display for ConversationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Terminate => write!(f, "terminate"),
            Self::EscalateToTicket => write!(f, "escalate-to-ticket"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum Stage {
    #[default]
    CollectUserId,
    CollectListingOrBrandId {
        user_id: Identifier,
    },
    /// Terminal. Holds the outcome that ended the conversation.
    Resolved {
        outcome: ConversationOutcome,
    },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CollectUserId => "collect-user-id",
            Self::CollectListingOrBrandId { .. } => "collect-listing-or-brand-id",
            Self::Resolved { .. } => "resolved",
        }
    }

    /// Lookup the next turn should run, `None` once resolved.
    pub fn lookup_kind(&self, topic: Topic) -> Option<LookupKind> {
        match self {
            Self::CollectUserId => Some(LookupKind::User),
            Self::CollectListingOrBrandId { .. } => Some(topic.lookup_kind()),
            Self::Resolved { .. } => None,
        }
    }

    pub fn outcome(&self) -> ConversationOutcome {
        match self {
            Self::Resolved { outcome } => *outcome,
            _ => ConversationOutcome::Continue,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
