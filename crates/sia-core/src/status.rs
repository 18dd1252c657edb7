use serde::{Deserialize, Serialize};
use std::fmt;

/// Which synthetic support API a lookup goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    User,
    Listing,
    Brand,
}

impl LookupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Listing => "listing",
            Self::Brand => "brand",
        }
    }

    /// Status reported once every retry attempt failed.
    pub fn exhausted_status(self) -> Status {
        match self {
            Self::User => Status::OnHold,
            Self::Listing | Self::Brand => Status::Failed,
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "listing" => Ok(Self::Listing),
            "brand" => Ok(Self::Brand),
            other => Err(format!("unknown lookup kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Active,
    Onboarding,
    Blocked,
    Archived,
    PendingApproval,
    Inactive,
    Approved,
    InProgress,
    Disapproved,
    ApiError,
    /// User lookup gave up after the retry budget.
    OnHold,
    /// Listing or brand lookup gave up after the retry budget.
    Failed,
    Unknown,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Onboarding => "onboarding",
            Self::Blocked => "blocked",
            Self::Archived => "archived",
            Self::PendingApproval => "pending-approval",
            Self::Inactive => "inactive",
            Self::Approved => "approved",
            Self::InProgress => "in-progress",
            Self::Disapproved => "disapproved",
            Self::ApiError => "api-error",
            Self::OnHold => "on-hold",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_transient(self) -> bool {
        matches!(self, Self::ApiError)
    }

    pub fn is_exhausted(self) -> bool {
        matches!(self, Self::OnHold | Self::Failed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
