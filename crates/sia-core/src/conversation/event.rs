use crate::identifier::Identifier;
use crate::status::Status;

/// A resolved lookup, ready to drive the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    UserResolved {
        user_id: Identifier,
        status: Status,
    },
    ListingResolved {
        listing_id: Identifier,
        status: Status,
        can_reactivate: bool,
    },
    BrandResolved {
        request_id: Identifier,
        status: Status,
        elapsed_hours: u32,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserResolved { .. } => "user-resolved",
            Self::ListingResolved { .. } => "listing-resolved",
            Self::BrandResolved { .. } => "brand-resolved",
        }
    }
}
