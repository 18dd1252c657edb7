use crate::error::{Result, SupportError};
use crate::identifier::Identifier;
use crate::status::{LookupKind, Status};

/// Block reason the synthetic listing API attaches to blocked listings.
pub const BLOCK_REASON_SELLER_STATE_CHANGE: &str = "seller_state_change";

/// Map an identifier to its synthetic status.
///
/// User IDs are keyed on the first digit, listing and brand-request IDs on
/// the last digit. A leading 5 on user or listing IDs simulates a flaky
/// downstream call and always yields `ApiError`.
pub fn classify(kind: LookupKind, id: &Identifier) -> Status {
    match kind {
        LookupKind::User => classify_user(id),
        LookupKind::Listing => classify_listing(id),
        LookupKind::Brand => classify_brand(id),
    }
}

fn classify_user(id: &Identifier) -> Status {
    match id.first_digit() {
        5 => Status::ApiError,
        1 => Status::Active,
        2 => Status::Onboarding,
        _ => Status::Unknown,
    }
}

fn classify_listing(id: &Identifier) -> Status {
    if id.first_digit() == 5 {
        return Status::ApiError;
    }
    match id.last_digit() {
        1 => Status::Inactive,
        2 => Status::Blocked,
        3 => Status::Archived,
        4 => Status::PendingApproval,
        _ => Status::Active,
    }
}

fn classify_brand(id: &Identifier) -> Status {
    match id.last_digit() {
        1 => Status::Approved,
        2 => Status::InProgress,
        3 => Status::Disapproved,
        _ => Status::Unknown,
    }
}

/// One call against the support backend.
///
/// A single attempt either returns a status or fails; transient failures are
/// retried by [`crate::retry::RetryPolicy`], never by implementors.
pub trait Lookup: Send + Sync {
    fn lookup(&self, kind: LookupKind, id: &Identifier) -> Result<Status>;

    /// Whether a blocked listing may be reactivated through a support ticket.
    fn can_reactivate(&self, _listing_id: &Identifier, _block_reason: &str) -> bool {
        true
    }
}

/// Backend that answers purely from identifier digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticLookup;

impl Lookup for SyntheticLookup {
    fn lookup(&self, kind: LookupKind, id: &Identifier) -> Result<Status> {
        match classify(kind, id) {
            Status::ApiError => Err(SupportError::TransientLookupFailure {
                kind,
                identifier: id.to_string(),
            }),
            Status::Unknown => Err(SupportError::UnknownIdentifierPattern {
                kind,
                identifier: id.to_string(),
            }),
            status => Ok(status),
        }
    }

    fn can_reactivate(&self, listing_id: &Identifier, block_reason: &str) -> bool {
        log::debug!(
            "[can_reactivate] listing {} blocked for '{}': reactivation allowed",
            listing_id,
            block_reason
        );
        true
    }
}
