//! Canned assistant text.

use crate::status::{LookupKind, Status};
use crate::ticket::Ticket;

pub const GREETING: &str = "Hi, I'm SIA, your seller support assistant. I can help with listing \
issues and brand approval requests. Please provide your user ID to get started.";

pub const ASK_SUBJECT_ID: &str = "Please provide your listing ID, or your brand approval request ID.";

pub const CONVERSATION_ENDED: &str =
    "This conversation has ended. Start a new session if you need more help.";

pub const UNKNOWN_RECORD: &str =
    "We could not find a record matching that ID. Please contact support for further help.";

pub const USER_ON_HOLD: &str =
    "Account verification failed after multiple attempts. Please try again later.";

pub const LISTING_FAILED: &str =
    "Maximum retries reached for listing. Please try again later.";

pub const BRAND_FAILED: &str =
    "We could not reach the brand approval service. Please try again later.";

pub const CANNOT_REACTIVATE: &str = "This listing cannot be reactivated at this time.";

pub const ARCHIVED_FINAL: &str = "This listing is archived and cannot be reactivated.";

pub const SIA_SYSTEM_PROMPT: &str = "You are SIA, a support assistant for marketplace sellers. \
You help with listing-related queries and brand approval queries. Answer briefly and \
follow the instructions in each request exactly.";

/// Prompt sent to the completer when the user's topic is not obvious.
pub fn topic_classification_prompt(message: &str) -> String {
    format!(
        "A seller wrote the following message to support:\n\n\"{}\"\n\n\
         Do they need help with a product listing or with a brand approval request? \
         Answer with exactly one word: listing or brand.",
        message.trim()
    )
}

/// Re-prompt after a malformed identifier.
pub fn reprompt(kind: LookupKind) -> String {
    let what = match kind {
        LookupKind::User => "user ID",
        LookupKind::Listing => "listing ID",
        LookupKind::Brand => "brand approval request ID",
    };
    format!(
        "That doesn't look like a valid {}. IDs are numbers only, for example 1001. \
         Please provide your {}.",
        what, what
    )
}

/// Text the synthetic API returns alongside a status.
pub fn status_message(kind: LookupKind, status: Status) -> &'static str {
    match (kind, status) {
        (LookupKind::User, Status::Active) => "Your account is active.",
        (LookupKind::User, Status::Onboarding) => {
            "Your products aren't visible yet. Once onboarding is complete, your account \
             will be activated within 48 hours, and your listings will go live."
        }
        (LookupKind::User, Status::OnHold) => USER_ON_HOLD,
        (LookupKind::Listing, Status::Active) => "Your listing is active and visible to customers.",
        (LookupKind::Listing, Status::Inactive) => {
            "Your listing is currently inactive. Please activate it to be visible."
        }
        (LookupKind::Listing, Status::Blocked) => {
            "Your listing is blocked due to seller state change."
        }
        (LookupKind::Listing, Status::Archived) => {
            "Your listing is archived and not visible to customers."
        }
        (LookupKind::Listing, Status::PendingApproval) => "Your listing is pending approval (RFA).",
        (LookupKind::Listing, Status::Failed) => LISTING_FAILED,
        (LookupKind::Brand, Status::Approved) => "Your brand approval request is approved.",
        (LookupKind::Brand, Status::InProgress) => "Brand approval is still in progress.",
        (LookupKind::Brand, Status::Disapproved) => {
            "Brand approval disapproved. Additional steps required."
        }
        (LookupKind::Brand, Status::Failed) => BRAND_FAILED,
        _ => UNKNOWN_RECORD,
    }
}

pub fn still_processing(threshold_hours: u32) -> String {
    format!(
        "Your brand request is still in progress. Please allow up to {} hours while it is processed.",
        threshold_hours
    )
}

pub fn ticket_created(ticket: &Ticket) -> String {
    format!(
        "Support ticket {} created for user {} regarding {}: {}.",
        ticket.id, ticket.user_id, ticket.subject_id, ticket.reason
    )
}
