use super::event::Event;
use super::stage::{ConversationOutcome, Stage};
use crate::error::{Result, SupportError};
use crate::identifier::Identifier;
use crate::prompts;
use crate::status::{LookupKind, Status};
use crate::ticket::TicketReason;

/// Ticket the caller must open before replying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    pub user_id: Identifier,
    pub subject_id: Identifier,
    pub reason: TicketReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Stage,
    pub outcome: ConversationOutcome,
    pub reply: String,
    pub escalation: Option<Escalation>,
}

impl Transition {
    fn advance(next: Stage, reply: String) -> Self {
        Self {
            next,
            outcome: ConversationOutcome::Continue,
            reply,
            escalation: None,
        }
    }

    fn terminate(reply: impl Into<String>) -> Self {
        Self {
            next: Stage::Resolved {
                outcome: ConversationOutcome::Terminate,
            },
            outcome: ConversationOutcome::Terminate,
            reply: reply.into(),
            escalation: None,
        }
    }

    fn escalate(reply: impl Into<String>, escalation: Escalation) -> Self {
        Self {
            next: Stage::Resolved {
                outcome: ConversationOutcome::EscalateToTicket,
            },
            outcome: ConversationOutcome::EscalateToTicket,
            reply: reply.into(),
            escalation: Some(escalation),
        }
    }
}

/// Compute the next stage for `event` arriving in `stage`.
///
/// Events that do not belong to `stage` are rejected with
/// `InvalidTransition`; a resolved stage accepts no events at all.
pub fn transition(stage: &Stage, event: Event, threshold_hours: u32) -> Result<Transition> {
    match (stage, event) {
        (Stage::CollectUserId, Event::UserResolved { user_id, status }) => {
            Ok(on_user(user_id, status))
        }
        (
            Stage::CollectListingOrBrandId { user_id },
            Event::ListingResolved {
                listing_id,
                status,
                can_reactivate,
            },
        ) => Ok(on_listing(user_id, listing_id, status, can_reactivate)),
        (
            Stage::CollectListingOrBrandId { user_id },
            Event::BrandResolved {
                request_id,
                status,
                elapsed_hours,
            },
        ) => Ok(on_brand(
            user_id,
            request_id,
            status,
            elapsed_hours,
            threshold_hours,
        )),
        (stage, event) => Err(SupportError::InvalidTransition {
            stage: stage.name().to_string(),
            event: event.name().to_string(),
        }),
    }
}

fn on_user(user_id: Identifier, status: Status) -> Transition {
    let message = prompts::status_message(LookupKind::User, status);
    match status {
        Status::Active => Transition::advance(
            Stage::CollectListingOrBrandId { user_id },
            format!("{} {}", message, prompts::ASK_SUBJECT_ID),
        ),
        Status::Onboarding | Status::OnHold => Transition::terminate(message),
        _ => Transition::terminate(prompts::UNKNOWN_RECORD),
    }
}

fn on_listing(
    user_id: &Identifier,
    listing_id: Identifier,
    status: Status,
    can_reactivate: bool,
) -> Transition {
    let message = prompts::status_message(LookupKind::Listing, status);
    match status {
        Status::Blocked if can_reactivate => Transition::escalate(
            message,
            Escalation {
                user_id: user_id.clone(),
                subject_id: listing_id,
                reason: TicketReason::ReactivationRequested,
            },
        ),
        Status::Blocked => {
            Transition::terminate(format!("{} {}", message, prompts::CANNOT_REACTIVATE))
        }
        Status::Archived => {
            Transition::terminate(format!("{} {}", message, prompts::ARCHIVED_FINAL))
        }
        Status::Active | Status::Inactive | Status::PendingApproval | Status::Failed => {
            Transition::terminate(message)
        }
        _ => Transition::terminate(prompts::UNKNOWN_RECORD),
    }
}

fn on_brand(
    user_id: &Identifier,
    request_id: Identifier,
    status: Status,
    elapsed_hours: u32,
    threshold_hours: u32,
) -> Transition {
    let message = prompts::status_message(LookupKind::Brand, status);
    match status {
        Status::InProgress | Status::Disapproved if elapsed_hours > threshold_hours => {
            Transition::escalate(
                message,
                Escalation {
                    user_id: user_id.clone(),
                    subject_id: request_id,
                    reason: TicketReason::BrandApprovalFollowUp,
                },
            )
        }
        Status::InProgress | Status::Disapproved => Transition::terminate(format!(
            "{} {}",
            message,
            prompts::still_processing(threshold_hours)
        )),
        Status::Approved | Status::Failed => Transition::terminate(message),
        _ => Transition::terminate(prompts::UNKNOWN_RECORD),
    }
}
