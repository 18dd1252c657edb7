use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifier::Identifier;

/// Number of the first ticket opened in a session.
pub const FIRST_TICKET_NUMBER: u32 = 12345;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketReason {
    ReactivationRequested,
    BrandApprovalFollowUp,
}

impl fmt::Display for TicketReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReactivationRequested => write!(f, "Reactivation requested"),
            Self::BrandApprovalFollowUp => write!(f, "Brand approval follow-up"),
        }
    }
}

/// Synthetic support ticket. Never updated once opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub user_id: Identifier,
    /// Listing or brand-request the ticket is about.
    pub subject_id: Identifier,
    pub reason: TicketReason,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketLedger {
    next_number: u32,
    tickets: Vec<Ticket>,
}

impl Default for TicketLedger {
    fn default() -> Self {
        Self {
            next_number: FIRST_TICKET_NUMBER,
            tickets: Vec::new(),
        }
    }
}

impl TicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(
        &mut self,
        user_id: Identifier,
        subject_id: Identifier,
        reason: TicketReason,
    ) -> &Ticket {
        let ticket = Ticket {
            id: format!("TICKET{}", self.next_number),
            user_id,
            subject_id,
            reason,
            created_at: Utc::now(),
        };
        self.next_number += 1;
        log::info!(
            "[create_support_ticket] {} for user {} regarding {}: {}",
            ticket.id,
            ticket.user_id,
            ticket.subject_id,
            ticket.reason
        );
        self.tickets.push(ticket);
        &self.tickets[self.tickets.len() - 1]
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
