//! Conversation state machine.
//!
//! Stages and events form a closed set; [`transition`] is pure and never
//! performs lookups itself. The caller resolves the identifier first and
//! hands the result in as an [`Event`].

mod event;
mod stage;
mod transition;

pub use event::Event;
pub use stage::{ConversationOutcome, Stage};
pub use transition::{transition, Escalation, Transition};
