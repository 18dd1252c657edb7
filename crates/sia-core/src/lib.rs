pub mod assistant;
pub mod classifier;
pub mod config;
pub mod conversation;
pub mod error;
pub mod identifier;
pub mod prompts;
pub mod retry;
pub mod session;
pub mod status;
pub mod ticket;
pub mod timeline;
pub mod topic;

pub use assistant::{SupportAssistant, TurnReport};
pub use classifier::{classify, Lookup, SyntheticLookup};
pub use config::{Config, ConfigError};
pub use conversation::{transition, ConversationOutcome, Escalation, Event, Stage, Transition};
pub use error::{Result, SupportError};
pub use identifier::Identifier;
pub use retry::{AttemptResult, NoWait, Resolution, RetryOutcome, RetryPolicy, RetryWait, SleepWait};
pub use session::{Session, Speaker, Turn};
pub use status::{LookupKind, Status};
pub use ticket::{Ticket, TicketLedger, TicketReason};
pub use timeline::{ElapsedSource, FixedElapsed, SyntheticTimeline};
pub use topic::Topic;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
