use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::{ConversationOutcome, Stage};
use crate::retry::Resolution;
use crate::ticket::TicketLedger;
use crate::topic::Topic;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Speaker::System, text)
    }
}

/// One conversation: append-only transcript plus state machine position.
///
/// The transcript can only grow; [`Session::restart`] is the one way to clear it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    turns: Vec<Turn>,
    stage: Stage,
    /// Topic for the second stage, remembered once the user names it
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<Topic>,
    /// Most recent lookup, kept for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    last_resolution: Option<Resolution>,
    tickets: TicketLedger,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            turns: Vec::new(),
            stage: Stage::default(),
            topic: None,
            last_resolution: None,
            tickets: TicketLedger::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.updated_at = Utc::now();
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.turns
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    /// Attempts taken by the most recent lookup, 0 before any lookup.
    pub fn attempts(&self) -> u32 {
        self.last_resolution.map_or(0, |r| r.attempts)
    }

    pub fn tickets(&self) -> &TicketLedger {
        &self.tickets
    }

    pub fn outcome(&self) -> ConversationOutcome {
        self.stage.outcome()
    }

    pub fn is_resolved(&self) -> bool {
        self.stage.is_resolved()
    }

    /// Drop the transcript and every piece of conversation state.
    pub fn restart(&mut self) {
        log::info!("[{}] Restarting session", self.id);
        self.turns.clear();
        self.stage = Stage::default();
        self.topic = None;
        self.last_resolution = None;
        self.tickets = TicketLedger::new();
        self.updated_at = Utc::now();
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        if stage != self.stage {
            log::debug!("[{}] {} -> {}", self.id, self.stage, stage);
        }
        self.stage = stage;
        self.updated_at = Utc::now();
    }

    pub(crate) fn set_topic(&mut self, topic: Topic) {
        self.topic = Some(topic);
    }

    pub(crate) fn set_last_resolution(&mut self, resolution: Resolution) {
        self.last_resolution = Some(resolution);
    }

    pub(crate) fn tickets_mut(&mut self) -> &mut TicketLedger {
        &mut self.tickets
    }
}
