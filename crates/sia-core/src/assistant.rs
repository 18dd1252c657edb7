use serde::Serialize;
use std::sync::Arc;

use crate::classifier::{Lookup, SyntheticLookup, BLOCK_REASON_SELLER_STATE_CHANGE};
use crate::config::Config;
use crate::conversation::{transition, ConversationOutcome, Event, Stage};
use crate::identifier::Identifier;
use crate::prompts;
use crate::retry::{NoWait, Resolution, RetryPolicy, RetryWait, SleepWait};
use crate::session::{Session, Turn};
use crate::status::{LookupKind, Status};
use crate::ticket::Ticket;
use crate::timeline::{ElapsedSource, SyntheticTimeline, DEFAULT_ESCALATION_THRESHOLD_HOURS};
use crate::topic::Topic;

/// What a presentation shell needs after one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub reply: String,
    pub outcome: ConversationOutcome,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
}

impl TurnReport {
    fn unchanged(session: &Session, reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            outcome: session.outcome(),
            stage: session.stage().clone(),
            status: None,
            attempts: 0,
            ticket: None,
        }
    }
}

/// Drives one session through the conversation state machine.
///
/// Holds no per-session state: every call takes the session explicitly, so a
/// single assistant serves any number of sessions.
#[derive(Clone)]
pub struct SupportAssistant {
    lookup: Arc<dyn Lookup>,
    retry: RetryPolicy,
    wait: Arc<dyn RetryWait>,
    elapsed: Arc<dyn ElapsedSource>,
    escalation_threshold_hours: u32,
}

impl Default for SupportAssistant {
    fn default() -> Self {
        Self::new()
    }
}

impl SupportAssistant {
    pub fn new() -> Self {
        Self {
            lookup: Arc::new(SyntheticLookup),
            retry: RetryPolicy::default(),
            wait: Arc::new(NoWait),
            elapsed: Arc::new(SyntheticTimeline),
            escalation_threshold_hours: DEFAULT_ESCALATION_THRESHOLD_HOURS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let wait: Arc<dyn RetryWait> = if config.retry_delay_ms > 0 {
            Arc::new(SleepWait::from_millis(config.retry_delay_ms))
        } else {
            Arc::new(NoWait)
        };
        Self::new()
            .with_retry_policy(RetryPolicy::new(config.max_retries))
            .with_wait(wait)
            .with_escalation_threshold(config.escalation_threshold_hours)
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn Lookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_wait(mut self, wait: Arc<dyn RetryWait>) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_elapsed_source(mut self, elapsed: Arc<dyn ElapsedSource>) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn with_escalation_threshold(mut self, hours: u32) -> Self {
        self.escalation_threshold_hours = hours;
        self
    }

    pub fn escalation_threshold_hours(&self) -> u32 {
        self.escalation_threshold_hours
    }

    /// Greet an empty session. No-op once the transcript has turns.
    pub fn start(&self, session: &mut Session) {
        if session.transcript().is_empty() {
            session.push(Turn::assistant(prompts::GREETING));
        }
    }

    pub fn restart(&self, session: &mut Session) {
        session.restart();
        self.start(session);
    }

    /// Single retried lookup, outside any conversation.
    pub fn resolve(&self, kind: LookupKind, id: &Identifier) -> Resolution {
        self.retry
            .resolve(self.lookup.as_ref(), kind, id, self.wait.as_ref())
    }

    /// Process one user turn and append both sides to the transcript.
    ///
    /// `topic_hint` picks the listing or brand branch of the second stage;
    /// without one the session's remembered topic (or listing) is used.
    pub fn handle_turn(
        &self,
        session: &mut Session,
        text: &str,
        topic_hint: Option<Topic>,
    ) -> TurnReport {
        session.push(Turn::user(text));
        if let Some(topic) = topic_hint.filter(|_| !session.is_resolved()) {
            session.set_topic(topic);
        }

        let report = self.advance(session, text);
        log::info!(
            "[{}] stage={} outcome={} status={} attempts={}",
            session.id,
            report.stage,
            report.outcome,
            report.status.map_or("-", Status::as_str),
            report.attempts
        );
        session.push(Turn::assistant(report.reply.clone()));
        report
    }

    fn advance(&self, session: &mut Session, text: &str) -> TurnReport {
        let topic = session.topic().unwrap_or_default();
        let Some(kind) = session.stage().lookup_kind(topic) else {
            return TurnReport::unchanged(session, prompts::CONVERSATION_ENDED);
        };

        let id = match Identifier::extract(text) {
            Ok(id) => id,
            Err(err) => {
                log::info!("[{}] {}", session.id, err);
                return TurnReport::unchanged(session, prompts::reprompt(kind));
            }
        };

        let resolution = self.resolve(kind, &id);
        session.set_last_resolution(resolution);

        let event = self.event_for(kind, id, resolution.status);
        let step = match transition(session.stage(), event, self.escalation_threshold_hours) {
            Ok(step) => step,
            Err(err) => {
                log::warn!("[{}] {}", session.id, err);
                return TurnReport::unchanged(session, prompts::reprompt(kind));
            }
        };

        let mut reply = step.reply;
        let ticket = step.escalation.map(|escalation| {
            let ticket = session
                .tickets_mut()
                .open(escalation.user_id, escalation.subject_id, escalation.reason)
                .clone();
            reply.push(' ');
            reply.push_str(&prompts::ticket_created(&ticket));
            ticket
        });
        session.set_stage(step.next);

        TurnReport {
            reply,
            outcome: step.outcome,
            stage: session.stage().clone(),
            status: Some(resolution.status),
            attempts: resolution.attempts,
            ticket,
        }
    }

    fn event_for(&self, kind: LookupKind, id: Identifier, status: Status) -> Event {
        match kind {
            LookupKind::User => Event::UserResolved {
                user_id: id,
                status,
            },
            LookupKind::Listing => {
                let can_reactivate = status == Status::Blocked
                    && self
                        .lookup
                        .can_reactivate(&id, BLOCK_REASON_SELLER_STATE_CHANGE);
                Event::ListingResolved {
                    listing_id: id,
                    status,
                    can_reactivate,
                }
            }
            LookupKind::Brand => Event::BrandResolved {
                elapsed_hours: self.elapsed.hours_since_request(&id, status),
                request_id: id,
                status,
            },
        }
    }
}
