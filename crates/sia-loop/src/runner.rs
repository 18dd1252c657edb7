use sia_core::{Session, Stage, Topic, TurnReport};

use crate::config::SupportLoopConfig;

/// Greet the session if it is brand new.
pub fn open_session(config: &SupportLoopConfig, session: &mut Session) {
    if config.greet_new_sessions {
        config.assistant.start(session);
    }
}

/// Topic hint for one turn.
///
/// The completer is only asked while the listing-or-brand identifier is
/// being collected; earlier turns rely on keywords alone.
pub async fn route_topic(
    config: &SupportLoopConfig,
    session: &Session,
    text: &str,
) -> Option<Topic> {
    let topic = match session.stage() {
        Stage::CollectListingOrBrandId { .. } => {
            config.router.route(text, session.topic()).await
        }
        _ => Topic::detect(text),
    };
    if let Some(topic) = topic {
        log::debug!("[{}] Routed turn to {}", session.id, topic);
    }
    topic
}

/// Route the turn to a topic, then let the assistant handle it.
pub async fn run_turn(config: &SupportLoopConfig, session: &mut Session, text: &str) -> TurnReport {
    open_session(config, session);
    let topic = route_topic(config, session, text).await;
    config.assistant.handle_turn(session, text, topic)
}

/// Feed several turns in order and collect their reports.
pub async fn run_script<I, S>(
    config: &SupportLoopConfig,
    session: &mut Session,
    turns: I,
) -> Vec<TurnReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut reports = Vec::new();
    for turn in turns {
        reports.push(run_turn(config, session, turn.as_ref()).await);
    }
    reports
}
