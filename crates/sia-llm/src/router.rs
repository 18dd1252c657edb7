use std::sync::Arc;

use sia_core::{prompts, Topic};

use crate::provider::Completer;

/// Decides whether a message is about a listing or a brand approval.
///
/// Keywords are tried first; the completer is only consulted for messages
/// that carry none, and only when no topic has been settled yet.
#[derive(Clone, Default)]
pub struct TopicRouter {
    completer: Option<Arc<dyn Completer>>,
}

impl TopicRouter {
    pub fn new(completer: Option<Arc<dyn Completer>>) -> Self {
        Self { completer }
    }

    pub fn has_completer(&self) -> bool {
        self.completer.is_some()
    }

    /// Topic for this message, or `None` to keep whatever the session
    /// remembers (listing when it remembers nothing).
    pub async fn route(&self, text: &str, remembered: Option<Topic>) -> Option<Topic> {
        if let Some(topic) = Topic::detect(text) {
            return Some(topic);
        }
        if remembered.is_some() {
            return None;
        }
        self.classify(text).await
    }

    /// Ask the completer. Failures are logged and yield `None`.
    pub async fn classify(&self, text: &str) -> Option<Topic> {
        let completer = self.completer.as_ref()?;
        match completer
            .complete(&prompts::topic_classification_prompt(text))
            .await
        {
            Ok(reply) => {
                let topic = parse_topic_reply(&reply);
                log::debug!(
                    "Completer {} classified topic as {:?} ({:?})",
                    completer.model(),
                    topic,
                    reply.trim()
                );
                topic
            }
            Err(e) => {
                log::warn!("Topic classification failed, using default: {}", e);
                None
            }
        }
    }
}

fn parse_topic_reply(reply: &str) -> Option<Topic> {
    let reply = reply.trim().to_ascii_lowercase();
    if reply.contains("brand") {
        Some(Topic::Brand)
    } else if reply.contains("listing") {
        Some(Topic::Listing)
    } else {
        None
    }
}
