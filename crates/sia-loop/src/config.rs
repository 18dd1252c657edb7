use std::sync::Arc;

use sia_core::{Config, SupportAssistant};
use sia_llm::{Completer, OpenAIProvider, TopicRouter};

/// Everything a turn needs besides the session itself.
#[derive(Clone)]
pub struct SupportLoopConfig {
    pub assistant: SupportAssistant,
    pub router: TopicRouter,
    /// Greet a session with no turns before handling its first message.
    pub greet_new_sessions: bool,
}

impl Default for SupportLoopConfig {
    fn default() -> Self {
        Self::new(SupportAssistant::default())
    }
}

impl SupportLoopConfig {
    pub fn new(assistant: SupportAssistant) -> Self {
        Self {
            assistant,
            router: TopicRouter::default(),
            greet_new_sessions: true,
        }
    }

    /// Assistant tuned from config, plus an OpenAI-compatible completer
    /// when one is configured.
    pub fn from_config(config: &Config) -> Self {
        let completer = OpenAIProvider::from_config(config).map(|provider| {
            log::info!("Topic fallback via {}", Completer::model(&provider));
            Arc::new(provider.with_system_prompt(sia_core::prompts::SIA_SYSTEM_PROMPT))
                as Arc<dyn Completer>
        });
        Self::new(SupportAssistant::from_config(config)).with_completer(completer)
    }

    pub fn with_completer(mut self, completer: Option<Arc<dyn Completer>>) -> Self {
        self.router = TopicRouter::new(completer);
        self
    }
}
