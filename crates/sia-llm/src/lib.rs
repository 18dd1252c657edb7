pub mod openai;
pub mod provider;
pub mod router;

pub use openai::OpenAIProvider;
pub use provider::{Completer, LLMError, Result};
pub use router::TopicRouter;
