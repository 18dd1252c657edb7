use crate::provider::{Completer, LLMError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sia_core::Config;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Non-streaming chat-completions client.
///
/// Speaks the plain OpenAI API by default. With an `api_version` set it
/// targets an Azure OpenAI deployment instead: the model name becomes the
/// deployment name and the key travels in the `api-key` header.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    api_version: Option<String>,
    system_prompt: Option<String>,
    temperature: f32,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_version: None,
            system_prompt: None,
            temperature: 0.0,
        }
    }

    /// `None` unless the config carries both a key and an endpoint.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.llm_configured() {
            return None;
        }
        let mut provider = Self::new(config.api_key.clone().unwrap_or_default());
        if let Some(base_url) = &config.api_base {
            provider = provider.with_base_url(base_url.clone());
        }
        if let Some(model) = &config.model {
            provider = provider.with_model(model.clone());
        }
        if let Some(api_version) = &config.api_version {
            provider = provider.with_api_version(api_version.clone());
        }
        Some(provider)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        match self.api_version {
            Some(_) => format!(
                "{}/openai/deployments/{}/chat/completions",
                self.base_url, self.model
            ),
            None => format!("{}/chat/completions", self.base_url),
        }
    }

    fn build_request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = &self.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl Completer for OpenAIProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = self.build_request_body(prompt);
        let url = self.endpoint();
        log::debug!("POST {} (model {})", url, self.model);

        let request = self.client.post(&url).json(&body);
        let request = match &self.api_version {
            Some(version) => request
                .query(&[("api-version", version.as_str())])
                .header("api-key", &self.api_key),
            None => request.bearer_auth(&self.api_key),
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(LLMError::Api(format!("HTTP {}: {}", status, text)));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&response.text().await?)?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LLMError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
