use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::classify_status;
use crate::error::{AnalysisError, Result};

/// Trait for text-completion providers, used by the enhancement flow.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate text from a system prompt and a user prompt
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// OpenAI chat-completions provider
pub struct OpenAIChat {
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: Option<String>,
    client: reqwest::Client,
}

impl OpenAIChat {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            base_url: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: &str, max_tokens: u32) -> Self {
        self.model = model.to_string();
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for OpenAIChat {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1");
        let url = format!("{}/chat/completions", base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            AnalysisError::ProviderUnavailable(format!("failed to parse chat response: {}", e))
        })?;

        Ok(result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock completion provider for testing: echoes a canned response.
pub struct MockCompletionProvider {
    response: String,
}

impl MockCompletionProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    /// A provider that always returns empty content, for fallback tests
    pub fn empty() -> Self {
        Self {
            response: String::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-completion"
    }
}
