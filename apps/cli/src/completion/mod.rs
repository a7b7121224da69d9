//! Completion client — the single point of entry for the external
//! text-generation service. Builds one of two prompt templates and performs
//! exactly one request/response round trip per call: no retry, no streaming,
//! no client-enforced timeout (the transport's defaults govern).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::UserProfile;

pub mod prompts;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all completion calls.
pub const MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("Completion service returned no content")]
    EmptyContent,
}

/// Which of the two templates to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    CoverLetter,
    Question,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Seam for the generation flows: production uses `CompletionClient`, tests
/// substitute canned or failing backends.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Returns the first completion's text, or `None` when the service
    /// returns no choices. Stateless; identical inputs may produce
    /// different outputs across calls.
    async fn generate(
        &self,
        free_text: &str,
        kind: PromptKind,
        profile: &UserProfile,
    ) -> Result<Option<String>, CompletionError>;
}

#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: Option<String>,
}

impl CompletionClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn generate(
        &self,
        free_text: &str,
        kind: PromptKind,
        profile: &UserProfile,
    ) -> Result<Option<String>, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;

        let prompt = match kind {
            PromptKind::CoverLetter => prompts::cover_letter_prompt(free_text, profile),
            PromptKind::Question => prompts::question_prompt(free_text, profile),
        };
        debug!("completion prompt built ({} chars)", prompt.len());

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;
        Ok(first_choice_text(completion))
    }
}

fn first_choice_text(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_choice_text_reads_the_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Dear client,"}},
                {"message":{"role":"assistant","content":"ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response), Some("Dear client,".to_string()));
    }

    #[test]
    fn first_choice_text_is_none_without_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(first_choice_text(response), None);

        let response: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(first_choice_text(response), None);
    }

    #[test]
    fn first_choice_text_is_none_for_null_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(first_choice_text(response), None);
    }
}
