//! Chat-completion client used as the primary translation path.
//!
//! Sends the Arabic line to an OpenAI-compatible `/chat/completions`
//! endpoint and asks for Franco-Arabic plus English as a JSON object.

use crate::error::TranslateError;
use crate::extract::extract_fields;
use crate::translator::LineTranslation;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const SERVICE: &str = "chat completion API";

/// Low temperature keeps transliterations consistent between calls.
const TEMPERATURE: f64 = 0.3;

/// Instruction sent as the system message of every request.
pub const SYSTEM_PROMPT: &str = "You translate Arabic text. For the user's message, return \
the Franco-Arabic (Arabizi) transliteration using Latin letters and digits, where 3 stands \
for ع, 7 for ح, 2 for ء and 5 for خ, and an English translation. Respond only with a JSON \
object of the form {\"franco\": \"...\", \"english\": \"...\"} and no extra commentary.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Client for an OpenAI-compatible chat-completion API.
#[derive(Clone)]
pub struct ChatClient {
    /// HTTP client shared with the rest of the translator.
    client: reqwest::Client,

    /// Full URL of the `/chat/completions` endpoint.
    url: String,

    /// Bearer token.
    api_key: String,

    /// Model identifier.
    model: String,
}

impl ChatClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Translates one line through the chat model.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx statuses, an `error` field in the
    /// body, or a body without `choices[0].message.content`.
    pub async fn translate(&self, line: &str) -> Result<LineTranslation, TranslateError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: line,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::network(SERVICE, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::network(SERVICE, e))?;

        if !status.is_success() {
            return Err(TranslateError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        let content = parse_completion(&body)?;
        debug!("Chat completion for '{}': {}", line, content);

        Ok(extract_fields(&content))
    }
}

/// Returns the trimmed content of the first choice.
fn parse_completion(body: &str) -> Result<String, TranslateError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| TranslateError::parse(SERVICE, format!("invalid JSON: {}", e)))?;

    if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(TranslateError::Api(message));
    }

    json.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| TranslateError::parse(SERVICE, "missing choices[0].message.content"))
}
