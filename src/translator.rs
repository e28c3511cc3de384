//! Line translator with a two-tier fallback.
//!
//! The chat-completion API is tried first when a key is configured; Google
//! Translate covers the case where it is disabled or fails for a line.

use crate::chat::ChatClient;
use crate::config::Config;
use crate::error::TranslateError;
use crate::google::GoogleClient;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Translation and transliteration of one line.
///
/// Either field may be empty when nothing could be extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTranslation {
    /// English translation.
    pub translation: String,

    /// Franco-Arabic transliteration of the source text.
    pub romanization: String,
}

/// Result of the primary (chat-completion) path for one line.
#[derive(Debug)]
pub enum PrimaryOutcome {
    /// The chat model produced a result.
    Translated(LineTranslation),
    /// No API key is configured.
    NotConfigured,
    /// The call failed; the caller falls back to Google Translate.
    Failed(TranslateError),
}

/// One entry of a batch response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranslatedLine {
    /// The input line, echoed back unchanged.
    pub arabic: Value,
    pub english: String,
    pub franco: String,
}

/// Translates Arabic lines using the chat API with Google Translate as fallback.
#[derive(Clone)]
pub struct Translator {
    /// Present only when an API key is configured.
    chat: Option<ChatClient>,

    google: GoogleClient,
}

impl Translator {
    /// Creates a translator from the loaded configuration.
    ///
    /// Both clients share one HTTP client. No request timeout is set, so
    /// calls wait as long as the transport allows.
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::new();

        let chat = config.openai_api_key.as_ref().map(|key| {
            ChatClient::new(
                client.clone(),
                &config.openai_base_url,
                key.clone(),
                config.openai_model.clone(),
            )
        });

        match &chat {
            Some(chat) => info!("Primary translation via chat model '{}'", chat.model()),
            None => info!("No OPENAI_API_KEY set, using Google Translate only"),
        }

        Self {
            chat,
            google: GoogleClient::new(client, &config.google_translate_url),
        }
    }

    /// Translates a single line.
    ///
    /// # Errors
    ///
    /// Only fallback-path failures are returned. Primary-path failures are
    /// logged and recovered by falling back.
    pub async fn translate(&self, line: &str) -> Result<LineTranslation, TranslateError> {
        match self.translate_primary(line).await {
            PrimaryOutcome::Translated(result) => {
                debug!("Translated '{}' with chat model", line);
                Ok(result)
            }
            PrimaryOutcome::NotConfigured => self.translate_fallback(line).await,
            PrimaryOutcome::Failed(e) => {
                warn!("Chat translation failed for '{}', falling back: {}", line, e);
                self.translate_fallback(line).await
            }
        }
    }

    /// Runs the chat-completion path for one line.
    pub async fn translate_primary(&self, line: &str) -> PrimaryOutcome {
        let Some(chat) = &self.chat else {
            return PrimaryOutcome::NotConfigured;
        };

        match chat.translate(line).await {
            Ok(result) => PrimaryOutcome::Translated(result),
            Err(e) => PrimaryOutcome::Failed(e),
        }
    }

    /// Runs the Google Translate path for one line.
    pub async fn translate_fallback(&self, line: &str) -> Result<LineTranslation, TranslateError> {
        let result = self.google.translate(line).await?;
        debug!("Translated '{}' with Google Translate", line);
        Ok(result)
    }

    /// Translates every line in order, one at a time.
    ///
    /// Never fails: a line whose translation errors out gets empty fields.
    /// Non-string lines are translated as their JSON text and echoed back as-is.
    pub async fn translate_batch(&self, lines: &[Value]) -> Vec<TranslatedLine> {
        let mut results = Vec::with_capacity(lines.len());

        for line in lines {
            let text = match line {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };

            let (english, franco) = match self.translate(&text).await {
                Ok(result) => (result.translation, result.romanization),
                Err(e) => {
                    warn!("Translation failed for '{}': {}", text, e);
                    (String::new(), String::new())
                }
            };

            results.push(TranslatedLine {
                arabic: line.clone(),
                english,
                franco,
            });
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer, api_key: Option<&str>) -> Config {
        let uri = server.uri();
        Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => api_key.map(str::to_string),
            "OPENAI_BASE_URL" => Some(format!("{}/v1", uri)),
            "GOOGLE_TRANSLATE_URL" => Some(format!("{}/translate_a/single", uri)),
            _ => None,
        })
        .unwrap()
    }

    async fn mount_google(server: &MockServer, q: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("q", q))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
    }

    #[tokio::test]
    async fn test_primary_result_is_used() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"franco": "2ahlan", "english": "hello"}"#)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let translator = Translator::new(&test_config(&server, Some("sk-test")));
        let result = translator.translate("أهلا").await.unwrap();
        assert_eq!(result.translation, "hello");
        assert_eq!(result.romanization, "2ahlan");
    }

    #[tokio::test]
    async fn test_not_configured_uses_fallback() {
        let server = MockServer::start().await;
        mount_google(&server, "مرحبا", json!([[["hello", "مرحبا", null, "marhaba"]]])).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let translator = Translator::new(&test_config(&server, None));
        assert!(matches!(
            translator.translate_primary("مرحبا").await,
            PrimaryOutcome::NotConfigured
        ));

        let result = translator.translate("مرحبا").await.unwrap();
        assert_eq!(result.translation, "hello");
        assert_eq!(result.romanization, "marhaba");
    }

    #[tokio::test]
    async fn test_primary_failure_is_transparent() {
        let server = MockServer::start().await;
        mount_google(&server, "مرحبا", json!([[["hello", "مرحبا", null, "marhaba"]]])).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(2)
            .mount(&server)
            .await;

        let translator = Translator::new(&test_config(&server, Some("sk-test")));
        assert!(matches!(
            translator.translate_primary("مرحبا").await,
            PrimaryOutcome::Failed(TranslateError::Status { .. })
        ));

        let standalone = translator.translate_fallback("مرحبا").await.unwrap();
        let with_fallback = translator.translate("مرحبا").await.unwrap();
        assert_eq!(with_fallback, standalone);
    }

    #[tokio::test]
    async fn test_primary_error_field_falls_back() {
        let server = MockServer::start().await;
        mount_google(&server, "شكرا", json!([[["thanks", "شكرا", null, "shukran"]]])).await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "error": { "message": "quota exceeded" } })),
            )
            .mount(&server)
            .await;

        let translator = Translator::new(&test_config(&server, Some("sk-test")));
        let result = translator.translate("شكرا").await.unwrap();
        assert_eq!(result.translation, "thanks");
        assert_eq!(result.romanization, "shukran");
    }

    #[tokio::test]
    async fn test_both_paths_failing_returns_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let translator = Translator::new(&test_config(&server, Some("sk-test")));
        assert!(matches!(
            translator.translate("مرحبا").await,
            Err(TranslateError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_degrades() {
        let server = MockServer::start().await;
        mount_google(&server, "واحد", json!([[["one", "واحد", null, "wa7ed"]]])).await;
        mount_google(&server, "اثنان", json!([[["two", "اثنان", null, "ethnan"]]])).await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("q", "خطأ"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let translator = Translator::new(&test_config(&server, None));
        let lines = vec![json!("واحد"), json!("خطأ"), json!("اثنان"), json!("واحد")];
        let results = translator.translate_batch(&lines).await;

        assert_eq!(results.len(), lines.len());
        for (result, line) in results.iter().zip(&lines) {
            assert_eq!(&result.arabic, line);
        }
        assert_eq!(results[0].english, "one");
        assert_eq!(results[0].franco, "wa7ed");
        assert_eq!(results[1].english, "");
        assert_eq!(results[1].franco, "");
        assert_eq!(results[2].english, "two");
        assert_eq!(results[3], results[0]);
    }

    #[tokio::test]
    async fn test_batch_non_string_line_is_echoed() {
        let server = MockServer::start().await;
        mount_google(&server, "42", json!([[["42", "42"]]])).await;

        let translator = Translator::new(&test_config(&server, None));
        let results = translator.translate_batch(&[json!(42)]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].arabic, json!(42));
        assert_eq!(results[0].english, "42");
        assert_eq!(results[0].franco, "");
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let server = MockServer::start().await;
        let translator = Translator::new(&test_config(&server, None));
        assert!(translator.translate_batch(&[]).await.is_empty());
    }
}
