//! Public Google Translate client used as the fallback path.
//!
//! Calls the unauthenticated `translate_a/single` endpoint with both
//! translation (`dt=t`) and romanization (`dt=rm`) requested.
//!
//! The response is an undocumented nested array:
//!
//! ```json
//! [[["hello", "مرحبا", null, "marhaba"]], null, "ar"]
//! ```
//!
//! The translation is read from `[0][0][0]` and the romanization from
//! `[0][0][3]`. Anything missing along the translation path counts as a
//! parse failure.

use crate::error::TranslateError;
use crate::translator::LineTranslation;
use serde_json::Value;
use tracing::{debug, warn};

const SERVICE: &str = "Google Translate";

const SOURCE_LANG: &str = "ar";
const TARGET_LANG: &str = "en";

/// Client for the public Google Translate endpoint.
#[derive(Clone)]
pub struct GoogleClient {
    client: reqwest::Client,
    url: String,
}

impl GoogleClient {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Translates one Arabic line to English.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body
    /// that is not the expected nested array.
    pub async fn translate(&self, line: &str) -> Result<LineTranslation, TranslateError> {
        let encoded_text = urlencoding::encode(line);
        let url = format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&dt=rm&q={}",
            self.url, SOURCE_LANG, TARGET_LANG, encoded_text
        );

        let response = self
            .client
            .get(&url)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .send()
            .await
            .map_err(|e| TranslateError::network(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Google Translate API error: {} - {}", status, body);
            return Err(TranslateError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::network(SERVICE, e))?;

        let result = parse_response(&body)?;

        debug!(
            "Google Translate: '{}' -> '{}' (romanization: '{}')",
            line, result.translation, result.romanization
        );

        Ok(result)
    }
}

/// Reads translation and romanization out of the nested-array body.
fn parse_response(body: &str) -> Result<LineTranslation, TranslateError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| TranslateError::parse(SERVICE, format!("invalid JSON: {}", e)))?;

    let segment = json
        .get(0)
        .and_then(|segments| segments.get(0))
        .ok_or_else(|| TranslateError::parse(SERVICE, "missing first segment"))?;

    let translation = segment
        .get(0)
        .and_then(Value::as_str)
        .ok_or_else(|| TranslateError::parse(SERVICE, "missing translated sentence"))?
        .to_string();

    let romanization = segment
        .get(3)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(LineTranslation {
        translation,
        romanization,
    })
}
