//! Configuration module for the translation relay.
//!
//! Handles loading configuration from environment variables and .env files.
//! The resulting [`Config`] is built once at start-up and handed to the
//! translator and the server; nothing reads the environment mid-request.

use anyhow::{Context, Result};
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Chat model used when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Base URL of the chat-completion API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Public Google Translate endpoint used by the fallback path.
pub const DEFAULT_GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

const DEFAULT_PORT: u16 = 3000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completion service.
    /// When absent the relay goes straight to Google Translate.
    pub openai_api_key: Option<String>,

    /// Chat model identifier sent with every completion request.
    pub openai_model: String,

    /// Base URL of the chat-completion API (`/chat/completions` is appended).
    pub openai_base_url: String,

    /// URL of the public translation endpoint.
    pub google_translate_url: String,

    /// Address the HTTP server binds to.
    pub host: Ipv4Addr,

    /// Port the HTTP server listens on.
    pub port: u16,

    /// Directory of static assets served at `/`.
    pub public_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_KEY`: enables the chat-completion path
    /// - `OPENAI_MODEL`: chat model (default: gpt-4o-mini)
    /// - `OPENAI_BASE_URL`: chat API base (default: https://api.openai.com/v1)
    /// - `GOOGLE_TRANSLATE_URL`: fallback endpoint
    /// - `HOST`: bind address (default: 0.0.0.0)
    /// - `PORT`: listen port (default: 3000)
    /// - `PUBLIC_DIR`: static asset directory (default: public)
    pub fn load() -> Result<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host: Ipv4Addr = get("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .context("HOST must be a valid IPv4 address")?;

        let port: u16 = match get("PORT") {
            Some(port) => port.parse().context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            google_translate_url: get("GOOGLE_TRANSLATE_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_TRANSLATE_URL.to_string()),
            host,
            port,
            public_dir: PathBuf::from(get("PUBLIC_DIR").unwrap_or_else(|| "public".to_string())),
        })
    }

    /// Whether the chat-completion path is enabled.
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.is_some()
    }
}
