//! Error types for the outbound translation calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single outbound translation call.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The request never completed (connection, TLS, body read).
    #[error("failed to reach {service}: {source}")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The chat-completion body carried an `error` field.
    #[error("chat completion API reported an error: {0}")]
    Api(String),

    /// The response did not have the expected shape.
    #[error("unexpected response from {service}: {reason}")]
    Parse {
        service: &'static str,
        reason: String,
    },
}

impl TranslateError {
    pub fn network(service: &'static str, source: reqwest::Error) -> Self {
        Self::Network { service, source }
    }

    pub fn parse(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Parse {
            service,
            reason: reason.into(),
        }
    }
}
