//! Fetch failures surfaced to the views.
//!
//! Every failure renders as a single line of text next to a retry control.
//! The variants only exist so logs can tell a dropped connection from a bad
//! status or an unexpected payload.

use thiserror::Error;

pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure: DNS, connect, TLS, timeout, body read
    #[error("{0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Body was not the JSON shape we expected
    #[error("{0}")]
    Decode(String),

    /// Detail view mounted without an identifier
    #[error("Pokémon ID not found in URL.")]
    MissingId,
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Status(_) => "http-status",
            FetchError::Decode(_) => "decode",
            FetchError::MissingId => "missing-id",
        }
    }

    /// Text shown to the user. Never empty.
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            msg
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if e.is_timeout() {
            FetchError::Network("request timed out".to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}
