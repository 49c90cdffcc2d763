//! Backend HTTP API: wire types and the request client.

mod client;
mod types;

pub use client::BackendClient;
pub use types::{
    EngineEntry, IdEntry, ModePreset, ModeSettings, ModelsPayload, ModesUpdate, NamedEntry,
    PromptOverride, RemoteConfig, SaveOutcome, SavedModel, TranslateResponse,
};

use thiserror::Error;

/// Failures surfaced by backend calls.
///
/// `Network` covers unreachable servers and malformed bodies; `Backend` is a
/// well-formed response that reports failure. Both are rendered as static
/// user-facing strings at the call site and never propagate further.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Backend(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl ApiError {
    /// Backend-reported message, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend(msg) => Some(msg),
            ApiError::Network(_) => None,
        }
    }
}
