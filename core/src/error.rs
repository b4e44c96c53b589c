//! Error types for the creature catalog client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because a missing creature is an
//! expected outcome of a keyword lookup, while every other non-2xx response
//! is a failure worth surfacing. None of these escape the orchestrator: the
//! `ApiClient` folds them into `Option` plus a feedback event.

use thiserror::Error;

/// Errors returned by `CatalogClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested creature does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

/// Failure to complete an HTTP round-trip at all (DNS, connect, reset...).
#[derive(Debug, Error)]
#[error("transport failure for {url}: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Rejected `CatalogConfig` values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("page_size must be greater than zero")]
    ZeroPageSize,

    #[error("base_url must not be empty")]
    EmptyBaseUrl,
}
