//! Stateless HTTP request builder and response parser for the creature API.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual round-trip, keeping this layer
//! deterministic and free of I/O.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ListPage, Record};

/// Synchronous, stateless client for the creature API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_page(&self, limit: u32, offset: u32) -> HttpRequest {
        get(format!("{}?limit={limit}&offset={offset}", self.base_url))
    }

    /// Lookup by name or numeric id. The key is trimmed and lower-cased so
    /// `" Pikachu "` and `"pikachu"` hit the same resource.
    pub fn build_record_by_key(&self, key: &str) -> HttpRequest {
        let key = normalize_key(key);
        get(format!("{}/{key}", self.base_url))
    }

    /// Resolve a `ListItem::detail_reference`, which is already absolute.
    pub fn build_record_by_reference(&self, detail_reference: &str) -> HttpRequest {
        get(detail_reference.to_string())
    }

    pub fn parse_list_page(&self, response: HttpResponse) -> Result<ListPage, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        url,
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
