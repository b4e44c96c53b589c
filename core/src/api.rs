//! Network-facing half of the client: executes requests through a
//! `Transport` and folds every outcome into `Option`.
//!
//! # Design
//! Callers see exactly two outcomes, a value or `None`. A 404 is an expected
//! miss and stays silent. Anything else (transport failure, unexpected
//! status, undecodable body) is logged and reported once through the
//! `FeedbackSink` before `None` is returned.

use tracing::{debug, warn};

use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::render::{FeedbackKind, FeedbackSink};
use crate::types::{ListPage, Record};

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to load data. Check your connection or try again later.";

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    client: CatalogClient,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(client: CatalogClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub async fn fetch_list_page(
        &self,
        limit: u32,
        offset: u32,
        feedback: &impl FeedbackSink,
    ) -> Option<ListPage> {
        let request = self.client.build_list_page(limit, offset);
        self.fetch(request, feedback, |r| self.client.parse_list_page(r)).await
    }

    pub async fn fetch_record_by_key(&self, key: &str, feedback: &impl FeedbackSink) -> Option<Record> {
        let request = self.client.build_record_by_key(key);
        self.fetch(request, feedback, |r| self.client.parse_record(r)).await
    }

    pub async fn fetch_record_by_reference(
        &self,
        detail_reference: &str,
        feedback: &impl FeedbackSink,
    ) -> Option<Record> {
        let request = self.client.build_record_by_reference(detail_reference);
        self.fetch(request, feedback, |r| self.client.parse_record(r)).await
    }

    async fn fetch<V>(
        &self,
        request: HttpRequest,
        feedback: &impl FeedbackSink,
        parse: impl FnOnce(HttpResponse) -> Result<V, ApiError>,
    ) -> Option<V> {
        let url = request.url.clone();
        debug!(%url, "GET");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "request failed");
                feedback.show_feedback(FETCH_FAILED_MESSAGE, FeedbackKind::Error);
                return None;
            }
        };

        match parse(response) {
            Ok(value) => Some(value),
            Err(ApiError::NotFound) => {
                debug!(%url, "not found");
                None
            }
            Err(err) => {
                warn!(%url, error = %err, "request failed");
                feedback.show_feedback(FETCH_FAILED_MESSAGE, FeedbackKind::Error);
                None
            }
        }
    }
}
