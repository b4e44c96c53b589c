//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `CatalogClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; the host supplies a `Transport` that performs the round-trip.
//! The catalog only ever issues GETs, so there is no method or body field.
//!
//! All fields use owned types so values can cross FFI boundaries without
//! lifetime concerns.

use std::future::Future;

use crate::error::TransportError;

/// An HTTP GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Any status code counts as a completed round-trip; interpreting the status
/// is the job of `CatalogClient::parse_*`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes `HttpRequest`s on behalf of the core.
///
/// Implementations must return `Ok` for every response the server produced,
/// including 4xx/5xx, and reserve `Err` for round-trips that never completed.
/// The catalog runs on a single event-loop thread, so the returned future is
/// not required to be `Send`.
pub trait Transport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>>;
}

impl<T: Transport> Transport for &T {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> {
        (**self).execute(request)
    }
}
