//! Pagination and fetch orchestration for a creature catalog backed by a
//! paginated REST API.
//!
//! # Overview
//! `CatalogClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). The host
//! provides a `Transport` to execute requests and a `Renderer` to display
//! results; `Catalog` sequences the two.
//!
//! # Design
//! - `CatalogClient` is stateless; it holds only `base_url`.
//! - `ApiClient` folds every failure into `None` plus a feedback event.
//! - `PaginationState` is a `Copy` value threaded through each call.
//! - `Catalog` fans detail fetches out concurrently and discards results of
//!   flows that a newer one has superseded.

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod render;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::ApiClient;
pub use catalog::{Catalog, Outcome, PageLoad, SearchOutcome};
pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use pagination::PaginationState;
pub use render::{FeedbackKind, FeedbackSink, Renderer};
pub use types::{ListItem, ListPage, Record};
