//! Fetch orchestration: list page, detail fan-out, and the render flows
//! behind initial load, next/previous, and search.
//!
//! # Design
//! - Pagination state is a value passed in and handed back in `Outcome`;
//!   the catalog never holds the caller's position.
//! - Every flow takes a ticket from a generation counter. After each await,
//!   output for a ticket that is no longer the latest is dropped and the
//!   flow reports `Outcome::Superseded`, so the most recently started flow
//!   always owns the display.
//! - `Catalog` is `!Sync`; it lives on the host's single event-loop thread.

use std::cell::{Cell, RefCell};

use futures::future::join_all;
use tracing::debug;

use crate::api::ApiClient;
use crate::client::CatalogClient;
use crate::config::CatalogConfig;
use crate::error::ConfigError;
use crate::http::Transport;
use crate::pagination::PaginationState;
use crate::render::{FeedbackKind, FeedbackSink, Renderer};
use crate::types::Record;

pub const LOADING_MESSAGE: &str = "Loading creatures...";
pub const LIST_FAILED_MESSAGE: &str = "Could not load the creature list.";
pub const EMPTY_MESSAGE: &str = "No creatures found for these criteria.";
pub const NOT_FOUND_MESSAGE: &str = "Creature not found.";

/// Result of `Catalog::load_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    /// Input state, with the total recorded if this was the first load.
    pub state: PaginationState,
    /// Successfully resolved records in listing order.
    pub records: Vec<Record>,
    /// The list request itself failed; `records` is empty.
    pub list_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank term. The caller goes back to the first page of the listing.
    EmptyQuery,
    Found(Record),
    /// Not found, or the lookup failed.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The flow finished and rendered; this is the caller's new state.
    Settled(PaginationState),
    /// A newer flow started while this one was waiting; nothing was rendered
    /// after that point and the caller keeps its previous state.
    Superseded,
    /// Navigation was not possible from the given state. No request was made.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

/// Forwards feedback only while its ticket is current.
struct Gated<'a, R> {
    renderer: &'a R,
    generation: &'a Cell<u64>,
    ticket: Ticket,
}

impl<R: FeedbackSink> FeedbackSink for Gated<'_, R> {
    fn show_feedback(&self, message: &str, kind: FeedbackKind) {
        if self.generation.get() == self.ticket.0 {
            self.renderer.show_feedback(message, kind);
        } else {
            debug!(ticket = self.ticket.0, "dropping feedback from superseded request");
        }
    }
}

pub struct Catalog<T, R> {
    config: CatalogConfig,
    api: ApiClient<T>,
    renderer: R,
    generation: Cell<u64>,
    last_rendered: RefCell<Vec<Record>>,
}

impl<T: Transport, R: Renderer> Catalog<T, R> {
    pub fn new(config: CatalogConfig, transport: T, renderer: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let api = ApiClient::new(CatalogClient::new(&config.base_url), transport);
        Ok(Self {
            config,
            api,
            renderer,
            generation: Cell::new(0),
            last_rendered: RefCell::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Looks up a record from the most recent render, e.g. when a card is
    /// selected.
    pub fn record_by_id(&self, id: u32) -> Option<Record> {
        self.last_rendered.borrow().iter().find(|r| r.id == id).cloned()
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    /// Fetch the page at `state.offset` and resolve every item concurrently.
    ///
    /// Detail fetches that fail are dropped; the rest keep listing order.
    /// A failed list fetch reports an error, hides the pagination controls
    /// and yields no records.
    pub async fn load_page(&self, state: PaginationState) -> PageLoad {
        let ticket = self.begin();
        self.load_page_for(ticket, state).await
    }

    /// Look up a single record by name or id. The host resets to the first
    /// page and reloads on `SearchOutcome::EmptyQuery`; `submit_search` does
    /// this already.
    pub async fn search(&self, term: &str) -> SearchOutcome {
        let ticket = self.begin();
        self.search_for(ticket, term).await
    }

    // -----------------------------------------------------------------------
    // Render flows
    // -----------------------------------------------------------------------

    /// First render of the listing.
    pub async fn initialize(&self) -> Outcome {
        self.show_page(PaginationState::new(), "").await
    }

    /// Load `state`'s page and render it together with the pagination
    /// controls.
    pub async fn show_page(&self, state: PaginationState, search_term: &str) -> Outcome {
        let ticket = self.begin();
        self.show_page_for(ticket, state, search_term).await
    }

    pub async fn next_page(&self, state: PaginationState) -> Outcome {
        let page_size = self.config.page_size;
        if !state.can_advance(page_size) {
            return Outcome::Ignored;
        }
        self.show_page(state.advance(page_size), "").await
    }

    pub async fn previous_page(&self, state: PaginationState) -> Outcome {
        if !state.can_retreat() {
            return Outcome::Ignored;
        }
        self.show_page(state.retreat(self.config.page_size), "").await
    }

    /// Search and render a single record. A blank term returns to the first
    /// page of the listing instead.
    pub async fn submit_search(&self, term: &str, state: PaginationState) -> Outcome {
        let ticket = self.begin();
        let found = match self.search_for(ticket, term).await {
            SearchOutcome::EmptyQuery => {
                return self.show_page_for(ticket, state.reset(), "").await;
            }
            SearchOutcome::Found(record) => Some(record),
            SearchOutcome::Missing => None,
        };

        let Some(renderer) = self.render_for(ticket) else {
            return Outcome::Superseded;
        };
        match found {
            Some(record) => {
                renderer.show_single_record(&record);
                self.last_rendered.replace(vec![record]);
            }
            None => {
                renderer.show_feedback(NOT_FOUND_MESSAGE, FeedbackKind::Info);
                self.last_rendered.replace(Vec::new());
            }
        }
        renderer.set_pagination_controls_visible(false);
        Outcome::Settled(state)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn begin(&self) -> Ticket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        Ticket(next)
    }

    fn render_for(&self, ticket: Ticket) -> Option<&R> {
        if self.generation.get() == ticket.0 {
            Some(&self.renderer)
        } else {
            debug!(ticket = ticket.0, latest = self.generation.get(), "superseded");
            None
        }
    }

    fn gate(&self, ticket: Ticket) -> Gated<'_, R> {
        Gated {
            renderer: &self.renderer,
            generation: &self.generation,
            ticket,
        }
    }

    async fn load_page_for(&self, ticket: Ticket, state: PaginationState) -> PageLoad {
        let feedback = self.gate(ticket);
        feedback.show_feedback(LOADING_MESSAGE, FeedbackKind::Loading);

        let page_size = self.config.page_size;
        let Some(page) = self.api.fetch_list_page(page_size, state.offset, &feedback).await else {
            feedback.show_feedback(LIST_FAILED_MESSAGE, FeedbackKind::Error);
            if let Some(renderer) = self.render_for(ticket) {
                renderer.set_pagination_controls_visible(false);
            }
            return PageLoad {
                state,
                records: Vec::new(),
                list_failed: true,
            };
        };

        let state = state.record_total(page.count);

        let details = page
            .results
            .iter()
            .map(|item| self.api.fetch_record_by_reference(&item.detail_reference, &feedback));
        let resolved = join_all(details).await;

        let requested = resolved.len();
        let records: Vec<Record> = resolved.into_iter().flatten().collect();
        if records.len() < requested {
            debug!(dropped = requested - records.len(), offset = state.offset, "dropped unresolved items");
        }

        PageLoad {
            state,
            records,
            list_failed: false,
        }
    }

    async fn search_for(&self, ticket: Ticket, term: &str) -> SearchOutcome {
        let term = term.trim();
        if term.is_empty() {
            return SearchOutcome::EmptyQuery;
        }

        let feedback = self.gate(ticket);
        feedback.show_feedback(&format!("Searching for \"{term}\"..."), FeedbackKind::Loading);
        match self.api.fetch_record_by_key(term, &feedback).await {
            Some(record) => SearchOutcome::Found(record),
            None => SearchOutcome::Missing,
        }
    }

    async fn show_page_for(&self, ticket: Ticket, state: PaginationState, search_term: &str) -> Outcome {
        let load = self.load_page_for(ticket, state).await;
        let Some(renderer) = self.render_for(ticket) else {
            return Outcome::Superseded;
        };
        if load.list_failed {
            self.last_rendered.replace(Vec::new());
            return Outcome::Settled(load.state);
        }

        if load.records.is_empty() {
            renderer.show_feedback(EMPTY_MESSAGE, FeedbackKind::Info);
        } else {
            renderer.show_record_list(&load.records);
        }
        self.last_rendered.replace(load.records);

        let state = load.state;
        let page_size = self.config.page_size;
        renderer.set_page_indicator(state.page, state.page_count(page_size));
        renderer.set_nav_buttons_enabled(state.can_retreat(), state.can_advance(page_size));
        // Whitespace-only input counts as no search term.
        renderer.set_pagination_controls_visible(
            state.controls_visible(page_size, !search_term.trim().is_empty()),
        );
        Outcome::Settled(state)
    }
}
