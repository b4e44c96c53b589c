//! In-memory transport and renderer doubles for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use tokio::sync::Notify;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::render::{FeedbackKind, FeedbackSink, Renderer};
use crate::types::Record;

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
    fail: bool,
    gate: Option<Rc<Notify>>,
}

/// Canned responses keyed by exact URL. Unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct StubTransport {
    routes: RefCell<HashMap<String, Route>>,
    log: RefCell<Vec<String>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: &str) {
        self.routes.borrow_mut().insert(
            url.to_string(),
            Route {
                status,
                body: body.to_string(),
                fail: false,
                gate: None,
            },
        );
    }

    pub(crate) fn fail(&self, url: &str) {
        self.routes.borrow_mut().insert(
            url.to_string(),
            Route {
                status: 0,
                body: String::new(),
                fail: true,
                gate: None,
            },
        );
    }

    /// Like `respond`, but the response is held back until the returned
    /// `Notify` fires.
    pub(crate) fn respond_gated(&self, url: &str, status: u16, body: &str) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.routes.borrow_mut().insert(
            url.to_string(),
            Route {
                status,
                body: body.to_string(),
                fail: false,
                gate: Some(gate.clone()),
            },
        );
        gate
    }

    /// URLs in the order they were issued.
    pub(crate) fn requested(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Transport for StubTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> {
        self.log.borrow_mut().push(request.url.clone());
        let route = self.routes.borrow().get(&request.url).cloned();
        async move {
            let Some(route) = route else {
                return Ok(HttpResponse {
                    status: 404,
                    headers: Vec::new(),
                    body: "Not Found".to_string(),
                });
            };
            if let Some(gate) = &route.gate {
                gate.notified().await;
            }
            if route.fail {
                return Err(TransportError::new(request.url, "connection refused"));
            }
            Ok(HttpResponse {
                status: route.status,
                headers: Vec::new(),
                body: route.body,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Feedback(String, FeedbackKind),
    List(Vec<u32>),
    Single(u32),
    ControlsVisible(bool),
    PageIndicator(u32, u32),
    NavButtons(bool, bool),
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    events: RefCell<Vec<Event>>,
}

impl RecordingRenderer {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub(crate) fn feedback(&self) -> Vec<(String, FeedbackKind)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Feedback(message, kind) => Some((message.clone(), *kind)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.feedback()
            .into_iter()
            .filter(|(_, kind)| *kind == FeedbackKind::Error)
            .map(|(message, _)| message)
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl FeedbackSink for RecordingRenderer {
    fn show_feedback(&self, message: &str, kind: FeedbackKind) {
        self.push(Event::Feedback(message.to_string(), kind));
    }
}

impl Renderer for RecordingRenderer {
    fn show_record_list(&self, records: &[Record]) {
        self.push(Event::List(records.iter().map(|r| r.id).collect()));
    }

    fn show_single_record(&self, record: &Record) {
        self.push(Event::Single(record.id));
    }

    fn set_pagination_controls_visible(&self, visible: bool) {
        self.push(Event::ControlsVisible(visible));
    }

    fn set_page_indicator(&self, page: u32, total_pages: u32) {
        self.push(Event::PageIndicator(page, total_pages));
    }

    fn set_nav_buttons_enabled(&self, prev_enabled: bool, next_enabled: bool) {
        self.push(Event::NavButtons(prev_enabled, next_enabled));
    }
}

pub(crate) fn record_body(id: u32, name: &str) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "types": [{"slot": 1, "type": {"name": "grass", "url": ""}}],
        "abilities": [{"ability": {"name": "overgrow", "url": ""}, "is_hidden": false, "slot": 1}],
        "sprites": {"front_default": format!("https://img/{id}.png")}
    })
    .to_string()
}

pub(crate) fn list_body(count: u32, references: &[String]) -> String {
    let results: Vec<_> = references
        .iter()
        .enumerate()
        .map(|(i, url)| serde_json::json!({"name": format!("creature-{i}"), "url": url}))
        .collect();
    serde_json::json!({"count": count, "next": null, "previous": null, "results": results})
        .to_string()
}
