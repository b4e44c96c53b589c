//! The display surface the catalog drives.
//!
//! # Design
//! Rendering is owned by the host (DOM, terminal, C UI). The catalog only
//! calls the methods below. Every method takes `&self` because the detail
//! fan-out may report failures from several in-flight requests; hosts keep
//! their own interior mutability.

use crate::types::Record;

/// Category of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    Loading,
    Error,
    Info,
}

impl FeedbackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackKind::Loading => "loading",
            FeedbackKind::Error => "error",
            FeedbackKind::Info => "info",
        }
    }
}

/// Receives status messages. Split from `Renderer` so the API client can
/// report failures without access to the rest of the display.
pub trait FeedbackSink {
    fn show_feedback(&self, message: &str, kind: FeedbackKind);
}

pub trait Renderer: FeedbackSink {
    fn show_record_list(&self, records: &[Record]);

    fn show_single_record(&self, record: &Record);

    fn set_pagination_controls_visible(&self, visible: bool);

    fn set_page_indicator(&self, page: u32, total_pages: u32);

    fn set_nav_buttons_enabled(&self, prev_enabled: bool, next_enabled: bool);
}

impl<S: FeedbackSink> FeedbackSink for &S {
    fn show_feedback(&self, message: &str, kind: FeedbackKind) {
        (**self).show_feedback(message, kind)
    }
}

impl<R: Renderer> Renderer for &R {
    fn show_record_list(&self, records: &[Record]) {
        (**self).show_record_list(records)
    }

    fn show_single_record(&self, record: &Record) {
        (**self).show_single_record(record)
    }

    fn set_pagination_controls_visible(&self, visible: bool) {
        (**self).set_pagination_controls_visible(visible)
    }

    fn set_page_indicator(&self, page: u32, total_pages: u32) {
        (**self).set_page_indicator(page, total_pages)
    }

    fn set_nav_buttons_enabled(&self, prev_enabled: bool, next_enabled: bool) {
        (**self).set_nav_buttons_enabled(prev_enabled, next_enabled)
    }
}
