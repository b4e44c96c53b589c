//! Offset/page bookkeeping.
//!
//! `PaginationState` is a `Copy` value: navigation produces a new state and
//! the caller decides whether to keep it. `offset == (page - 1) * page_size`
//! holds for every state built through these methods.

/// Position within the paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub offset: u32,
    /// 1-based.
    pub page: u32,
    /// Server-side record count; 0 until the first successful list fetch.
    pub total: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            offset: 0,
            page: 1,
            total: 0,
        }
    }
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_advance(&self, page_size: u32) -> bool {
        self.offset.saturating_add(page_size) < self.total
    }

    pub fn can_retreat(&self) -> bool {
        self.offset > 0
    }

    /// Next page, or `self` unchanged when already on the last page.
    pub fn advance(self, page_size: u32) -> Self {
        if !self.can_advance(page_size) {
            return self;
        }
        Self {
            offset: self.offset + page_size,
            page: self.page + 1,
            ..self
        }
    }

    /// Previous page, or `self` unchanged when already on the first page.
    pub fn retreat(self, page_size: u32) -> Self {
        if !self.can_retreat() {
            return self;
        }
        Self {
            offset: self.offset.saturating_sub(page_size),
            page: self.page.saturating_sub(1).max(1),
            ..self
        }
    }

    /// Back to the first page. The known total survives.
    pub fn reset(self) -> Self {
        Self {
            offset: 0,
            page: 1,
            ..self
        }
    }

    /// Adopt `count` as the total if none is known yet. Once set, the total
    /// is frozen for the lifetime of the state, even if the server later
    /// reports a different count.
    pub fn record_total(self, count: u32) -> Self {
        if self.total != 0 {
            return self;
        }
        Self { total: count, ..self }
    }

    /// Number of pages, never less than 1 so the indicator reads "1 of 1"
    /// before anything is known.
    pub fn page_count(&self, page_size: u32) -> u32 {
        if page_size == 0 {
            return 1;
        }
        self.total.div_ceil(page_size).max(1)
    }

    pub fn controls_visible(&self, page_size: u32, has_active_search_term: bool) -> bool {
        let pages = self.page_count(page_size);
        pages > 1 || (pages == 1 && self.page == 1 && !has_active_search_term)
    }
}
