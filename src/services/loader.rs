//! Offset/limit pagination state machine
//!
//! Each feed (a day column, a log list) owns one `PageLoader`. Fetches run
//! on background threads; every ticket captures the offset it was issued
//! for, and a result whose captured offset no longer matches the loader's
//! current offset is rejected as stale. Reloads reset the offset on the
//! event-loop thread only, so resets are serialized and the offset check
//! stands in for cancellation.

/// Loader lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// No fetch in flight; triggers start one
    Idle,
    /// One fetch outstanding; further triggers are suppressed
    Fetching,
    /// A short page arrived; triggers are no-ops until reset
    Exhausted,
}

/// Parameters captured when a fetch is started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub offset: usize,
    pub limit: usize,
}

/// Outcome of handing a finished fetch back to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Page accepted; append its items at this offset
    Append { at: usize },
    /// Result was computed against an outdated offset; discard it
    Stale,
}

/// Pagination cursor for one feed
#[derive(Debug, Clone)]
pub struct PageLoader {
    state: LoaderState,
    offset: usize,
    limit: usize,
}

impl PageLoader {
    pub fn new(limit: usize) -> Self {
        Self {
            state: LoaderState::Idle,
            offset: 0,
            limit,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_fetching(&self) -> bool {
        self.state == LoaderState::Fetching
    }

    pub fn reached_end(&self) -> bool {
        self.state == LoaderState::Exhausted
    }

    /// Start a fetch if the loader is idle. Returns the ticket the fetch
    /// task must carry back with its result.
    pub fn request(&mut self) -> Option<FetchTicket> {
        if self.state != LoaderState::Idle {
            return None;
        }
        self.state = LoaderState::Fetching;
        Some(FetchTicket {
            offset: self.offset,
            limit: self.limit,
        })
    }

    /// Reset to the beginning. Valid while a fetch is in flight; the
    /// in-flight result will fail the offset check on arrival.
    pub fn reset(&mut self) {
        self.state = LoaderState::Idle;
        self.offset = 0;
    }

    /// Deliver a successful page of `page_len` items fetched under
    /// `ticket_offset`. A short page exhausts the feed.
    pub fn accept_page(&mut self, ticket_offset: usize, page_len: usize) -> Delivery {
        if ticket_offset != self.offset {
            return Delivery::Stale;
        }
        let at = self.offset;
        self.offset += page_len;
        self.state = if page_len < self.limit {
            LoaderState::Exhausted
        } else {
            LoaderState::Idle
        };
        Delivery::Append { at }
    }

    /// Deliver a failed fetch. A current failure returns the loader to
    /// `Idle` so the next trigger retries; it never exhausts the feed.
    /// Stale failures leave the loader untouched and return false.
    pub fn fetch_failed(&mut self, ticket_offset: usize) -> bool {
        if ticket_offset != self.offset {
            return false;
        }
        if self.state == LoaderState::Fetching {
            self.state = LoaderState::Idle;
        }
        true
    }
}
