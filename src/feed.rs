//! Remote list fetch-and-render lifecycle.
//!
//! `ListFeed` owns the records, the load phase and the ticket of the one
//! outstanding request. Paging behaviour lives in a [`PagingStrategy`]:
//!
//! - [`PageNumbers`]: offset/limit pages, each page REPLACES the records
//! - [`NextPointer`]: follows the server's `next` URL, each page is APPENDED
//!
//! The feed performs no I/O. Callers turn the returned [`ListRequest`] into a
//! fetch command and hand the result back through [`ListFeed::settle`].

use std::sync::Arc;

use crate::catalog::{self, Endpoints};
use crate::error::FetchError;
use crate::types::{ListPage, SummaryRecord, Ticket};

/// Exactly one of these is observable per view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
    Failed(FetchError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Accumulate {
    Replace,
    Append,
}

/// Request the caller must execute for the feed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    pub ticket: Ticket,
    pub url: String,
}

pub trait PagingStrategy {
    const ACCUMULATE: Accumulate;

    /// URL for the current cursor, `None` when nothing is left to fetch
    fn request_url(&self, endpoints: &Endpoints) -> Option<String>;

    /// Advance the cursor after a successful page
    fn absorb(&mut self, page: &ListPage);

    /// Reposition the cursor before a manual retry
    fn rewind_for_retry(&mut self, endpoints: &Endpoints);
}

// ===============================
// Strategies
// ===============================

/// 1-based page selector over offset/limit pagination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageNumbers {
    page: u32,
    page_size: u32,
    total_pages: u32,
    total_count: u64,
}

impl PageNumbers {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_pages: 1,
            total_count: 0,
        }
    }

    pub fn offset(&self) -> u64 {
        catalog::page_offset(self.page, self.page_size)
    }
}

impl PagingStrategy for PageNumbers {
    const ACCUMULATE: Accumulate = Accumulate::Replace;

    fn request_url(&self, endpoints: &Endpoints) -> Option<String> {
        Some(endpoints.list_url(self.page_size, self.offset()))
    }

    fn absorb(&mut self, page: &ListPage) {
        self.total_count = page.count;
        self.total_pages = catalog::total_pages(page.count, self.page_size);
    }

    fn rewind_for_retry(&mut self, _endpoints: &Endpoints) {
        self.page = 1;
    }
}

/// Cursor over server-supplied `next` pointers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextPointer {
    next: Option<String>,
    page_size: u32,
}

impl NextPointer {
    pub fn new(endpoints: &Endpoints, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            next: Some(endpoints.first_page_url(page_size)),
            page_size,
        }
    }

    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

impl PagingStrategy for NextPointer {
    const ACCUMULATE: Accumulate = Accumulate::Append;

    fn request_url(&self, _endpoints: &Endpoints) -> Option<String> {
        self.next.clone()
    }

    fn absorb(&mut self, page: &ListPage) {
        self.next = page.next.clone();
    }

    fn rewind_for_retry(&mut self, endpoints: &Endpoints) {
        if self.next.is_none() {
            self.next = Some(endpoints.first_page_url(self.page_size));
        }
    }
}

// ===============================
// Feed
// ===============================

pub struct ListFeed<S: PagingStrategy> {
    endpoints: Arc<Endpoints>,
    strategy: S,
    records: Vec<SummaryRecord>,
    phase: Phase,
    pending: Option<Ticket>,
}

pub type PagedFeed = ListFeed<PageNumbers>;
pub type IncrementalFeed = ListFeed<NextPointer>;

impl<S: PagingStrategy> ListFeed<S> {
    /// New feed in the `Loading` phase with nothing outstanding yet.
    /// Call [`ListFeed::mount`] to obtain the first request.
    pub fn new(endpoints: Arc<Endpoints>, strategy: S) -> Self {
        Self {
            endpoints,
            strategy,
            records: Vec::new(),
            phase: Phase::Loading,
            pending: None,
        }
    }

    /// First fetch of a freshly mounted view
    pub fn mount(&mut self) -> Option<ListRequest> {
        self.begin()
    }

    /// Enter `Loading` and issue a request for the current cursor.
    /// Returns `None` (and leaves the phase alone) when the cursor is exhausted.
    fn begin(&mut self) -> Option<ListRequest> {
        let url = self.strategy.request_url(&self.endpoints)?;
        let ticket = Ticket::issue();
        self.pending = Some(ticket);
        self.phase = Phase::Loading;
        log::debug!("[feed] begin ticket={} url={url}", ticket.value());
        Some(ListRequest { ticket, url })
    }

    /// Apply the outcome of a request. Returns `false` for stale tickets,
    /// which leave the feed untouched.
    pub fn settle(&mut self, ticket: Ticket, result: Result<ListPage, FetchError>) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("[feed] dropping stale ticket={}", ticket.value());
            return false;
        }
        self.pending = None;
        match result {
            Ok(page) => {
                let fresh = catalog::summarize(&page, &self.endpoints);
                match S::ACCUMULATE {
                    Accumulate::Replace => self.records = fresh,
                    Accumulate::Append => self.records.extend(fresh),
                }
                self.strategy.absorb(&page);
                self.phase = Phase::Loaded;
            }
            Err(e) => {
                log::warn!("[feed] fetch failed kind={} msg={}", e.kind(), e);
                self.phase = Phase::Failed(e);
            }
        }
        true
    }

    /// Manual retry; only honoured while failed
    pub fn retry(&mut self) -> Option<ListRequest> {
        if !matches!(self.phase, Phase::Failed(_)) {
            return None;
        }
        self.strategy.rewind_for_retry(&self.endpoints);
        self.begin()
    }

    pub fn records(&self) -> &[SummaryRecord] {
        &self.records
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.phase {
            Phase::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl ListFeed<PageNumbers> {
    pub fn paged(endpoints: Arc<Endpoints>, page_size: u32) -> Self {
        Self::new(endpoints, PageNumbers::new(page_size))
    }

    pub fn page(&self) -> u32 {
        self.strategy.page
    }

    pub fn page_size(&self) -> u32 {
        self.strategy.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.strategy.total_pages
    }

    pub fn total_count(&self) -> u64 {
        self.strategy.total_count
    }

    /// Jump to `page`, clamped to the known range. Selecting the current
    /// page issues nothing.
    pub fn goto_page(&mut self, page: u32) -> Option<ListRequest> {
        let last = self.strategy.total_pages.max(1);
        let target = page.clamp(1, last);
        if target == self.strategy.page {
            return None;
        }
        self.strategy.page = target;
        self.begin()
    }

    pub fn next_page(&mut self) -> Option<ListRequest> {
        self.goto_page(self.strategy.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<ListRequest> {
        self.goto_page(self.strategy.page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> Option<ListRequest> {
        self.goto_page(1)
    }

    pub fn last_page(&mut self) -> Option<ListRequest> {
        self.goto_page(self.strategy.total_pages)
    }

    /// Page selector is drawn only when idle and there is more than one page
    pub fn shows_pager(&self) -> bool {
        !self.is_loading() && self.strategy.total_pages > 1
    }

    pub fn shows_empty_notice(&self) -> bool {
        !self.is_loading() && self.strategy.total_pages <= 1 && self.strategy.total_count == 0
    }
}

impl ListFeed<NextPointer> {
    pub fn incremental(endpoints: Arc<Endpoints>, page_size: u32) -> Self {
        let strategy = NextPointer::new(&endpoints, page_size);
        Self::new(endpoints, strategy)
    }

    /// Fetch the page behind the current pointer. No-op when the pointer is
    /// gone or a request is already outstanding.
    pub fn load_more(&mut self) -> Option<ListRequest> {
        if self.pending.is_some() {
            return None;
        }
        self.begin()
    }

    /// No pointer left: the server said there is nothing more
    pub fn is_exhausted(&self) -> bool {
        self.strategy.next.is_none()
    }

    pub fn shows_load_more(&self) -> bool {
        !self.is_loading() && !self.is_exhausted()
    }

    pub fn shows_end_marker(&self) -> bool {
        !self.is_loading() && self.is_exhausted() && !self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NamedResource;

    fn endpoints() -> Arc<Endpoints> {
        Arc::new(Endpoints::new("https://api.test/v2", "https://img.test"))
    }

    fn page(count: u64, ids: std::ops::Range<u32>, next: Option<&str>) -> ListPage {
        ListPage {
            count,
            next: next.map(str::to_string),
            previous: None,
            results: ids
                .map(|i| NamedResource {
                    name: format!("mon-{i}"),
                    url: format!("https://api.test/v2/pokemon/{i}/"),
                })
                .collect(),
        }
    }

    fn ids(recs: &[SummaryRecord]) -> Vec<u32> {
        recs.iter().filter_map(|r| r.id).collect()
    }

    #[test]
    fn test_paged_mount_requests_first_offset() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        assert!(feed.is_loading());
        let req = feed.mount().unwrap();
        assert_eq!(req.url, "https://api.test/v2/pokemon?limit=20&offset=0");
        assert_eq!(feed.pending(), Some(req.ticket));
    }

    #[test]
    fn test_paged_replaces_records_and_counts_pages() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        assert!(feed.settle(req.ticket, Ok(page(45, 1..21, Some("n")))));
        assert_eq!(feed.total_pages(), 3);
        assert_eq!(feed.total_count(), 45);
        assert_eq!(feed.records().len(), 20);

        let req = feed.goto_page(3).unwrap();
        assert_eq!(req.url, "https://api.test/v2/pokemon?limit=20&offset=40");
        assert!(feed.is_loading());
        feed.settle(req.ticket, Ok(page(45, 41..46, None)));
        assert_eq!(ids(feed.records()), vec![41, 42, 43, 44, 45]);
        assert_eq!(feed.page(), 3);
    }

    #[test]
    fn test_paged_offset_for_every_page() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(1302, 1..21, None)));
        for p in 2..=66u32 {
            let req = feed.goto_page(p).unwrap();
            assert!(req.url.ends_with(&format!("offset={}", (p - 1) * 20)));
            feed.settle(req.ticket, Ok(page(1302, 1..2, None)));
        }
    }

    #[test]
    fn test_paged_same_page_is_noop_and_clamps() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(60, 1..21, None)));
        assert!(feed.goto_page(1).is_none());
        assert!(feed.prev_page().is_none());
        let req = feed.last_page().unwrap();
        assert!(req.url.ends_with("offset=40"));
        feed.settle(req.ticket, Ok(page(60, 41..61, None)));
        assert!(feed.next_page().is_none());
        assert!(feed.goto_page(99).is_none());
    }

    #[test]
    fn test_paged_failure_keeps_last_records() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(60, 1..21, None)));
        let req = feed.next_page().unwrap();
        feed.settle(req.ticket, Err(FetchError::Status(500)));
        assert_eq!(feed.error(), Some(&FetchError::Status(500)));
        assert_eq!(ids(feed.records()), (1..21).collect::<Vec<_>>());
        assert_eq!(feed.total_pages(), 3);
    }

    #[test]
    fn test_paged_retry_goes_to_first_page() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(60, 1..21, None)));
        let req = feed.goto_page(3).unwrap();
        feed.settle(req.ticket, Err(FetchError::Network("reset".into())));
        let req = feed.retry().unwrap();
        assert_eq!(feed.page(), 1);
        assert!(req.url.ends_with("offset=0"));
    }

    #[test]
    fn test_paged_retry_on_first_page_still_refetches() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Err(FetchError::Status(502)));
        assert!(feed.shows_empty_notice());
        assert!(feed.retry().is_some());
        assert!(feed.is_loading());
    }

    #[test]
    fn test_retry_ignored_unless_failed() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        assert!(feed.retry().is_none());
        feed.settle(req.ticket, Ok(page(20, 1..21, None)));
        assert!(feed.retry().is_none());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let first = feed.mount().unwrap();
        feed.settle(first.ticket, Ok(page(60, 1..21, None)));
        let second = feed.next_page().unwrap();
        assert!(!feed.settle(first.ticket, Ok(page(60, 99..100, None))));
        assert!(feed.is_loading());
        assert!(feed.settle(second.ticket, Ok(page(60, 21..41, None))));
        assert_eq!(ids(feed.records())[0], 21);
    }

    #[test]
    fn test_pager_visibility() {
        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        assert!(!feed.shows_pager());
        feed.settle(req.ticket, Ok(page(20, 1..21, None)));
        assert!(!feed.shows_pager());
        assert!(!feed.shows_empty_notice());

        let mut feed = PagedFeed::paged(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(0, 0..0, None)));
        assert!(feed.shows_empty_notice());
        assert_eq!(feed.total_pages(), 0);
    }

    #[test]
    fn test_incremental_appends_in_order() {
        let mut feed = IncrementalFeed::incremental(endpoints(), 20);
        let req = feed.mount().unwrap();
        assert_eq!(req.url, "https://api.test/v2/pokemon?limit=20&offset=0");
        feed.settle(req.ticket, Ok(page(6, 1..3, Some("https://api.test/v2/pokemon?offset=2&limit=2"))));
        let req = feed.load_more().unwrap();
        assert_eq!(req.url, "https://api.test/v2/pokemon?offset=2&limit=2");
        feed.settle(req.ticket, Ok(page(6, 3..5, Some("https://api.test/v2/pokemon?offset=4&limit=2"))));
        let req = feed.load_more().unwrap();
        feed.settle(req.ticket, Ok(page(6, 5..7, None)));
        assert_eq!(ids(feed.records()), vec![1, 2, 3, 4, 5, 6]);
        assert!(feed.shows_end_marker());
        assert!(!feed.shows_load_more());
    }

    #[test]
    fn test_incremental_terminal_after_null_pointer() {
        let mut feed = IncrementalFeed::incremental(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(2, 1..3, None)));
        assert!(feed.is_exhausted());
        assert!(feed.load_more().is_none());
        assert!(feed.retry().is_none());
        assert_eq!(feed.phase(), &Phase::Loaded);
    }

    #[test]
    fn test_incremental_load_more_while_loading_is_noop() {
        let mut feed = IncrementalFeed::incremental(endpoints(), 20);
        let _req = feed.mount().unwrap();
        assert!(feed.load_more().is_none());
    }

    #[test]
    fn test_incremental_failure_keeps_pointer() {
        let mut feed = IncrementalFeed::incremental(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(4, 1..3, Some("https://api.test/next"))));
        let req = feed.load_more().unwrap();
        feed.settle(req.ticket, Err(FetchError::Status(429)));
        assert_eq!(feed.strategy().next_url(), Some("https://api.test/next"));
        let req = feed.retry().unwrap();
        assert_eq!(req.url, "https://api.test/next");
        assert_eq!(ids(feed.records()), vec![1, 2]);
    }

    #[test]
    fn test_incremental_retry_resets_missing_pointer() {
        let mut feed = IncrementalFeed::incremental(endpoints(), 20);
        feed.strategy.next = None;
        feed.phase = Phase::Failed(FetchError::Network("down".into()));
        let req = feed.retry().unwrap();
        assert_eq!(req.url, "https://api.test/v2/pokemon?limit=20&offset=0");
    }

    #[test]
    fn test_end_marker_needs_records() {
        let mut feed = IncrementalFeed::incremental(endpoints(), 20);
        let req = feed.mount().unwrap();
        feed.settle(req.ticket, Ok(page(0, 0..0, None)));
        assert!(feed.is_exhausted());
        assert!(!feed.shows_end_marker());
    }
}
