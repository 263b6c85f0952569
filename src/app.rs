use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use crate::catalog::Endpoints;
use crate::detail::{DetailFeed, DetailRequest};
use crate::feed::{IncrementalFeed, ListRequest, PagedFeed};
use crate::router::{self, Route};
use crate::theme::{ColorScheme, Theme};
use crate::types::{AppEvent, FetchCommand, FetchRequest, SummaryRecord, ViewSlot};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode { Normal, Goto }

/// The two list-browsing modes on the home screen
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListTab {
    Paged,
    Incremental,
}

impl ListTab {
    pub const ALL: [ListTab; 2] = [ListTab::Paged, ListTab::Incremental];

    pub fn label(self) -> &'static str {
        match self {
            ListTab::Paged => "Page Control",
            ListTab::Incremental => "Infinite Scroll",
        }
    }

    pub fn other(self) -> Self {
        match self {
            ListTab::Paged => ListTab::Incremental,
            ListTab::Incremental => ListTab::Paged,
        }
    }

    fn slot(self) -> ViewSlot {
        match self {
            ListTab::Paged => ViewSlot::PagedList,
            ListTab::Incremental => ViewSlot::IncrementalList,
        }
    }
}

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const MAX_LOG_ENTRIES: usize = 50;
const TOAST_DURATION: Duration = Duration::from_secs(2);

pub struct App {
    quit: bool,
    route: Route,
    tab: ListTab,

    // Only the mounted view holds a feed; everything else is None.
    paged: Option<PagedFeed>,
    incremental: Option<IncrementalFeed>,
    detail: Option<DetailFeed>,
    selected: usize,

    endpoints: Arc<Endpoints>,
    page_size: u32,
    fetch_tx: Option<UnboundedSender<FetchCommand>>,

    fps: u32,
    colors: ColorScheme,
    detail_scroll: u16,
    spinner_frame: usize,

    input_mode: InputMode,
    goto_input: String,

    toast_message: Option<(String, Instant)>,
    debug_log: Vec<String>,
    debug_visible: bool,
}

impl App {
    /// Build the app and mount `initial`. Fetch commands go to `fetch_tx`
    /// when present; without a sender the views stay in their first phase.
    pub fn new(
        endpoints: Endpoints,
        page_size: u32,
        fps: u32,
        theme: Theme,
        fetch_tx: Option<UnboundedSender<FetchCommand>>,
        initial: Route,
    ) -> Self {
        let mut app = Self {
            quit: false,
            route: initial,
            tab: ListTab::Paged,
            paged: None,
            incremental: None,
            detail: None,
            selected: 0,
            endpoints: Arc::new(endpoints),
            page_size,
            fetch_tx,
            fps,
            colors: theme.colors(),
            detail_scroll: 0,
            spinner_frame: 0,
            input_mode: InputMode::Normal,
            goto_input: String::new(),
            toast_message: None,
            debug_log: Vec::new(),
            debug_visible: false,
        };
        app.mount();
        app
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 { self.fps }
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn route(&self) -> &Route { &self.route }
    pub fn tab(&self) -> ListTab { self.tab }
    pub fn paged(&self) -> Option<&PagedFeed> { self.paged.as_ref() }
    pub fn incremental(&self) -> Option<&IncrementalFeed> { self.incremental.as_ref() }
    pub fn detail(&self) -> Option<&DetailFeed> { self.detail.as_ref() }
    pub fn selected(&self) -> usize { self.selected }
    pub fn theme(&self) -> &ColorScheme { &self.colors }
    pub fn detail_scroll(&self) -> u16 { self.detail_scroll }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn goto_input(&self) -> &str { &self.goto_input }
    pub fn debug_log(&self) -> &[String] { &self.debug_log }
    pub fn debug_visible(&self) -> bool { self.debug_visible }

    /// Records of the mounted list view (empty elsewhere)
    pub fn records(&self) -> &[SummaryRecord] {
        if let Some(feed) = &self.paged {
            feed.records()
        } else if let Some(feed) = &self.incremental {
            feed.records()
        } else {
            &[]
        }
    }

    pub fn selected_record(&self) -> Option<&SummaryRecord> {
        self.records().get(self.selected)
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    /// Current toast if still visible
    pub fn toast_message(&self) -> Option<&str> {
        self.toast_message.as_ref().and_then(|(msg, at)| {
            (at.elapsed() < TOAST_DURATION).then_some(msg.as_str())
        })
    }

    pub fn toggle_debug_panel(&mut self) {
        self.debug_visible = !self.debug_visible;
    }

    pub fn log_debug(&mut self, msg: String) {
        log::debug!("{msg}");
        let ts = chrono::Local::now().format("%H:%M:%S%.3f");
        self.debug_log.push(format!("[{ts}] {msg}"));
        if self.debug_log.len() > MAX_LOG_ENTRIES {
            let excess = self.debug_log.len() - MAX_LOG_ENTRIES;
            self.debug_log.drain(..excess);
        }
    }

    // ----- mounting -----

    /// Switch screens. Re-navigating to the current route does nothing.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        self.log_debug(format!("navigate {} -> {}", self.route, route));
        self.unmount();
        self.route = route;
        self.selected = 0;
        self.detail_scroll = 0;
        self.mount();
    }

    fn mount(&mut self) {
        match self.route.clone() {
            Route::List => self.mount_list(),
            Route::Detail { id } => {
                let mut feed = DetailFeed::new(id.as_deref());
                let req = feed.mount();
                self.detail = Some(feed);
                match req {
                    Some(req) => self.dispatch_detail(req),
                    None => self.log_debug("detail mounted without id".to_string()),
                }
            }
            Route::NotFound { path } => {
                log::info!("no route for {path}");
            }
        }
    }

    fn mount_list(&mut self) {
        let endpoints = Arc::clone(&self.endpoints);
        match self.tab {
            ListTab::Paged => {
                let mut feed = PagedFeed::paged(endpoints, self.page_size);
                let req = feed.mount();
                self.paged = Some(feed);
                self.dispatch_list(ViewSlot::PagedList, req);
            }
            ListTab::Incremental => {
                let mut feed = IncrementalFeed::incremental(endpoints, self.page_size);
                let req = feed.mount();
                self.incremental = Some(feed);
                self.dispatch_list(ViewSlot::IncrementalList, req);
            }
        }
    }

    /// Tear down every mounted view and abort its request
    fn unmount(&mut self) {
        if self.paged.take().is_some() {
            self.send(FetchCommand::Cancel(ViewSlot::PagedList));
        }
        if self.incremental.take().is_some() {
            self.send(FetchCommand::Cancel(ViewSlot::IncrementalList));
        }
        if self.detail.take().is_some() {
            self.send(FetchCommand::Cancel(ViewSlot::Detail));
        }
    }

    // ----- tabs -----
    pub fn select_tab(&mut self, tab: ListTab) {
        if self.route != Route::List || tab == self.tab {
            return;
        }
        self.log_debug(format!("tab {} -> {}", self.tab.label(), tab.label()));
        let was_mounted = match self.tab {
            ListTab::Paged => self.paged.take().is_some(),
            ListTab::Incremental => self.incremental.take().is_some(),
        };
        if was_mounted {
            self.send(FetchCommand::Cancel(self.tab.slot()));
        }
        self.tab = tab;
        self.selected = 0;
        self.mount_list();
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.tab.other());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.tab.other());
    }

    // ----- selection -----
    pub fn up(&mut self) {
        if matches!(self.route, Route::Detail { .. }) {
            self.detail_scroll = self.detail_scroll.saturating_sub(1);
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the list selection, or scrolls the detail screen
    pub fn down(&mut self) {
        if matches!(self.route, Route::Detail { .. }) {
            self.detail_scroll = self.detail_scroll.saturating_add(1);
            return;
        }
        let len = self.records().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Open the detail view for the highlighted record
    pub fn open_selected(&mut self) {
        let Some(rec) = self.selected_record() else { return };
        match rec.id {
            Some(id) => self.navigate(Route::detail(id.to_string())),
            None => {
                let msg = format!("No detail link for {}", rec.name);
                self.show_toast(msg);
            }
        }
    }

    // ----- paging -----
    pub fn next_page(&mut self) {
        let req = self.paged.as_mut().and_then(|f| f.next_page());
        self.page_changed(req);
    }

    pub fn prev_page(&mut self) {
        let req = self.paged.as_mut().and_then(|f| f.prev_page());
        self.page_changed(req);
    }

    pub fn first_page(&mut self) {
        let req = self.paged.as_mut().and_then(|f| f.first_page());
        self.page_changed(req);
    }

    pub fn last_page(&mut self) {
        let req = self.paged.as_mut().and_then(|f| f.last_page());
        self.page_changed(req);
    }

    fn page_changed(&mut self, req: Option<ListRequest>) {
        if req.is_some() {
            self.selected = 0;
        }
        self.dispatch_list(ViewSlot::PagedList, req);
    }

    pub fn load_more(&mut self) {
        let req = self.incremental.as_mut().and_then(|f| f.load_more());
        self.dispatch_list(ViewSlot::IncrementalList, req);
    }

    /// Retry whichever mounted view is failed
    pub fn retry(&mut self) {
        if let Some(feed) = self.paged.as_mut() {
            let req = feed.retry();
            self.page_changed(req);
        } else if let Some(feed) = self.incremental.as_mut() {
            let req = feed.retry();
            self.dispatch_list(ViewSlot::IncrementalList, req);
        } else if let Some(feed) = self.detail.as_mut() {
            if let Some(req) = feed.retry() {
                self.dispatch_detail(req);
            }
        }
    }

    /// Back to the list screen from detail / not-found
    pub fn go_home(&mut self) {
        self.navigate(Route::List);
    }

    // ----- go-to prompt -----
    pub fn start_goto(&mut self) {
        self.input_mode = InputMode::Goto;
        self.goto_input.clear();
    }

    pub fn goto_add_char(&mut self, c: char) {
        self.goto_input.push(c);
    }

    pub fn goto_backspace(&mut self) {
        self.goto_input.pop();
    }

    pub fn cancel_goto(&mut self) {
        self.input_mode = InputMode::Normal;
        self.goto_input.clear();
    }

    pub fn apply_goto(&mut self) {
        let route = router::parse(&self.goto_input);
        self.cancel_goto();
        self.navigate(route);
    }

    // ----- events -----
    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::ListFetched { slot, ticket, result } => {
                let ok = result.is_ok();
                let applied = match slot {
                    ViewSlot::PagedList => self.paged.as_mut().map(|f| f.settle(ticket, result)),
                    ViewSlot::IncrementalList => {
                        self.incremental.as_mut().map(|f| f.settle(ticket, result))
                    }
                    ViewSlot::Detail => None,
                };
                match applied {
                    Some(true) => {
                        self.clamp_selection();
                        self.log_debug(format!("{slot:?} settled ticket={} ok={ok}", ticket.value()));
                    }
                    _ => self.log_debug(format!("{slot:?} ignored ticket={}", ticket.value())),
                }
            }
            AppEvent::DetailFetched { ticket, result } => {
                let ok = result.is_ok();
                let applied = self.detail.as_mut().map(|f| f.settle(ticket, result)).unwrap_or(false);
                self.log_debug(format!(
                    "Detail {} ticket={} ok={ok}",
                    if applied { "settled" } else { "ignored" },
                    ticket.value()
                ));
            }
            AppEvent::Quit => self.quit = true,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.records().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    // ----- dispatch -----
    fn dispatch_list(&mut self, slot: ViewSlot, req: Option<ListRequest>) {
        if let Some(ListRequest { ticket, url }) = req {
            self.send(FetchCommand::Start {
                slot,
                ticket,
                request: FetchRequest::List { url },
            });
        }
    }

    fn dispatch_detail(&mut self, req: DetailRequest) {
        let DetailRequest { ticket, id } = req;
        self.send(FetchCommand::Start {
            slot: ViewSlot::Detail,
            ticket,
            request: FetchRequest::Detail { id },
        });
    }

    fn send(&mut self, cmd: FetchCommand) {
        let Some(tx) = &self.fetch_tx else { return };
        if tx.send(cmd).is_err() {
            log::warn!("fetch worker is gone; command dropped");
            self.show_toast("Fetch worker stopped".to_string());
        }
    }
}
