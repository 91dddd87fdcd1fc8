//! Pagination and session state for one interactive run.
//!
//! The backend has no per-page result-count contract and no cursor token, so
//! the only way to guarantee a full display window is to keep fetching and
//! buffering upstream pages until the accumulated count covers the window or
//! an empty page proves the source exhausted.

use tracing::debug;

use crate::client::SearchBackend;
use crate::query::{SearchRequest, TimeRange};
use crate::result::ResultRecord;
use crate::Result;

/// Lifecycle phase of the result buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No query submitted yet.
    #[default]
    Idle,
    /// Backend fetches in progress.
    Fetching,
    /// Buffer covers the current window.
    Ready,
    /// The backend returned an empty page; no further fetch will be
    /// attempted for this query.
    Exhausted,
}

/// Owns the accumulated result buffer, the display window, and the upstream
/// page cursor for the lifetime of one interactive run.
pub struct Session<B: SearchBackend> {
    backend: B,
    request: SearchRequest,
    /// Results to display per window; `0` accepts a single backend page as-is.
    num: usize,
    buffer: Vec<ResultRecord>,
    window_start: usize,
    /// Upstream page cursor (1-based); unrelated to the display window.
    pageno: u32,
    phase: SessionPhase,
}

impl<B: SearchBackend> Session<B> {
    /// Creates an idle session around a request template.
    pub fn new(backend: B, request: SearchRequest, num: usize) -> Self {
        Self {
            backend,
            request,
            num,
            buffer: Vec::new(),
            window_start: 0,
            pageno: 1,
            phase: SessionPhase::Idle,
        }
    }

    /// Current request template.
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Per-window display count.
    pub fn num(&self) -> usize {
        self.num
    }

    /// Every record buffered so far, in arrival order.
    pub fn buffer(&self) -> &[ResultRecord] {
        &self.buffer
    }

    /// Offset of the first displayed record.
    pub fn window_start(&self) -> usize {
        self.window_start
    }

    /// The slice of the buffer currently on display.
    pub fn window(&self) -> &[ResultRecord] {
        let start = self.window_start.min(self.buffer.len());
        let end = if self.num == 0 {
            self.buffer.len()
        } else {
            (self.window_start + self.num).min(self.buffer.len())
        };
        &self.buffer[start..end]
    }

    /// Runs the initial fetch loop for the current template.
    pub fn start(&mut self) -> Result<()> {
        self.reset();
        self.fill()
    }

    /// Replaces the query text and starts over. Filters on the template
    /// (site, time range, categories) carry across to the new query.
    pub fn submit_query(&mut self, query: impl Into<String>) -> Result<()> {
        self.request.query = query.into();
        self.start()
    }

    /// Changes the time-range filter; treated identically to a new query.
    pub fn set_time_range(&mut self, range: Option<TimeRange>) -> Result<()> {
        self.request.time_range = range;
        self.start()
    }

    /// Changes the site filter; treated identically to a new query.
    pub fn set_site(&mut self, site: Option<String>) -> Result<()> {
        self.request.site = site;
        self.start()
    }

    /// Advances the window, fetching more pages only if the buffer does not
    /// already cover it.
    pub fn next(&mut self) -> Result<()> {
        if self.num > 0 {
            self.window_start += self.num;
        }
        self.fill()
    }

    /// Retreats the window, clamped at the start. Resolved entirely from the
    /// buffer; never fetches.
    pub fn previous(&mut self) {
        self.window_start = self.window_start.saturating_sub(self.num);
    }

    /// Rewinds the window to the start. Never fetches.
    pub fn first(&mut self) {
        self.window_start = 0;
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.window_start = 0;
        self.pageno = 1;
        self.phase = SessionPhase::Idle;
    }

    fn needs_fetch(&self) -> bool {
        if self.num == 0 {
            self.pageno == 1
        } else {
            self.buffer.len() <= self.window_start + self.num
        }
    }

    fn fill(&mut self) -> Result<()> {
        if self.phase == SessionPhase::Exhausted {
            return Ok(());
        }
        self.phase = SessionPhase::Fetching;
        while self.needs_fetch() {
            let page_request = self.request.clone().with_page(self.pageno);
            let page = self.backend.search(&page_request)?;
            debug!(
                "page {} returned {} results ({} buffered)",
                self.pageno,
                page.len(),
                self.buffer.len()
            );
            self.pageno += 1;
            if page.is_empty() {
                self.phase = SessionPhase::Exhausted;
                return Ok(());
            }
            self.buffer.extend(page);
            if self.num == 0 {
                break;
            }
        }
        self.phase = SessionPhase::Ready;
        Ok(())
    }
}
