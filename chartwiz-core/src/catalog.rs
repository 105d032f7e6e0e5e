//! Indicator catalog: paginated fetch state with stale-response discard.
//!
//! The catalog itself does no I/O. Each `begin_*` call issues a
//! [`FetchTicket`] carrying a fresh, strictly increasing [`RequestToken`];
//! whoever runs the ticket (see [`execute`]) hands the outcome back through
//! [`IndicatorCatalog::resolve`]. Only the outcome whose token matches the
//! request currently in flight is applied; anything older is discarded.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, info, warn};

use crate::data::{IndicatorPage, IndicatorSource, PageRequest, Pagination, SourceError};
use crate::domain::{Category, CombinedIndicator, DateWindow, IndicatorDescriptor};
use crate::filter::{filter_all, has_points_in};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    pub page_size: u32,
    pub report_type_id: Option<i64>,
    /// Underlying categories merged into the combination pool.
    pub combined_sources: Vec<Category>,
    /// Upper bound on pages walked per source category in a combined fetch.
    pub combined_max_pages: u32,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            report_type_id: None,
            combined_sources: vec![Category::Macro],
            combined_max_pages: 50,
        }
    }
}

/// What a ticket asks the source for.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Page {
        category: Category,
        window: DateWindow,
        page: PageRequest,
    },
    Combined {
        window: DateWindow,
        sources: Vec<Category>,
        page_size: u32,
        max_pages: u32,
        report_type_id: Option<i64>,
    },
}

impl FetchRequest {
    pub fn category(&self) -> Category {
        match self {
            FetchRequest::Page { category, .. } => *category,
            FetchRequest::Combined { .. } => Category::Combination,
        }
    }

    pub fn window(&self) -> DateWindow {
        match self {
            FetchRequest::Page { window, .. } | FetchRequest::Combined { window, .. } => *window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Replace the loaded list.
    Replace,
    /// Append a further page.
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub token: RequestToken,
    pub mode: FetchMode,
    pub request: FetchRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogStatus {
    Idle,
    Loading,
    Loaded,
    /// Distinct from an empty result; `retry()` replays the failed request.
    Failed(SourceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

#[derive(Debug)]
pub struct IndicatorCatalog {
    options: CatalogOptions,
    next_token: u64,
    in_flight: Option<(RequestToken, FetchMode)>,
    last: Option<(FetchRequest, FetchMode)>,
    status: CatalogStatus,
    items: Vec<IndicatorDescriptor>,
    pagination: Option<Pagination>,
}

impl IndicatorCatalog {
    pub fn new(options: CatalogOptions) -> Self {
        Self {
            options,
            next_token: 0,
            in_flight: None,
            last: None,
            status: CatalogStatus::Idle,
            items: Vec::new(),
            pagination: None,
        }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    fn issue(&mut self, request: FetchRequest, mode: FetchMode) -> FetchTicket {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        if let Some((old, _)) = self.in_flight {
            debug!(superseded = %old, by = %token, "fetch superseded");
        }
        self.in_flight = Some((token, mode));
        self.last = Some((request.clone(), mode));
        self.status = CatalogStatus::Loading;
        debug!(%token, category = %request.category(), ?mode, "fetch issued");
        FetchTicket { token, mode, request }
    }

    /// Fetch the first page for a category, superseding anything in flight.
    /// `Combination` is routed to the merged fetch.
    pub fn begin_fetch(&mut self, category: Category, window: DateWindow) -> FetchTicket {
        if category.is_combination() {
            return self.begin_combined(window);
        }
        self.items.clear();
        self.pagination = None;
        let request = FetchRequest::Page {
            category,
            window,
            page: PageRequest::first(self.options.page_size, self.options.report_type_id),
        };
        self.issue(request, FetchMode::Replace)
    }

    /// Merged fetch across the configured source categories.
    pub fn begin_combined(&mut self, window: DateWindow) -> FetchTicket {
        self.items.clear();
        self.pagination = None;
        let request = FetchRequest::Combined {
            window,
            sources: self.options.combined_sources.clone(),
            page_size: self.options.page_size,
            max_pages: self.options.combined_max_pages,
            report_type_id: self.options.report_type_id,
        };
        self.issue(request, FetchMode::Replace)
    }

    /// Next page with the last-used parameters. `None` while any fetch is in
    /// flight, when the last page said there are no more, or after a failure
    /// (use [`retry`](Self::retry) then).
    pub fn begin_more(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() || !self.has_more() {
            return None;
        }
        if matches!(self.status, CatalogStatus::Failed(_)) {
            return None;
        }
        let request = match &self.last {
            Some((FetchRequest::Page { category, window, page }, _)) => FetchRequest::Page {
                category: *category,
                window: *window,
                page: page.next(),
            },
            _ => return None,
        };
        Some(self.issue(request, FetchMode::Append))
    }

    /// Replay the last request unchanged. `None` if nothing failed.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if !matches!(self.status, CatalogStatus::Failed(_)) {
            return None;
        }
        let (request, mode) = self.last.clone()?;
        info!(category = %request.category(), "retrying fetch");
        Some(self.issue(request, mode))
    }

    /// Apply the outcome of a ticket. Outcomes for anything but the request
    /// currently in flight are dropped untouched.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        outcome: Result<IndicatorPage, SourceError>,
    ) -> Resolution {
        let mode = match self.in_flight {
            Some((current, mode)) if current == token => mode,
            _ => {
                debug!(%token, "discarding stale fetch result");
                return Resolution::Stale;
            }
        };
        self.in_flight = None;

        match outcome {
            Ok(page) => {
                let request = self.last.as_ref().map(|(r, _)| r.clone());
                let mut data = page.data;
                if let Some(FetchRequest::Page { category, window, .. }) = &request {
                    data = normalize_page(*category, window, data);
                }
                match mode {
                    FetchMode::Replace => self.items = data,
                    FetchMode::Append => self.items.extend(data),
                }
                self.pagination = Some(page.pagination);
                self.status = CatalogStatus::Loaded;
                debug!(%token, loaded = self.items.len(), "fetch applied");
            }
            Err(err) => {
                warn!(%token, error = %err, "fetch failed");
                self.status = CatalogStatus::Failed(err);
            }
        }
        Resolution::Applied
    }

    /// Drop all state and orphan any in-flight request.
    pub fn invalidate(&mut self) {
        if let Some((token, _)) = self.in_flight.take() {
            debug!(%token, "in-flight fetch orphaned");
        }
        self.last = None;
        self.items.clear();
        self.pagination = None;
        self.status = CatalogStatus::Idle;
    }

    /// Slice every loaded series to a global date window.
    pub fn apply_window(&mut self, window: &DateWindow) {
        self.items = filter_all(&self.items, window);
    }

    pub fn items(&self) -> &[IndicatorDescriptor] {
        &self.items
    }

    pub fn find(&self, key: &crate::domain::SelectionKey) -> Option<&IndicatorDescriptor> {
        self.items.iter().find(|d| &d.key() == key)
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&SourceError> {
        match &self.status {
            CatalogStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight.map(|(t, _)| t)
    }

    pub fn has_more(&self) -> bool {
        self.pagination.is_some_and(|p| p.has_more)
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    /// Category of the last request issued.
    pub fn category(&self) -> Option<Category> {
        self.last.as_ref().map(|(r, _)| r.category())
    }
}

/// Case-insensitive name order with a byte-order tiebreak.
fn cmp_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Default-first, then by display name.
pub fn sort_default_first(items: &mut [IndicatorDescriptor]) {
    items.sort_by(|a, b| {
        b.is_default()
            .cmp(&a.is_default())
            .then_with(|| cmp_names(a.display_name(), b.display_name()))
    });
}

/// Default-first, then source category, then name.
pub fn sort_combined(items: &mut [IndicatorDescriptor]) {
    items.sort_by(|a, b| {
        let source = |d: &IndicatorDescriptor| d.source_category().map(|c| c.title());
        b.is_default()
            .cmp(&a.is_default())
            .then_with(|| source(a).cmp(&source(b)))
            .then_with(|| cmp_names(a.display_name(), b.display_name()))
    });
}

/// Per-page normalisation for a single category. Series are sliced to the
/// window; for categories that prune, series left empty are dropped unless
/// flagged default, and the page is sorted default-first.
pub fn normalize_page(
    category: Category,
    window: &DateWindow,
    data: Vec<IndicatorDescriptor>,
) -> Vec<IndicatorDescriptor> {
    let mut data = filter_all(&data, window);
    if category.prunes_empty_series() {
        let before = data.len();
        data.retain(|d| match d.series() {
            Some(series) => d.is_default() || !series.points.is_empty(),
            None => true,
        });
        if data.len() < before {
            debug!(%category, dropped = before - data.len(), "pruned indicators without data");
        }
        sort_default_first(&mut data);
    }
    data
}

/// Run a ticket's request against a source. Blocking; meant for the worker.
pub fn execute(source: &dyn IndicatorSource, request: &FetchRequest) -> Result<IndicatorPage, SourceError> {
    match request {
        FetchRequest::Page { category, window, page } => source.fetch_page(*category, window, page),
        FetchRequest::Combined {
            window,
            sources,
            page_size,
            max_pages,
            report_type_id,
        } => {
            let data = fetch_combined(source, sources, window, *page_size, *max_pages, *report_type_id)?;
            let total = u32::try_from(data.len()).unwrap_or(u32::MAX);
            Ok(IndicatorPage {
                data,
                pagination: Pagination {
                    total,
                    limit: total,
                    offset: 0,
                    has_more: false,
                },
            })
        }
    }
}

/// Walk every page of each source category, keep flat series with data in
/// the window, tag them with their origin and sort for stable grouping.
pub fn fetch_combined(
    source: &dyn IndicatorSource,
    sources: &[Category],
    window: &DateWindow,
    page_size: u32,
    max_pages: u32,
    report_type_id: Option<i64>,
) -> Result<Vec<IndicatorDescriptor>, SourceError> {
    let mut merged = Vec::new();
    for &category in sources {
        let mut page = PageRequest::first(page_size.max(1), report_type_id);
        for _ in 0..max_pages.max(1) {
            let result = source.fetch_page(category, window, &page)?;
            for descriptor in result.data {
                let IndicatorDescriptor::Flat(flat) = descriptor else {
                    continue;
                };
                if !has_points_in(&flat.points, window) {
                    continue;
                }
                merged.push(IndicatorDescriptor::Combined(CombinedIndicator {
                    source_category: category,
                    indicator: flat,
                }));
            }
            if !result.pagination.has_more {
                break;
            }
            page = page.next();
        }
    }
    let mut merged = filter_all(&merged, window);
    sort_combined(&mut merged);
    info!(sources = sources.len(), indicators = merged.len(), "combined fetch complete");
    Ok(merged)
}
