use log::{debug, info, trace};
use tokio::sync::watch;

use crate::engine::debounce::Debouncer;
use crate::engine::paginate::{paginate, Page};
use crate::engine::predicate::{filter_records, is_server_os};
use crate::engine::sort::sort_records;
use crate::models::computer::{CheckStatus, ComputerRecord};
use crate::models::config::FilterConfig;
use crate::models::domain::DomainLookup;
use crate::models::filter::{FilterChange, FilterState, ServerFilter, SortField, SortOrder};
use crate::query::codec::{self, QueryParams};
use crate::query::history::History;
use crate::utils::error::FilterResult;

/// Pagination part of a table change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePagination {
    /// 1-based page
    pub current: usize,
    pub page_size: usize,
}

/// Sort part of a table change event
///
/// A missing order means the column sort was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSort {
    pub field: Option<SortField>,
    pub order: Option<SortOrder>,
}

/// Text fields the pipeline reads through the debouncer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct TextFilters {
    hostname: String,
    os_name: String,
    domain: String,
    check_status: Option<CheckStatus>,
}

impl From<&FilterState> for TextFilters {
    fn from(state: &FilterState) -> Self {
        Self {
            hostname: state.hostname.clone(),
            os_name: state.os_name.clone(),
            domain: state.domain.clone(),
            check_status: state.check_status,
        }
    }
}

/// Apply one field change to `state`, enforcing cross-field rules
///
/// - every change except paging resets the page to 1;
/// - a new OS text reclassifies the server filter;
/// - hiding disabled computers clears a disabled/deleted status filter,
///   selecting such a status shows them.
pub fn apply_change(state: &mut FilterState, change: FilterChange) {
    let keeps_page = change.is_paging();

    match change {
        FilterChange::Hostname(value) => state.hostname = value,
        FilterChange::OsName(value) => {
            state.server_filter = is_server_os(&value).then_some(ServerFilter::Server);
            state.os_name = value;
        }
        FilterChange::Domain(value) => state.domain = value,
        FilterChange::CheckStatus(status) => {
            state.check_status = status;
            if status.is_some_and(|s| s.is_hidden_by_default()) {
                state.show_disabled = true;
            }
        }
        FilterChange::ShowDisabled(show) => {
            state.show_disabled = show;
            if !show && state.check_status.is_some_and(|s| s.is_hidden_by_default()) {
                state.check_status = None;
            }
        }
        FilterChange::ServerFilter(filter) => state.server_filter = filter,
        FilterChange::IpRange(value) => state.ip_range = value,
        FilterChange::SortBy(field) => state.sort_by = field,
        FilterChange::SortOrder(order) => state.sort_order = order,
        FilterChange::Page(page) => state.page = page.max(1),
        FilterChange::PageSize(size) => state.page_size = size.max(1),
    }

    if !keeps_page {
        state.page = 1;
    }
}

/// Owns the filter state of one computer list view
///
/// The controller is the only writer of both the state and the URL: it is
/// seeded from the query string on construction and replaces the history
/// entry after every change. Text filters reach the pipeline through a
/// debouncer, so `page` reflects them only once typing has paused.
///
/// Text changes schedule timers on the current Tokio runtime. Outside a
/// runtime, or with a zero window, they apply immediately.
pub struct FilterController<H: History> {
    /// List configuration
    config: FilterConfig,

    /// Canonical state
    state: FilterState,

    /// Text filters as seen by the pipeline
    text: Debouncer<TextFilters>,

    /// Raw hostname keystrokes waiting to become a field change
    hostname_input: Debouncer<String>,

    /// Notified when `hostname_input` publishes
    hostname_rx: watch::Receiver<String>,

    /// Current URL parameters, including ones the list does not own
    params: QueryParams,

    /// URL sink
    history: H,

    /// Cached inventory snapshot
    records: Vec<ComputerRecord>,

    /// Domain id to name lookup
    domains: DomainLookup,
}

impl<H: History> FilterController<H> {
    /// Create a controller seeded from `query`
    ///
    /// The URL is only rewritten when decoding normalized it.
    pub fn new(config: FilterConfig, query: &str, history: H) -> Self {
        let params = QueryParams::parse(query);
        let state = codec::decode(&params, &config);
        let window = config.debounce_window();

        let text = Debouncer::new(TextFilters::from(&state), window);
        let hostname_input = Debouncer::new(state.hostname.clone(), window);
        let hostname_rx = hostname_input.subscribe();

        info!(
            "Computer list initialized ({} active filters, page {}, {} per page)",
            state.active_filter_count(),
            state.page,
            state.page_size
        );

        let mut controller = Self {
            config,
            state,
            text,
            hostname_input,
            hostname_rx,
            params,
            history,
            records: Vec::new(),
            domains: DomainLookup::new(),
        };
        controller.write_url();
        controller
    }

    /// Replace the inventory snapshot
    pub fn set_records(&mut self, records: Vec<ComputerRecord>) {
        debug!("Computer list snapshot replaced ({} records)", records.len());
        self.records = records;
    }

    pub fn set_domains(&mut self, domains: DomainLookup) {
        debug!("Domain lookup replaced ({} domains)", domains.len());
        self.domains = domains;
    }

    /// Apply a single field change
    pub fn set_field(&mut self, change: FilterChange) {
        debug!("set_field {:?}", change);
        apply_change(&mut self.state, change);
        self.publish_text();
        self.write_url();
    }

    /// Apply a raw `key=value` change
    pub fn set_param(&mut self, key: &str, value: &str) -> FilterResult<()> {
        let change = FilterChange::from_param(key, value)?;
        self.set_field(change);
        Ok(())
    }

    /// Reset every field to its default in one update
    pub fn clear_all(&mut self) {
        debug!("clear_all");
        self.state = FilterState::with_page_size(self.config.default_page_size);
        self.hostname_input.cancel();
        self.text.set_now(TextFilters::from(&self.state));
        self.write_url();
    }

    /// Apply a table widget's pagination and sort event in one update
    pub fn on_table_change(&mut self, pagination: TablePagination, sort: TableSort) {
        debug!("on_table_change {:?} {:?}", pagination, sort);
        self.state.page = pagination.current.max(1);
        self.state.page_size = pagination.page_size.max(1);

        match sort.order {
            Some(order) => {
                self.state.sort_by = sort.field.unwrap_or_default();
                self.state.sort_order = order;
            }
            None => {
                self.state.sort_by = SortField::default();
                self.state.sort_order = SortOrder::default();
            }
        }
        self.write_url();
    }

    /// Route a hostname keystroke through the input debouncer
    ///
    /// The value becomes a `Hostname` change once typing pauses; call
    /// `sync_pending` (or await `settle`) to pick it up.
    pub fn set_hostname_debounced(&mut self, value: impl Into<String>) {
        let value = value.into();
        trace!("hostname input {:?}", value);
        self.hostname_input.set(value);
        self.sync_pending();
    }

    /// Apply a hostname input the debouncer has published
    ///
    /// Returns whether a change was applied.
    pub fn sync_pending(&mut self) -> bool {
        if !self.hostname_rx.has_changed().unwrap_or(false) {
            return false;
        }
        let hostname = self.hostname_rx.borrow_and_update().clone();
        if hostname == self.state.hostname {
            return false;
        }
        self.set_field(FilterChange::Hostname(hostname));
        true
    }

    /// Publish every pending debounced value now
    pub fn flush_pending(&mut self) {
        self.hostname_input.flush();
        self.sync_pending();
        self.text.flush();
    }

    /// Wait until all debounced input has reached the pipeline
    pub async fn settle(&mut self) {
        self.hostname_input.settle().await;
        self.sync_pending();
        self.text.settle().await;
    }

    /// Whether debounced input is still waiting to be applied
    pub fn is_pending(&self) -> bool {
        self.hostname_input.is_pending()
            || self.hostname_rx.has_changed().unwrap_or(false)
            || self.text.is_pending()
    }

    /// Canonical filter state
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// State the pipeline currently evaluates
    ///
    /// A hidden status still waiting in the debouncer is dropped once
    /// disabled computers are hidden.
    pub fn effective_state(&self) -> FilterState {
        let text = self.text.current();
        let check_status = text
            .check_status
            .filter(|s| self.state.show_disabled || !s.is_hidden_by_default());
        FilterState {
            hostname: text.hostname,
            os_name: text.os_name,
            domain: text.domain,
            check_status,
            ..self.state.clone()
        }
    }

    /// Current query string, without the leading `?`
    pub fn query(&self) -> String {
        self.params.to_query_string()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filter, sort and slice the snapshot
    pub fn page(&self) -> Page<'_> {
        let state = self.effective_state();
        let filtered = filter_records(&self.records, &state, &self.domains);
        let sorted = sort_records(filtered, state.sort_by, state.sort_order, &self.domains);
        let page = paginate(sorted, state.page, state.page_size);

        debug!(
            "Computed page {} of {} ({} of {} matching records, sorted by {} {})",
            page.page,
            page.total_pages,
            page.records.len(),
            page.total,
            state.sort_by,
            state.sort_order.as_str()
        );
        page
    }

    fn publish_text(&mut self) {
        let wanted = TextFilters::from(&self.state);
        if wanted != self.text.latest() {
            self.text.set(wanted);
        }
    }

    fn write_url(&mut self) {
        let params = codec::encode(&self.state, &self.params, &self.config);
        if params != self.params {
            let query = params.to_query_string();
            trace!("URL replace ?{}", query);
            self.history.replace(&query);
            self.params = params;
        }
    }
}
