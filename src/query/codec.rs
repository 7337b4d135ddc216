use log::warn;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

use crate::models::config::FilterConfig;
use crate::models::filter::{parse_positive, FilterKey, FilterState, SortField, SortOrder};

/// Ordered query string parameters
///
/// Keeps parameters the list does not own (e.g. a sibling tab selector) in
/// their original position so encoding merges instead of replacing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a query string, with or without the leading `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, keeping the position of its first occurrence
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode without the leading `?`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Read a `FilterState` out of URL parameters
///
/// Absent keys take their defaults. Unparseable values fall back to the
/// default too, so a hand-edited URL never breaks the list.
pub fn decode(params: &QueryParams, config: &FilterConfig) -> FilterState {
    let mut state = FilterState::with_page_size(config.default_page_size);
    let text = |key: FilterKey| params.get(key.param()).unwrap_or("").to_string();

    state.hostname = text(FilterKey::Hostname);
    state.os_name = text(FilterKey::OsName);
    state.domain = text(FilterKey::Domain);
    state.ip_range = text(FilterKey::IpRange);
    state.check_status = lenient(params, FilterKey::CheckStatus);
    state.server_filter = lenient(params, FilterKey::ServerFilter);
    state.show_disabled = params.get(FilterKey::ShowDisabled.param()) == Some("true");
    state.sort_by = lenient::<SortField>(params, FilterKey::SortBy).unwrap_or_default();
    state.sort_order = lenient::<SortOrder>(params, FilterKey::SortOrder).unwrap_or_default();
    state.page = positive_or(params, FilterKey::Page, 1);
    state.page_size = positive_or(params, FilterKey::Limit, config.default_page_size);

    state.normalize();
    state
}

/// Write `state` into `existing`, returning the merged parameters
///
/// Parameters at their default value are removed; parameters the list does
/// not own are left untouched.
pub fn encode(state: &FilterState, existing: &QueryParams, config: &FilterConfig) -> QueryParams {
    let mut params = existing.clone();

    for key in FilterKey::ALL {
        match encoded_value(state, key, config) {
            Some(value) => params.set(key.param(), value),
            None => params.remove(key.param()),
        }
    }
    params
}

fn encoded_value(state: &FilterState, key: FilterKey, config: &FilterConfig) -> Option<String> {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    match key {
        FilterKey::Hostname => non_empty(&state.hostname),
        FilterKey::OsName => non_empty(&state.os_name),
        FilterKey::Domain => non_empty(&state.domain),
        FilterKey::IpRange => non_empty(&state.ip_range),
        FilterKey::CheckStatus => state.check_status.map(|s| s.as_str().to_string()),
        FilterKey::ServerFilter => state.server_filter.map(|s| s.as_str().to_string()),
        FilterKey::ShowDisabled => state.show_disabled.then(|| "true".to_string()),
        FilterKey::SortBy => {
            (state.sort_by != SortField::default()).then(|| state.sort_by.as_str().to_string())
        }
        FilterKey::SortOrder => (state.sort_order != SortOrder::default())
            .then(|| state.sort_order.as_str().to_string()),
        FilterKey::Page => (state.page != 1).then(|| state.page.to_string()),
        FilterKey::Limit => {
            (state.page_size != config.default_page_size).then(|| state.page_size.to_string())
        }
    }
}

/// Parse an enumerated parameter, logging and dropping unknown values
fn lenient<T: FromStr>(params: &QueryParams, key: FilterKey) -> Option<T> {
    let raw = params.get(key.param()).filter(|v| !v.is_empty())?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unknown {} value {:?}", key.param(), raw);
            None
        }
    }
}

fn positive_or(params: &QueryParams, key: FilterKey, default: usize) -> usize {
    match params.get(key.param()) {
        None => default,
        Some(raw) => parse_positive(raw).unwrap_or_else(|| {
            warn!("Invalid {} value {:?}, using {}", key.param(), raw, default);
            default
        }),
    }
}
