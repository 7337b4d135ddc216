use lazy_static::lazy_static;
use regex::Regex;

use crate::engine::ip_range::IpRange;
use crate::models::computer::{CheckStatus, ComputerRecord};
use crate::models::domain::DomainLookup;
use crate::models::filter::{FilterState, ServerFilter};

/// `os_name` value selecting computers whose OS was never reported
pub const UNKNOWN_OS: &str = "unknown";

lazy_static! {
    static ref SERVER_OS: Regex =
        Regex::new(r"(?i)server|hyper-v").expect("server OS pattern is valid");
}

/// Server-OS heuristic
pub fn is_server_os(os_name: &str) -> bool {
    SERVER_OS.is_match(os_name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OsQuery {
    Any,
    Missing,
    Contains(String),
}

impl OsQuery {
    fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            OsQuery::Any
        } else if raw.eq_ignore_ascii_case(UNKNOWN_OS) {
            OsQuery::Missing
        } else {
            OsQuery::Contains(raw.to_lowercase())
        }
    }
}

/// Filter state prepared for per-record evaluation
///
/// Lower-casing and range parsing happen once here instead of once per
/// record.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    show_disabled: bool,
    hostname: String,
    os: OsQuery,
    domain: String,
    check_status: Option<CheckStatus>,
    server_filter: Option<ServerFilter>,
    ip_range: IpRange,
}

impl CompiledFilter {
    pub fn new(state: &FilterState) -> Self {
        Self {
            show_disabled: state.show_disabled,
            hostname: state.hostname.to_lowercase(),
            os: OsQuery::parse(&state.os_name),
            domain: state.domain.to_lowercase(),
            check_status: state.check_status,
            server_filter: state.server_filter,
            ip_range: IpRange::parse(&state.ip_range),
        }
    }

    /// Whether `record` passes every filter
    pub fn matches(&self, record: &ComputerRecord, domains: &DomainLookup) -> bool {
        self.visible(record)
            && self.status_matches(record)
            && self.hostname_matches(record)
            && self.os_matches(record)
            && self.server_matches(record)
            && self.domain_matches(record, domains)
            && self.ip_matches(record)
    }

    fn visible(&self, record: &ComputerRecord) -> bool {
        self.show_disabled
            || !record
                .check_status
                .is_some_and(|status| status.is_hidden_by_default())
    }

    fn status_matches(&self, record: &ComputerRecord) -> bool {
        match self.check_status {
            None => true,
            Some(wanted) => record.check_status == Some(wanted),
        }
    }

    fn hostname_matches(&self, record: &ComputerRecord) -> bool {
        self.hostname.is_empty() || record.hostname.to_lowercase().starts_with(&self.hostname)
    }

    fn os_matches(&self, record: &ComputerRecord) -> bool {
        match &self.os {
            OsQuery::Any => true,
            OsQuery::Missing => record.os_name().is_none(),
            OsQuery::Contains(needle) => record
                .os_name()
                .is_some_and(|name| name.to_lowercase().contains(needle.as_str())),
        }
    }

    fn server_matches(&self, record: &ComputerRecord) -> bool {
        match self.server_filter {
            None => true,
            Some(ServerFilter::Server) => record.os_name().is_some_and(is_server_os),
            Some(ServerFilter::Client) => record.os_name().is_some_and(|name| !is_server_os(name)),
        }
    }

    fn domain_matches(&self, record: &ComputerRecord, domains: &DomainLookup) -> bool {
        self.domain.is_empty() || domains.name_of(record.domain_id).to_lowercase() == self.domain
    }

    fn ip_matches(&self, record: &ComputerRecord) -> bool {
        self.ip_range
            .matches(record.ip_addresses.iter().map(|ip| ip.address.as_str()))
    }
}

/// Run the predicate pipeline over `records`, keeping input order
pub fn filter_records<'a>(
    records: &'a [ComputerRecord],
    state: &FilterState,
    domains: &DomainLookup,
) -> Vec<&'a ComputerRecord> {
    let filter = CompiledFilter::new(state);
    records
        .iter()
        .filter(|record| filter.matches(record, domains))
        .collect()
}
