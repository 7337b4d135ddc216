use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::computer::CheckStatus;
use crate::utils::error::{FilterError, FilterResult};

/// Server/client classification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerFilter {
    Server,
    Client,
}

impl ServerFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerFilter::Server => "server",
            ServerFilter::Client => "client",
        }
    }
}

impl FromStr for ServerFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(ServerFilter::Server),
            "client" => Ok(ServerFilter::Client),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    /// Accepts the short form and the table widget's `ascend`/`descend`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascend" => Ok(SortOrder::Asc),
            "desc" | "descend" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// Column a computer list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Hostname,
    Os,
    OsVersion,
    IpAddresses,
    DomainId,
    CheckStatus,
    Enabled,
    IsVirtual,
    LastFullScan,
    LastUpdated,
    Processor,
    Disk,
    MacAddress,
    Role,
    Software,
    VideoCard,
}

impl SortField {
    pub const ALL: [SortField; 16] = [
        SortField::Hostname,
        SortField::Os,
        SortField::OsVersion,
        SortField::IpAddresses,
        SortField::DomainId,
        SortField::CheckStatus,
        SortField::Enabled,
        SortField::IsVirtual,
        SortField::LastFullScan,
        SortField::LastUpdated,
        SortField::Processor,
        SortField::Disk,
        SortField::MacAddress,
        SortField::Role,
        SortField::Software,
        SortField::VideoCard,
    ];

    /// Canonical `sort_by` tag
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Hostname => "hostname",
            SortField::Os => "os",
            SortField::OsVersion => "os_version",
            SortField::IpAddresses => "ip_addresses",
            SortField::DomainId => "domain_id",
            SortField::CheckStatus => "check_status",
            SortField::Enabled => "enabled",
            SortField::IsVirtual => "is_virtual",
            SortField::LastFullScan => "last_full_scan",
            SortField::LastUpdated => "last_updated",
            SortField::Processor => "processor",
            SortField::Disk => "disk",
            SortField::MacAddress => "mac_address",
            SortField::Role => "role",
            SortField::Software => "software",
            SortField::VideoCard => "video_card",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "os_name" => return Ok(SortField::Os),
            "ip" => return Ok(SortField::IpAddresses),
            _ => {}
        }
        SortField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

/// Query parameter recognized by the computer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Hostname,
    OsName,
    Domain,
    CheckStatus,
    ShowDisabled,
    SortBy,
    SortOrder,
    Page,
    Limit,
    ServerFilter,
    IpRange,
}

impl FilterKey {
    pub const ALL: [FilterKey; 11] = [
        FilterKey::Hostname,
        FilterKey::OsName,
        FilterKey::Domain,
        FilterKey::CheckStatus,
        FilterKey::ShowDisabled,
        FilterKey::SortBy,
        FilterKey::SortOrder,
        FilterKey::Page,
        FilterKey::Limit,
        FilterKey::ServerFilter,
        FilterKey::IpRange,
    ];

    pub fn param(&self) -> &'static str {
        match self {
            FilterKey::Hostname => "hostname",
            FilterKey::OsName => "os_name",
            FilterKey::Domain => "domain",
            FilterKey::CheckStatus => "check_status",
            FilterKey::ShowDisabled => "show_disabled",
            FilterKey::SortBy => "sort_by",
            FilterKey::SortOrder => "sort_order",
            FilterKey::Page => "page",
            FilterKey::Limit => "limit",
            FilterKey::ServerFilter => "server_filter",
            FilterKey::IpRange => "ip_range",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        FilterKey::ALL.iter().copied().find(|key| key.param() == param)
    }
}

/// Filter, sort and paging state of one computer list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-insensitive hostname prefix
    pub hostname: String,

    /// Case-insensitive OS name substring (`unknown` selects computers without an OS)
    pub os_name: String,

    /// Exact domain name, case-insensitive
    pub domain: String,

    /// Exact check status
    pub check_status: Option<CheckStatus>,

    /// List disabled and deleted computers too
    pub show_disabled: bool,

    /// Server/client classification
    pub server_filter: Option<ServerFilter>,

    /// Exact address, `A.B.[start-end].*` bucket, or `none`
    pub ip_range: String,

    pub sort_by: SortField,

    pub sort_order: SortOrder,

    /// 1-based page number
    pub page: usize,

    pub page_size: usize,
}

impl FilterState {
    /// Default state for the given page size
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            hostname: String::new(),
            os_name: String::new(),
            domain: String::new(),
            check_status: None,
            show_disabled: false,
            server_filter: None,
            ip_range: String::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Number of predicate filters that narrow the list
    pub fn active_filter_count(&self) -> usize {
        [
            !self.hostname.is_empty(),
            !self.os_name.is_empty(),
            !self.domain.is_empty(),
            self.check_status.is_some(),
            self.show_disabled,
            self.server_filter.is_some(),
            !self.ip_range.is_empty(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    /// Restore the disabled-status invariant
    ///
    /// A disabled or deleted status filter is only meaningful while
    /// disabled computers are shown, so selecting one turns visibility on.
    pub fn normalize(&mut self) {
        if self.check_status.is_some_and(|s| s.is_hidden_by_default()) {
            self.show_disabled = true;
        }
        self.page = self.page.max(1);
        self.page_size = self.page_size.max(1);
    }
}

/// A single typed field update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Hostname(String),
    OsName(String),
    Domain(String),
    CheckStatus(Option<CheckStatus>),
    ShowDisabled(bool),
    ServerFilter(Option<ServerFilter>),
    IpRange(String),
    SortBy(SortField),
    SortOrder(SortOrder),
    Page(usize),
    PageSize(usize),
}

impl FilterChange {
    pub fn key(&self) -> FilterKey {
        match self {
            FilterChange::Hostname(_) => FilterKey::Hostname,
            FilterChange::OsName(_) => FilterKey::OsName,
            FilterChange::Domain(_) => FilterKey::Domain,
            FilterChange::CheckStatus(_) => FilterKey::CheckStatus,
            FilterChange::ShowDisabled(_) => FilterKey::ShowDisabled,
            FilterChange::ServerFilter(_) => FilterKey::ServerFilter,
            FilterChange::IpRange(_) => FilterKey::IpRange,
            FilterChange::SortBy(_) => FilterKey::SortBy,
            FilterChange::SortOrder(_) => FilterKey::SortOrder,
            FilterChange::Page(_) => FilterKey::Page,
            FilterChange::PageSize(_) => FilterKey::Limit,
        }
    }

    /// Whether applying this change keeps the current page
    pub fn is_paging(&self) -> bool {
        matches!(self, FilterChange::Page(_) | FilterChange::PageSize(_))
    }

    /// Parse a raw `key=value` pair strictly
    ///
    /// An empty value clears optional fields. Unlike URL decoding, invalid
    /// values are reported instead of falling back to defaults.
    pub fn from_param(key: &str, value: &str) -> FilterResult<Self> {
        let key = FilterKey::from_param(key)
            .ok_or_else(|| FilterError::UnknownParameter(key.to_string()))?;
        let invalid = || FilterError::InvalidValue {
            key: key.param(),
            value: value.to_string(),
        };

        let change = match key {
            FilterKey::Hostname => FilterChange::Hostname(value.to_string()),
            FilterKey::OsName => FilterChange::OsName(value.to_string()),
            FilterKey::Domain => FilterChange::Domain(value.to_string()),
            FilterKey::IpRange => FilterChange::IpRange(value.to_string()),
            FilterKey::CheckStatus if value.is_empty() => FilterChange::CheckStatus(None),
            FilterKey::CheckStatus => {
                FilterChange::CheckStatus(Some(value.parse().map_err(|_| invalid())?))
            }
            FilterKey::ServerFilter if value.is_empty() => FilterChange::ServerFilter(None),
            FilterKey::ServerFilter => {
                FilterChange::ServerFilter(Some(value.parse().map_err(|_| invalid())?))
            }
            FilterKey::ShowDisabled => match value {
                "true" => FilterChange::ShowDisabled(true),
                "false" | "" => FilterChange::ShowDisabled(false),
                _ => return Err(invalid()),
            },
            FilterKey::SortBy => FilterChange::SortBy(value.parse().map_err(|_| invalid())?),
            FilterKey::SortOrder => {
                FilterChange::SortOrder(value.parse().map_err(|_| invalid())?)
            }
            FilterKey::Page => FilterChange::Page(parse_positive(value).ok_or_else(invalid)?),
            FilterKey::Limit => {
                FilterChange::PageSize(parse_positive(value).ok_or_else(invalid)?)
            }
        };
        Ok(change)
    }
}

/// Parse a strictly positive integer
pub(crate) fn parse_positive(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_accepts_aliases() {
        assert_eq!("ip".parse::<SortField>(), Ok(SortField::IpAddresses));
        assert_eq!("os_name".parse::<SortField>(), Ok(SortField::Os));
        assert_eq!("video_card".parse::<SortField>(), Ok(SortField::VideoCard));
        assert!("serial".parse::<SortField>().is_err());
    }

    #[test]
    fn every_sort_field_parses_from_its_tag() {
        for field in SortField::ALL {
            assert_eq!(field.as_str().parse::<SortField>(), Ok(field));
        }
    }

    #[test]
    fn active_filter_count_ignores_paging_and_sort() {
        let mut state = FilterState::with_page_size(20);
        state.page = 4;
        state.sort_order = SortOrder::Desc;
        assert_eq!(state.active_filter_count(), 0);

        state.hostname = "web".into();
        state.ip_range = "none".into();
        assert_eq!(state.active_filter_count(), 2);
    }

    #[test]
    fn normalize_turns_on_visibility_for_hidden_statuses() {
        let mut state = FilterState::with_page_size(20);
        state.check_status = Some(CheckStatus::IsDeleted);
        state.normalize();
        assert!(state.show_disabled);
    }

    #[test]
    fn from_param_is_strict() {
        assert_eq!(
            FilterChange::from_param("limit", "50").unwrap(),
            FilterChange::PageSize(50)
        );
        assert_eq!(
            FilterChange::from_param("check_status", "").unwrap(),
            FilterChange::CheckStatus(None)
        );
        assert!(matches!(
            FilterChange::from_param("page", "0"),
            Err(FilterError::InvalidValue { key: "page", .. })
        ));
        assert!(matches!(
            FilterChange::from_param("tab", "users"),
            Err(FilterError::UnknownParameter(_))
        ));
    }
}
