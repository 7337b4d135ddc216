use std::borrow::Cow;
use std::cmp::Ordering;

use crate::models::computer::ComputerRecord;
use crate::models::domain::DomainLookup;
use crate::models::filter::{SortField, SortOrder};

/// Text ordered with [`collate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collated<'a>(pub Cow<'a, str>);

impl Ord for Collated<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        collate(&self.0, &other.0)
    }
}

impl PartialOrd for Collated<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Comparable value extracted from a record for one sort field
///
/// Keys of one field always share a variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Text(Collated<'a>),
    Flag(bool),
    /// Milliseconds since the epoch, zero when missing
    Timestamp(i64),
}

/// Extract the sort key of `record` for `field`
pub fn sort_key<'a>(
    field: SortField,
    record: &'a ComputerRecord,
    domains: &'a DomainLookup,
) -> SortKey<'a> {
    let text = |s: &'a str| SortKey::Text(Collated(Cow::Borrowed(s)));
    match field {
        SortField::Hostname => text(record.hostname.as_str()),
        SortField::Os => SortKey::Text(Collated(Cow::Owned(
            record.os_name().unwrap_or("").to_lowercase(),
        ))),
        SortField::OsVersion => text(record.os_version()),
        SortField::IpAddresses => text(record.first_ip()),
        SortField::DomainId => text(domains.name_of(record.domain_id)),
        SortField::CheckStatus => text(record.check_status.map(|s| s.as_str()).unwrap_or("")),
        SortField::Enabled => SortKey::Flag(record.enabled),
        SortField::IsVirtual => SortKey::Flag(record.is_virtual),
        SortField::LastFullScan => {
            SortKey::Timestamp(record.last_full_scan.map(|t| t.timestamp_millis()).unwrap_or(0))
        }
        SortField::LastUpdated => {
            SortKey::Timestamp(record.last_updated.map(|t| t.timestamp_millis()).unwrap_or(0))
        }
        SortField::Processor => text(record.first_processor()),
        SortField::Disk => text(record.first_disk()),
        SortField::MacAddress => text(record.first_mac()),
        SortField::Role => text(record.first_role()),
        SortField::Software => text(record.first_software()),
        SortField::VideoCard => text(record.first_video_card()),
    }
}

/// Case-insensitive ordering with the raw string as tiebreak
///
/// Approximates locale collation closely enough for hostnames and product
/// names: `alpha` sorts next to `Alpha`, not after `Zulu`.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Stable sort of `records` by `field` in `order`
///
/// Records with equal keys keep their input order in both directions.
pub fn sort_records<'a>(
    records: Vec<&'a ComputerRecord>,
    field: SortField,
    order: SortOrder,
    domains: &DomainLookup,
) -> Vec<&'a ComputerRecord> {
    let mut keyed: Vec<(SortKey<'_>, &'a ComputerRecord)> = records
        .into_iter()
        .map(|record| (sort_key(field, record, domains), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match order {
        SortOrder::Asc => a.cmp(b),
        SortOrder::Desc => b.cmp(a),
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}
