//! Address filters for the `ip_range` parameter.
//!
//! Three forms are understood:
//!
//! - an exact address (`10.0.3.55`), compared as a string;
//! - a bracket bucket (`10.0.[2-4].*`), matching any address whose first two
//!   octets are equal and whose third octet lies in the inclusive range;
//! - `none`, selecting computers with no address on record.

use log::debug;

/// Sentinel selecting computers without any address
pub const NO_ADDRESS: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpRange {
    /// No address filter
    Any,

    /// Computers with an empty address list
    NoAddress,

    /// Exact address match
    Exact(String),

    /// Third-octet bucket, e.g. `10.0.[2-4].*`
    Bucket {
        first: String,
        second: String,
        start: u32,
        end: u32,
    },

    /// Bracket expression that failed to parse; matches nothing
    Malformed(String),
}

impl IpRange {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return IpRange::Any;
        }
        if raw.eq_ignore_ascii_case(NO_ADDRESS) {
            return IpRange::NoAddress;
        }

        let segments: Vec<&str> = raw.split('.').collect();
        let third = segments.get(2).copied().unwrap_or("");
        if !third.starts_with('[') {
            return IpRange::Exact(raw.to_string());
        }

        match parse_bracket(third) {
            Some((start, end)) if segments.len() >= 3 => IpRange::Bucket {
                first: segments[0].to_string(),
                second: segments[1].to_string(),
                start,
                end,
            },
            _ => {
                debug!("Ignoring malformed ip_range bracket expression {:?}", raw);
                IpRange::Malformed(raw.to_string())
            }
        }
    }

    /// Test a computer's address list
    pub fn matches<'a, I>(&self, addresses: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self {
            IpRange::Any => true,
            IpRange::NoAddress => addresses.into_iter().next().is_none(),
            IpRange::Exact(exact) => addresses.into_iter().any(|ip| ip == exact),
            IpRange::Bucket {
                first,
                second,
                start,
                end,
            } => addresses.into_iter().any(|ip| {
                let mut octets = ip.split('.');
                let (Some(a), Some(b), Some(c)) = (octets.next(), octets.next(), octets.next())
                else {
                    return false;
                };
                a == first
                    && b == second
                    && c.parse::<u32>().is_ok_and(|c| (*start..=*end).contains(&c))
            }),
            IpRange::Malformed(_) => false,
        }
    }
}

/// Parse `[start-end]` into an inclusive pair
fn parse_bracket(segment: &str) -> Option<(u32, u32)> {
    let inner = segment.strip_prefix('[')?.strip_suffix(']')?;
    let (start, end) = inner.split_once('-')?;
    let start = start.trim().parse::<u32>().ok()?;
    let end = end.trim().parse::<u32>().ok()?;
    (start <= end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_matches_third_octet_range() {
        let range = IpRange::parse("10.0.[2-4].0");

        assert!(range.matches(["10.0.3.55"]));
        assert!(range.matches(["10.0.2.1"]));
        assert!(range.matches(["10.0.4.254"]));
        assert!(!range.matches(["10.0.5.1"]));
        assert!(!range.matches(["10.1.3.1"]));
    }

    #[test]
    fn bucket_matches_any_address_of_the_list() {
        let range = IpRange::parse("192.168.[0-1].*");
        assert!(range.matches(["172.16.0.1", "192.168.1.20"]));
    }

    #[test]
    fn exact_match_is_string_equality() {
        let range = IpRange::parse("10.0.0.1");
        assert!(range.matches(["10.0.0.1"]));
        assert!(!range.matches(["10.0.0.10"]));
    }

    #[test]
    fn malformed_brackets_match_nothing() {
        for raw in ["10.0.[].*", "10.0.[a-b].*", "10.0.[4-2].*", "10.0.[3.*"] {
            let range = IpRange::parse(raw);
            assert!(matches!(range, IpRange::Malformed(_)), "{raw}");
            assert!(!range.matches(["10.0.3.1"]));
        }
    }

    #[test]
    fn none_selects_computers_without_addresses() {
        let range = IpRange::parse("none");
        assert!(range.matches(Vec::<&str>::new()));
        assert!(!range.matches(["10.0.0.1"]));
    }

    #[test]
    fn short_candidate_addresses_do_not_match() {
        let range = IpRange::parse("10.0.[0-9].*");
        assert!(!range.matches(["10.0"]));
    }
}
