use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of the last inventory check against a computer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Success,
    Failed,
    Unreachable,
    PartiallySuccessful,
    Disabled,
    IsDeleted,
}

impl CheckStatus {
    pub const ALL: [CheckStatus; 6] = [
        CheckStatus::Success,
        CheckStatus::Failed,
        CheckStatus::Unreachable,
        CheckStatus::PartiallySuccessful,
        CheckStatus::Disabled,
        CheckStatus::IsDeleted,
    ];

    /// Wire name, as used by the REST backend and in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Success => "success",
            CheckStatus::Failed => "failed",
            CheckStatus::Unreachable => "unreachable",
            CheckStatus::PartiallySuccessful => "partially_successful",
            CheckStatus::Disabled => "disabled",
            CheckStatus::IsDeleted => "is_deleted",
        }
    }

    /// Statuses that are only listed when disabled computers are shown
    pub fn is_hidden_by_default(&self) -> bool {
        matches!(self, CheckStatus::Disabled | CheckStatus::IsDeleted)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// Operating system descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsInfo {
    /// Product name (e.g., "Windows Server 2019")
    #[serde(default)]
    pub name: Option<String>,

    /// Version or build string
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAddressEntry {
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Processor {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Disk {
    #[serde(default)]
    pub model: Option<String>,

    /// Volume label, used when the model is not reported
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacAddress {
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Software {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoCard {
    #[serde(default)]
    pub name: Option<String>,
}

/// A computer as delivered by the inventory backend
///
/// Records are read-only input to the list engine; nothing in this crate
/// mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputerRecord {
    /// Backend identifier
    pub id: i64,

    /// Network hostname
    pub hostname: String,

    /// Operating system, if the last scan reported one
    #[serde(default)]
    pub os: Option<OsInfo>,

    /// Domain membership, resolved through a `DomainLookup`
    #[serde(default)]
    pub domain_id: Option<i64>,

    /// Known IP addresses
    #[serde(default)]
    pub ip_addresses: Vec<IpAddressEntry>,

    /// Result of the last check
    #[serde(default)]
    pub check_status: Option<CheckStatus>,

    /// Whether the computer takes part in scans
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Whether the computer is a virtual machine
    #[serde(default)]
    pub is_virtual: bool,

    /// Timestamp of the last full scan
    #[serde(default)]
    pub last_full_scan: Option<DateTime<Utc>>,

    /// Timestamp of the last record update
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub processors: Vec<Processor>,

    #[serde(default)]
    pub disks: Vec<Disk>,

    #[serde(default)]
    pub mac_addresses: Vec<MacAddress>,

    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(default)]
    pub software: Vec<Software>,

    #[serde(default)]
    pub video_cards: Vec<VideoCard>,
}

fn default_enabled() -> bool {
    true
}

impl ComputerRecord {
    /// Create a bare record with just an id and hostname
    pub fn new(id: i64, hostname: impl Into<String>) -> Self {
        Self {
            id,
            hostname: hostname.into(),
            os: None,
            domain_id: None,
            ip_addresses: Vec::new(),
            check_status: None,
            enabled: true,
            is_virtual: false,
            last_full_scan: None,
            last_updated: None,
            processors: Vec::new(),
            disks: Vec::new(),
            mac_addresses: Vec::new(),
            roles: Vec::new(),
            software: Vec::new(),
            video_cards: Vec::new(),
        }
    }

    /// OS name, treating an empty string as missing
    pub fn os_name(&self) -> Option<&str> {
        self.os
            .as_ref()
            .and_then(|os| os.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    pub fn os_version(&self) -> &str {
        self.os
            .as_ref()
            .and_then(|os| os.version.as_deref())
            .unwrap_or("")
    }

    /// First IP address or empty string
    pub fn first_ip(&self) -> &str {
        self.ip_addresses
            .first()
            .map(|ip| ip.address.as_str())
            .unwrap_or("")
    }

    pub fn first_processor(&self) -> &str {
        self.processors
            .first()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("")
    }

    pub fn first_disk(&self) -> &str {
        self.disks
            .first()
            .and_then(|d| d.model.as_deref().or(d.label.as_deref()))
            .unwrap_or("")
    }

    pub fn first_mac(&self) -> &str {
        self.mac_addresses
            .first()
            .map(|m| m.address.as_str())
            .unwrap_or("")
    }

    pub fn first_role(&self) -> &str {
        self.roles
            .first()
            .and_then(|r| r.name.as_deref())
            .unwrap_or("")
    }

    pub fn first_software(&self) -> &str {
        self.software
            .first()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("")
    }

    pub fn first_video_card(&self) -> &str {
        self.video_cards
            .first()
            .and_then(|v| v.name.as_deref())
            .unwrap_or("")
    }

    // Builders, mostly for fixtures and the CLI

    pub fn with_os(mut self, name: impl Into<String>) -> Self {
        self.os = Some(OsInfo {
            name: Some(name.into()),
            version: None,
        });
        self
    }

    pub fn with_domain(mut self, domain_id: i64) -> Self {
        self.domain_id = Some(domain_id);
        self
    }

    pub fn with_ip(mut self, address: impl Into<String>) -> Self {
        self.ip_addresses.push(IpAddressEntry {
            address: address.into(),
        });
        self
    }

    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.check_status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_status_round_trips_through_wire_name() {
        for status in CheckStatus::ALL {
            assert_eq!(status.as_str().parse::<CheckStatus>(), Ok(status));
        }
        assert!("deleted".parse::<CheckStatus>().is_err());
    }

    #[test]
    fn record_deserializes_with_missing_optionals() {
        let record: ComputerRecord =
            serde_json::from_str(r#"{"id": 7, "hostname": "web1"}"#).unwrap();

        assert!(record.enabled);
        assert_eq!(record.os_name(), None);
        assert_eq!(record.first_ip(), "");
        assert_eq!(record.first_disk(), "");
    }

    #[test]
    fn empty_os_name_counts_as_missing() {
        let record = ComputerRecord::new(1, "pc").with_os("");
        assert_eq!(record.os_name(), None);
    }

    #[test]
    fn disk_falls_back_to_label() {
        let mut record = ComputerRecord::new(1, "pc");
        record.disks.push(Disk {
            model: None,
            label: Some("SYSTEM".into()),
        });
        assert_eq!(record.first_disk(), "SYSTEM");
    }
}
