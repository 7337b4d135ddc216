use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::models::computer::ComputerRecord;
use crate::models::domain::{Domain, DomainLookup};
use crate::utils::error::FilterResult;

/// Cached inventory as exported from the REST backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub computers: Vec<ComputerRecord>,

    #[serde(default)]
    pub domains: Vec<Domain>,
}

impl InventorySnapshot {
    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> FilterResult<Self> {
        let file = File::open(path)?;
        let snapshot: InventorySnapshot = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} computers and {} domains from {}",
            snapshot.computers.len(),
            snapshot.domains.len(),
            path.display()
        );
        Ok(snapshot)
    }

    pub fn into_parts(self) -> (Vec<ComputerRecord>, DomainLookup) {
        let domains = self.domains.into_iter().collect();
        (self.computers, domains)
    }
}
