use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A domain as listed by the inventory backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: i64,
    pub name: String,
}

/// Domain id to name lookup supplied alongside the computer list
#[derive(Debug, Clone, Default)]
pub struct DomainLookup {
    names: HashMap<i64, String>,
}

impl DomainLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Resolve a domain id, empty string when the id is absent or unknown
    pub fn name_of(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.names.get(&id))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<Domain> for DomainLookup {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|d| (d.id, d.name)).collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for DomainLookup {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(id, name)| (id, name.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_resolve_to_empty() {
        let lookup: DomainLookup = [(1, "corp.local")].into_iter().collect();

        assert_eq!(lookup.name_of(Some(1)), "corp.local");
        assert_eq!(lookup.name_of(Some(2)), "");
        assert_eq!(lookup.name_of(None), "");
    }
}
