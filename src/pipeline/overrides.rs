use crate::config::default_location_overrides;
use std::collections::BTreeMap;

/// Exact-string venue corrections. Loaded once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LocationOverrides {
    table: BTreeMap<String, String>,
}

impl LocationOverrides {
    pub fn from_map(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    pub fn defaults() -> Self {
        Self::from_map(default_location_overrides())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Replacement for `location`, or `location` itself when no entry matches.
    pub fn apply<'a>(&'a self, location: &'a str) -> &'a str {
        self.table.get(location).map(String::as_str).unwrap_or(location)
    }
}
