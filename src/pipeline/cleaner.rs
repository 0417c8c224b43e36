use super::overrides::LocationOverrides;
use crate::config::Config;
use crate::constants::SENTINEL;
use crate::error::Result;
use crate::extract::price::strip_trailing_periods;
use crate::extract::text::clean_opt;
use crate::extract::LocationCleaner;
use crate::types::{EventRecord, RawEventRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Cleaned, deduplicated records in persistence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    records: Vec<EventRecord>,
}

impl RecordTable {
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input: usize,
    pub dropped_unnamed: usize,
    pub duplicates: usize,
    pub output: usize,
}

/// Merges adapter output into one table. The only place venue overrides are
/// applied.
#[derive(Debug, Clone)]
pub struct Cleaner {
    locations: LocationCleaner,
    overrides: Arc<LocationOverrides>,
}

impl Cleaner {
    pub fn new(locations: LocationCleaner, overrides: Arc<LocationOverrides>) -> Self {
        Self { locations, overrides }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            LocationCleaner::new(&config.city)?,
            Arc::new(LocationOverrides::from_map(config.location_overrides.clone())),
        ))
    }

    /// Concatenate batches in adapter order, then fill, filter, dedupe and
    /// normalize. Deterministic for a given input.
    pub fn aggregate(&self, batches: Vec<Vec<RawEventRecord>>) -> (RecordTable, CleaningReport) {
        let mut report = CleaningReport::default();
        let mut seen: HashSet<(String, Option<NaiveDate>)> = HashSet::new();
        let mut records = Vec::new();

        for raw in batches.into_iter().flatten() {
            report.input += 1;
            let Some(mut record) = EventRecord::from_raw(fill_absent(raw)) else {
                report.dropped_unnamed += 1;
                continue;
            };

            // Same name and date means same event, even across venues.
            if !seen.insert((record.event_name.clone(), record.date)) {
                report.duplicates += 1;
                debug!(
                    event = %record.event_name,
                    date = %record.date_text(),
                    source = %record.source(),
                    location = record.location.as_deref().unwrap_or(SENTINEL),
                    "dropping duplicate (name, date)"
                );
                continue;
            }

            record.location = self.normalize_location(record.location.as_deref());
            record.price = record
                .price
                .as_deref()
                .and_then(|p| clean_opt(strip_trailing_periods(p)));
            records.push(record);
        }

        report.output = records.len();
        info!(
            "🧹 Cleaned {} raw records: {} kept, {} unnamed, {} duplicates",
            report.input, report.output, report.dropped_unnamed, report.duplicates
        );
        (RecordTable { records }, report)
    }

    fn normalize_location(&self, location: Option<&str>) -> Option<String> {
        let cleaned = location.and_then(|l| self.locations.clean(l));
        let key = cleaned.as_deref().unwrap_or(SENTINEL);
        clean_opt(self.overrides.apply(key))
    }
}

/// Empty strings and the literal sentinel become absent.
fn fill_absent(mut raw: RawEventRecord) -> RawEventRecord {
    for field in [
        &mut raw.event_name,
        &mut raw.location,
        &mut raw.price,
        &mut raw.url,
    ] {
        *field = field.as_deref().and_then(clean_opt);
    }
    raw
}
