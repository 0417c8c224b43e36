use crate::constants::{
    EVENTBRITE_LABEL, EVENTBRITE_SOURCE, PGH_EVENTS_LABEL, PGH_EVENTS_SOURCE, SENTINEL,
};
use crate::error::Result;
use crate::pipeline::context::ScrapeContext;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Persisted 12-hour time format.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Where a record came from. Fixed at extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "pgh.events")]
    PghEvents,
    #[serde(rename = "Eventbrite")]
    Eventbrite,
}

impl Source {
    /// Label written to the record store.
    pub fn label(&self) -> &'static str {
        match self {
            Source::PghEvents => PGH_EVENTS_LABEL,
            Source::Eventbrite => EVENTBRITE_LABEL,
        }
    }

    /// Name used on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Source::PghEvents => PGH_EVENTS_SOURCE,
            Source::Eventbrite => EVENTBRITE_SOURCE,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One listing as pulled off a page, before cleaning. `None` means the value
/// could not be recovered and is persisted as the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventRecord {
    pub event_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub url: Option<String>,
    source: Source,
}

impl RawEventRecord {
    pub fn new(source: Source) -> Self {
        Self {
            event_name: None,
            date: None,
            time: None,
            location: None,
            price: None,
            url: None,
            source,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// A cleaned record: the name is guaranteed present and not the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event_name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub url: Option<String>,
    source: Source,
}

impl EventRecord {
    /// Promote a raw record, or `None` when its name is missing.
    pub fn from_raw(raw: RawEventRecord) -> Option<Self> {
        let event_name = raw.event_name?;
        Some(Self {
            event_name,
            date: raw.date,
            time: raw.time,
            location: raw.location,
            price: raw.price,
            url: raw.url,
            source: raw.source,
        })
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn date_text(&self) -> String {
        format_date(self.date)
    }

    pub fn time_text(&self) -> String {
        format_time(self.time)
    }
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| SENTINEL.to_string())
}

pub fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| SENTINEL.to_string())
}

/// Core trait that both event sources implement
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    fn source(&self) -> Source;

    /// Walk the source and return every record it yields. Per-page and
    /// per-detail transport failures are logged and skipped, never returned.
    async fn collect(&self, ctx: &ScrapeContext) -> Result<Vec<RawEventRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_formatting() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_time(None), "N/A");
        let t = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert_eq!(format_time(Some(t)), "06:00 PM");
    }

    #[test]
    fn unnamed_raw_record_is_not_promoted() {
        let raw = RawEventRecord::new(Source::Eventbrite);
        assert!(EventRecord::from_raw(raw).is_none());
    }

    #[test]
    fn promotion_keeps_source() {
        let mut raw = RawEventRecord::new(Source::PghEvents);
        raw.event_name = Some("Jazz Night".into());
        let record = EventRecord::from_raw(raw).unwrap();
        assert_eq!(record.source(), Source::PghEvents);
        assert_eq!(record.source().label(), "pgh.events");
    }
}
