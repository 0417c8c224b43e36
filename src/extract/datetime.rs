//! Event start date/time recovery.
//!
//! Strategies, most reliable first:
//! 1. a `<time datetime>` attribute parsed as ISO-8601,
//! 2. a `startDate` field in an embedded JSON-LD block,
//! 3. a `"startDate": "..."` fragment anywhere in the raw document,
//! 4. weekday/month/day and `H:MM AM/PM` patterns in the visible text.

use super::cascade::{first_success, Strategy};
use super::patterns::{
    HUMAN_DATE, HUMAN_TIME, ISO_START_DATE, LD_JSON, TIME_WITH_DATETIME, TZ_OFFSET_SUFFIX,
};
use super::text::visible_text;
use crate::types::{format_date, format_time};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use scraper::Html;
use serde_json::Value;
use tracing::debug;

/// Recovered start of an event. Either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTiming {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl EventTiming {
    pub fn unknown() -> Self {
        Self::default()
    }

    fn at(instant: NaiveDateTime) -> Self {
        Self {
            date: Some(instant.date()),
            time: Some(instant.time()),
        }
    }

    pub fn date_text(&self) -> String {
        format_date(self.date)
    }

    pub fn time_text(&self) -> String {
        format_time(self.time)
    }
}

struct DatePage<'a> {
    document: &'a Html,
    raw_html: &'a str,
    default_year: i32,
}

/// Recover the start date/time of the event described by `document`.
/// Falls back to the current year when the page text omits one.
pub fn extract_date_time(document: &Html, raw_html: &str) -> EventTiming {
    extract_date_time_in_year(document, raw_html, Local::now().year())
}

pub fn extract_date_time_in_year(document: &Html, raw_html: &str, default_year: i32) -> EventTiming {
    let page = DatePage {
        document,
        raw_html,
        default_year,
    };
    let strategies: [Strategy<DatePage<'_>, EventTiming>; 4] = [
        Strategy::new("time_element", from_time_element),
        Strategy::new("json_ld", from_json_ld),
        Strategy::new("raw_start_date", from_raw_start_date),
        Strategy::new("page_text", from_page_text),
    ];

    match first_success("datetime", &page, &strategies) {
        Some((strategy, timing)) => {
            debug!(strategy, date = %timing.date_text(), time = %timing.time_text(), "recovered event timing");
            timing
        }
        None => EventTiming::unknown(),
    }
}

fn from_time_element(page: &DatePage<'_>) -> Option<EventTiming> {
    let raw = page
        .document
        .select(&TIME_WITH_DATETIME)
        .next()?
        .value()
        .attr("datetime")?;
    parse_iso_instant(raw).map(EventTiming::at)
}

fn from_json_ld(page: &DatePage<'_>) -> Option<EventTiming> {
    page.document.select(&LD_JSON).find_map(|script| {
        let body = script.text().collect::<String>();
        let data: Value = serde_json::from_str(body.trim()).ok()?;
        let start = ld_start_date(&data)?;
        parse_iso_instant(start).map(EventTiming::at)
    })
}

/// `startDate` of a JSON-LD object, of the first object carrying one in an
/// array, or inside an `@graph` wrapper.
fn ld_start_date(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => match map.get("startDate").and_then(Value::as_str) {
            Some(start) if !start.trim().is_empty() => Some(start),
            _ => map.get("@graph").and_then(ld_start_date),
        },
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::Object(_) => ld_start_date(item),
            _ => None,
        }),
        _ => None,
    }
}

fn from_raw_start_date(page: &DatePage<'_>) -> Option<EventTiming> {
    let caps = ISO_START_DATE.captures(page.raw_html)?;
    parse_iso_instant(caps.get(1)?.as_str()).map(EventTiming::at)
}

fn from_page_text(page: &DatePage<'_>) -> Option<EventTiming> {
    let text = visible_text(page.document);
    let timing = EventTiming {
        date: find_human_date(&text, page.default_year),
        time: find_human_time(&text),
    };
    (timing != EventTiming::unknown()).then_some(timing)
}

fn find_human_date(text: &str, default_year: i32) -> Option<NaiveDate> {
    let caps = HUMAN_DATE.captures(text)?;
    let month = month_number(caps.get(1)?.as_str())?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year = match caps.get(3) {
        Some(year) => year.as_str().parse().ok()?,
        None => default_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn find_human_time(text: &str) -> Option<NaiveTime> {
    let caps = HUMAN_TIME.captures(text)?;
    let compact: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    NaiveTime::parse_from_str(&compact, "%I:%M%p").ok()
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse an ISO-8601 timestamp, keeping its own wall-clock time. A trailing
/// `Z` is read as `+00:00`; a bare date is read as midnight.
pub fn parse_iso_instant(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// pgh.events stamps cards as `YYYY-MM-DDTHH:MM:SS±HHMM` and never uses `Z`.
/// The offset is dropped and the local wall-clock time kept.
pub fn parse_offset_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let stripped = TZ_OFFSET_SUFFIX.replace(raw, "");
    NaiveDateTime::parse_from_str(&stripped, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Date from the first ten characters of a `datetime` attribute.
pub fn leading_date(raw: &str) -> Option<NaiveDate> {
    let head: String = raw.trim().chars().take(10).collect();
    NaiveDate::parse_from_str(&head, "%Y-%m-%d").ok()
}

/// Timing of a pgh.events card: the card's own timestamp when it parses, its
/// date prefix when only that does, else the enclosing day block's date.
pub fn card_timing(card_datetime: Option<&str>, day_date: Option<NaiveDate>) -> EventTiming {
    let Some(raw) = card_datetime.filter(|raw| raw.contains('T')) else {
        return EventTiming {
            date: day_date,
            time: None,
        };
    };
    match parse_offset_timestamp(raw) {
        Some(instant) => EventTiming::at(instant),
        None => EventTiming {
            date: leading_date(raw).or(day_date),
            time: None,
        },
    }
}
