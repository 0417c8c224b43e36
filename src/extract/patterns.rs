//! Compiled regex patterns and CSS selectors shared by the extractors and
//! source adapters. All of them are constants, compiled once on first use.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid regex {pattern:?}: {e}"))
}

// --- date/time ---------------------------------------------------------------

pub static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));
pub static TIME_WITH_DATETIME: Lazy<Selector> = Lazy::new(|| selector("time[datetime]"));
pub static LD_JSON: Lazy<Selector> =
    Lazy::new(|| selector("script[type='application/ld+json']"));

/// `"startDate": "2026-03-12T18:00:00"` anywhere in the raw document.
pub static ISO_START_DATE: Lazy<Regex> = Lazy::new(|| {
    regex(r#""startDate"\s*:\s*"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})"#)
});

/// Trailing `+HHMM` / `-HHMM` offset as used by pgh.events.
pub static TZ_OFFSET_SUFFIX: Lazy<Regex> = Lazy::new(|| regex(r"[+-]\d{4}$"));

/// Weekday-prefixed month/day with optional year, e.g. `Thursday, March 12, 2026`.
pub static HUMAN_DATE: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?i)\b(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s*(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s*(\d{4}))?",
    )
});

pub static HUMAN_TIME: Lazy<Regex> = Lazy::new(|| regex(r"(?i)\b(\d{1,2}:\d{2}\s*(?:AM|PM))\b"));

// --- location ----------------------------------------------------------------

/// Venue selectors, most specific first.
pub static VENUE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "[data-spec='venue-name']",
        "[class*='venue-name']",
        "[class*='location-info__address']",
        "address",
    ]
    .into_iter()
    .map(selector)
    .collect()
});

pub static TEXT_BEARING: Lazy<Selector> = Lazy::new(|| selector("p, span, div, address"));

pub static LETTER_DIGIT: Lazy<Regex> = Lazy::new(|| regex(r"([A-Za-z])(\d)"));

/// A run of 1-6 digits after whitespace and before whitespace or the end, the
/// start of a street address. A leading number is left alone.
pub static STANDALONE_NUMBER: Lazy<Regex> = Lazy::new(|| regex(r"\s+\d{1,6}(?:\s+|$)"));

pub static STREET_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    regex(r"(?i)\s+(?:road|rd|street|st|avenue|ave|boulevard|blvd|drive|dr|lane|ln|way)\.?$")
});

// --- price -------------------------------------------------------------------

pub static PRICE: Lazy<Selector> = Lazy::new(|| selector("[class*='price']"));
pub static COST: Lazy<Selector> = Lazy::new(|| selector("[class*='cost']"));
pub static TICKET_PRICE: Lazy<Selector> = Lazy::new(|| selector("[class*='ticket-price']"));
pub static CONVERSION_BAR: Lazy<Selector> = Lazy::new(|| selector("[class*='conversion-bar']"));

pub static PRICE_FALLBACK: Lazy<Regex> = Lazy::new(|| regex(r"(?i)(\bfree\b|\$[\d,.]+)"));

// --- page structure ----------------------------------------------------------

pub static DAY_BLOCK: Lazy<Selector> = Lazy::new(|| selector("[class*='day-module--day']"));
pub static EVENT_CARD: Lazy<Selector> = Lazy::new(|| selector("[class*='event-module--event']"));
pub static MAIN_LINK: Lazy<Selector> = Lazy::new(|| selector("[class*='event-module--mainLink']"));
pub static ANCHOR_WITH_HREF: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
pub static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));

pub static EVENT_LINK: Lazy<Selector> = Lazy::new(|| selector("a[href*='/e/']"));
pub static HEADING: Lazy<Selector> = Lazy::new(|| selector("h1"));
pub static EVENT_TITLE: Lazy<Selector> = Lazy::new(|| selector("[class*='event-title']"));
