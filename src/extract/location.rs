//! Venue name recovery and address stripping.

use super::cascade::{first_success, Strategy};
use super::patterns::{LETTER_DIGIT, STANDALONE_NUMBER, STREET_SUFFIX, TEXT_BEARING, VENUE_SELECTORS};
use super::text::{clean_opt, element_text};
use crate::constants::DEFAULT_CITY;
use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::debug;

const MAX_SELECTOR_TEXT: usize = 100;
const MIN_CITY_TEXT: usize = 5;
const MAX_CITY_TEXT: usize = 80;

static DEFAULT_CLEANER: Lazy<LocationCleaner> = Lazy::new(|| {
    LocationCleaner::new(DEFAULT_CITY)
        .unwrap_or_else(|e| panic!("default city produced an invalid pattern: {e}"))
});

/// Address-stripping normalizer bound to one target city.
#[derive(Debug, Clone)]
pub struct LocationCleaner {
    city: String,
    city_suffix: Regex,
}

impl LocationCleaner {
    pub fn new(city: &str) -> Result<Self> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ScraperError::Config("city must not be empty".into()));
        }
        let city_suffix = Regex::new(&format!(r"(?i),?\s*{}.*$", regex::escape(city)))
            .map_err(|e| ScraperError::Config(format!("bad city pattern: {e}")))?;
        Ok(Self {
            city: city.to_string(),
            city_suffix,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Strip street numbers, the city/state tail and a trailing street type.
    /// `None` when nothing is left.
    pub fn clean(&self, text: &str) -> Option<String> {
        let text = clean_opt(text)?;
        let spaced = LETTER_DIGIT.replace_all(&text, "$1 $2");
        let truncated = match STANDALONE_NUMBER.find(&spaced) {
            Some(m) => &spaced[..m.start()],
            None => &spaced[..],
        };
        let without_city = self.city_suffix.replace(truncated, "");
        let without_street = STREET_SUFFIX.replace(without_city.trim(), "");
        clean_opt(&without_street)
    }

    fn mentions_city(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.city.to_lowercase())
    }
}

/// Clean a venue string against the default city.
pub fn clean_location(text: &str) -> Option<String> {
    DEFAULT_CLEANER.clean(text)
}

struct LocationPage<'a> {
    document: &'a Html,
    cleaner: &'a LocationCleaner,
}

/// Recover the venue of the event described by `document`.
pub fn extract_location(document: &Html, cleaner: &LocationCleaner) -> Option<String> {
    let page = LocationPage { document, cleaner };
    let strategies: [Strategy<LocationPage<'_>, String>; 2] = [
        Strategy::new("venue_selectors", from_venue_selectors),
        Strategy::new("city_mention", from_city_mention),
    ];
    let (strategy, raw) = first_success("location", &page, &strategies)?;
    let cleaned = cleaner.clean(&raw);
    debug!(strategy, raw = %raw, cleaned = ?cleaned, "recovered event location");
    cleaned
}

fn from_venue_selectors(page: &LocationPage<'_>) -> Option<String> {
    VENUE_SELECTORS.iter().find_map(|selector| {
        let element = page.document.select(selector).next()?;
        element_text(element).filter(|text| text.chars().count() < MAX_SELECTOR_TEXT)
    })
}

fn from_city_mention(page: &LocationPage<'_>) -> Option<String> {
    page.document
        .select(&TEXT_BEARING)
        .filter_map(element_text)
        .filter(|text| {
            let len = text.chars().count();
            len > MIN_CITY_TEXT && len < MAX_CITY_TEXT && page.cleaner.mentions_city(text)
        })
        .min_by_key(|text| text.chars().count())
}
