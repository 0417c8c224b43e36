/// Source name constants to ensure consistency across the codebase.
/// The CLI names select adapters; the display names are what gets persisted.

// User-friendly source names (used in CLI)
pub const PGH_EVENTS_SOURCE: &str = "pgh_events";
pub const EVENTBRITE_SOURCE: &str = "eventbrite";

// Persisted provenance labels
pub const PGH_EVENTS_LABEL: &str = "pgh.events";
pub const EVENTBRITE_LABEL: &str = "Eventbrite";

// Origins and listing entry points
pub const PGH_EVENTS_BASE_URL: &str = "https://pgh.events";
pub const EVENTBRITE_BASE_URL: &str = "https://www.eventbrite.com";
pub const EVENTBRITE_LISTING_URL: &str = "https://www.eventbrite.com/d/pa--pittsburgh/all-events/";

/// Upper bound on listing pages walked per source.
pub const MAX_PAGES: u32 = 3;

/// Literal stand-in for a value that could not be recovered.
pub const SENTINEL: &str = "N/A";

pub const DEFAULT_CITY: &str = "Pittsburgh";

/// Persisted column order of the record store.
pub const RECORD_COLUMNS: [&str; 7] = [
    "event_name",
    "date",
    "time",
    "location",
    "price",
    "source",
    "url",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Get all supported user-friendly source names
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![PGH_EVENTS_SOURCE, EVENTBRITE_SOURCE]
}
