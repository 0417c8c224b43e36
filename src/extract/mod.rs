//! Degraded-information extraction: each extractor is an ordered list of
//! strategies, each less reliable than the last.

pub mod cascade;
pub mod datetime;
pub mod location;
pub mod patterns;
pub mod price;
pub mod text;

pub use datetime::{extract_date_time, EventTiming};
pub use location::{clean_location, extract_location, LocationCleaner};
pub use price::{extract_price, strip_trailing_periods, PriceRules};
pub use text::clean;
