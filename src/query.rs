//! Downstream filtering over a loaded record store.

use crate::storage::StoredEvent;
use chrono::{Days, NaiveDate};
use std::cmp::Ordering;

/// Default look-ahead window for listing queries.
pub const DEFAULT_HORIZON_DAYS: u64 = 14;

/// `Free` -> 0, `$1,234.50` -> 1234.5, anything else -> `None`.
pub fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("free") {
        return Some(0.0);
    }
    let amount = text.strip_prefix('$')?.replace(',', "");
    amount.parse().ok()
}

#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub max_price: Option<f64>,
    /// Latest admissible date, in days after `today`.
    pub horizon_days: Option<u64>,
}

impl EventQuery {
    pub fn upcoming() -> Self {
        Self {
            horizon_days: Some(DEFAULT_HORIZON_DAYS),
            ..Self::default()
        }
    }

    fn filters_on_date(&self) -> bool {
        self.from.is_some() || self.to.is_some() || self.horizon_days.is_some()
    }

    /// Filter and sort `events`. Undated rows drop out once any date bound
    /// applies; unpriced rows drop out only under a price cap.
    pub fn apply(&self, events: &[StoredEvent], today: NaiveDate) -> Vec<StoredEvent> {
        let horizon = self
            .horizon_days
            .and_then(|days| today.checked_add_days(Days::new(days)));

        let mut kept: Vec<StoredEvent> = events
            .iter()
            .filter(|event| {
                let date = event.date();
                if self.filters_on_date() {
                    let Some(date) = date else {
                        return false;
                    };
                    if self.from.is_some_and(|from| date < from)
                        || self.to.is_some_and(|to| date > to)
                        || horizon.is_some_and(|limit| date > limit)
                    {
                        return false;
                    }
                }
                match self.max_price {
                    Some(cap) => event.price_value().is_some_and(|price| price <= cap),
                    None => true,
                }
            })
            .cloned()
            .collect();

        kept.sort_by(compare_listing_order);
        kept
    }
}

/// Date, then time, then name; missing dates and times sort last.
fn compare_listing_order(a: &StoredEvent, b: &StoredEvent) -> Ordering {
    fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
    missing_last(a.date(), b.date())
        .then_with(|| missing_last(a.time(), b.time()))
        .then_with(|| a.event_name.cmp(&b.event_name))
}
