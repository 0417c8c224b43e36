//! "First success wins" driver shared by the date, location and price
//! extractors. Each strategy is a named pure function returning `None` when it
//! cannot produce a value; the cascade stops at the first `Some`.

use tracing::trace;

pub struct Strategy<I, T> {
    pub name: &'static str,
    pub run: fn(&I) -> Option<T>,
}

impl<I, T> Strategy<I, T> {
    pub const fn new(name: &'static str, run: fn(&I) -> Option<T>) -> Self {
        Self { name, run }
    }
}

/// Run `strategies` in order against `input`, returning the first hit and the
/// name of the strategy that produced it.
pub fn first_success<I, T>(
    extractor: &'static str,
    input: &I,
    strategies: &[Strategy<I, T>],
) -> Option<(&'static str, T)> {
    for strategy in strategies {
        if let Some(value) = (strategy.run)(input) {
            trace!(extractor, strategy = strategy.name, "strategy matched");
            return Some((strategy.name, value));
        }
        trace!(extractor, strategy = strategy.name, "strategy missed, falling through");
    }
    None
}
