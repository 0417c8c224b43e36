use crate::apis::eventbrite::EventbriteSource;
use crate::apis::pgh_events::PghEventsSource;
use crate::constants::*;
use crate::error::{Result, ScraperError};
use crate::types::EventSource;

/// Factory function to create an adapter from its command-line name
pub fn create_source(name: &str) -> Option<Box<dyn EventSource>> {
    match name.trim() {
        PGH_EVENTS_SOURCE => Some(Box::new(PghEventsSource::new())),
        EVENTBRITE_SOURCE => Some(Box::new(EventbriteSource::new())),
        _ => None,
    }
}

/// Every adapter, in aggregation order.
pub fn all_sources() -> Vec<Box<dyn EventSource>> {
    get_supported_sources()
        .into_iter()
        .filter_map(create_source)
        .collect()
}

/// Parse a comma-separated list such as `pgh_events,eventbrite`. Order is
/// kept because it decides which duplicate survives aggregation.
pub fn parse_source_list(list: &str) -> Result<Vec<Box<dyn EventSource>>> {
    let mut sources: Vec<Box<dyn EventSource>> = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let source = create_source(name).ok_or_else(|| ScraperError::UnknownSource(name.to_string()))?;
        if sources.iter().any(|s| s.source() == source.source()) {
            continue;
        }
        sources.push(source);
    }
    if sources.is_empty() {
        return Err(ScraperError::Config("no sources selected".into()));
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    #[test]
    fn known_names() {
        assert_eq!(create_source("pgh_events").map(|s| s.source()), Some(Source::PghEvents));
        assert_eq!(create_source("eventbrite").map(|s| s.source()), Some(Source::Eventbrite));
        assert!(create_source("meetup").is_none());
    }

    #[test]
    fn all_sources_in_aggregation_order() {
        let order: Vec<_> = all_sources().iter().map(|s| s.source()).collect();
        assert_eq!(order, vec![Source::PghEvents, Source::Eventbrite]);
    }

    #[test]
    fn list_keeps_order_and_drops_repeats() {
        let sources = parse_source_list("eventbrite, pgh_events,eventbrite").unwrap();
        let order: Vec<_> = sources.iter().map(|s| s.source()).collect();
        assert_eq!(order, vec![Source::Eventbrite, Source::PghEvents]);
    }

    #[test]
    fn unknown_and_empty_lists_fail() {
        assert!(matches!(parse_source_list("pgh_events,meetup"), Err(ScraperError::UnknownSource(n)) if n == "meetup"));
        assert!(matches!(parse_source_list(" , "), Err(ScraperError::Config(_))));
    }
}
