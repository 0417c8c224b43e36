mod common;

use anyhow::Result;
use burgh_events::apis::pgh_events::PghEventsSource;
use burgh_events::pipeline::context::CancelSignal;
use burgh_events::types::{format_date, format_time, EventSource};
use common::*;
use std::sync::Arc;

#[tokio::test]
async fn walk_stops_at_a_page_without_day_blocks() -> Result<()> {
    let http = Arc::new(
        FakeHttp::new()
            .page("https://pgh.events/", PGH_PAGE_1)
            .page("https://pgh.events/?page=2", EMPTY_PAGE)
            .page("https://pgh.events/?page=3", PGH_PAGE_2),
    );

    let records = PghEventsSource::new().collect(&context(http.clone())).await?;

    assert_eq!(records.len(), 4);
    assert_eq!(
        http.requests(),
        vec!["https://pgh.events/".to_string(), "https://pgh.events/?page=2".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn failed_page_is_skipped_and_walk_continues() -> Result<()> {
    let http = Arc::new(
        FakeHttp::new()
            .status("https://pgh.events/", 502)
            .page("https://pgh.events/?page=2", PGH_PAGE_2)
            .page("https://pgh.events/?page=3", EMPTY_PAGE),
    );

    let records = PghEventsSource::new().collect(&context(http.clone())).await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].event_name.as_deref(), Some("Jazz Night"));
    assert_eq!(format_date(records[0].date), "2026-02-22");
    assert_eq!(format_time(records[0].time), "07:00 PM");
    assert_eq!(http.requests().len(), 3);
    Ok(())
}

#[tokio::test]
async fn never_walks_past_the_page_limit() -> Result<()> {
    let http = Arc::new(
        FakeHttp::new()
            .page("https://pgh.events/", PGH_PAGE_2)
            .page("https://pgh.events/?page=2", PGH_PAGE_2)
            .page("https://pgh.events/?page=3", PGH_PAGE_2)
            .page("https://pgh.events/?page=4", PGH_PAGE_2),
    );

    let records = PghEventsSource::new().collect(&context(http.clone())).await?;

    assert_eq!(records.len(), 3);
    assert!(!http.requests().iter().any(|u| u.ends_with("page=4")));
    Ok(())
}

#[tokio::test]
async fn abort_mid_walk_keeps_pages_already_fetched() -> Result<()> {
    let signal = CancelSignal::new();
    let http = Arc::new(
        FakeHttp::new()
            .page("https://pgh.events/", PGH_PAGE_1)
            .page("https://pgh.events/?page=2", PGH_PAGE_2)
            .page("https://pgh.events/?page=3", PGH_PAGE_2)
            .abort_on("https://pgh.events/?page=2", signal.clone()),
    );
    let ctx = context(http.clone()).with_cancel(signal);

    let records = PghEventsSource::new().collect(&ctx).await?;

    assert_eq!(records.len(), 5);
    assert!(!http.requests().iter().any(|u| u.ends_with("page=3")));
    Ok(())
}
