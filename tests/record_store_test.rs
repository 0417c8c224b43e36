use anyhow::Result;
use burgh_events::error::ScraperError;
use burgh_events::query::EventQuery;
use burgh_events::storage::{load_records, RecordStore};
use burgh_events::types::{EventRecord, RawEventRecord, Source};
use chrono::{NaiveDate, NaiveTime};
use tempfile::tempdir;

fn record(name: &str, day: u32, price: &str) -> EventRecord {
    let mut raw = RawEventRecord::new(Source::Eventbrite);
    raw.event_name = Some(name.to_string());
    raw.date = NaiveDate::from_ymd_opt(2026, 3, day);
    raw.time = NaiveTime::from_hms_opt(20, 0, 0);
    raw.location = Some("Stage AE".to_string());
    raw.price = Some(price.to_string());
    EventRecord::from_raw(raw).unwrap()
}

#[test]
fn missing_columns_fail_the_load() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("events.csv");
    std::fs::write(&path, "event_name,date,time,location\nJazz,2026-03-01,N/A,Hall\n")?;

    match load_records(&path) {
        Err(ScraperError::Schema { missing }) => {
            assert_eq!(missing, vec!["price", "source", "url"]);
        }
        other => panic!("expected schema failure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn written_store_feeds_the_query_layer() -> Result<()> {
    let dir = tempdir()?;
    let store = RecordStore::new(dir.path().join("nested/dir/events.csv"));
    let summary = store.write(&[
        record("Late Show", 20, "$40"),
        record("Cheap Show", 3, "$12.50"),
        record("Free Show", 4, "Free"),
        record("Mystery Price", 5, "Donation"),
    ])?;
    assert_eq!(summary.records, 4);
    assert_eq!(summary.sha256.len(), 64);

    let rows = store.load()?;
    let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let query = EventQuery {
        max_price: Some(15.0),
        ..EventQuery::upcoming()
    };
    let names: Vec<_> = query
        .apply(&rows, today)
        .into_iter()
        .map(|r| r.event_name)
        .collect();
    assert_eq!(names, vec!["Cheap Show", "Free Show"]);
    Ok(())
}
