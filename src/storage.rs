use crate::constants::{RECORD_COLUMNS, SENTINEL};
use crate::error::{Result, ScraperError};
use crate::types::{EventRecord, DATE_FORMAT, TIME_FORMAT};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One persisted row. Every field is text; absent values hold the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub event_name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub price: String,
    pub source: String,
    pub url: String,
}

impl StoredEvent {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), TIME_FORMAT).ok()
    }

    pub fn price_value(&self) -> Option<f64> {
        crate::query::parse_price(&self.price)
    }

    fn trimmed(self) -> Self {
        Self {
            event_name: self.event_name.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
            price: self.price.trim().to_string(),
            source: self.source.trim().to_string(),
            url: self.url.trim().to_string(),
        }
    }
}

impl From<&EventRecord> for StoredEvent {
    fn from(record: &EventRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| SENTINEL.to_string());
        Self {
            event_name: record.event_name.clone(),
            date: record.date_text(),
            time: record.time_text(),
            location: text(&record.location),
            price: text(&record.price),
            source: record.source().label().to_string(),
            url: text(&record.url),
        }
    }
}

/// What a write produced.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub records: usize,
    pub sha256: String,
}

/// The canonical flat record store: one CSV file, replaced wholesale per run.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the store's contents. Written to a sibling temp file first so
    /// readers never see a half-written table.
    pub fn write(&self, records: &[EventRecord]) -> Result<WriteSummary> {
        let bytes = to_csv_bytes(records)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "records.csv".into());
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &self.path)?;

        let sha256 = hex::encode(Sha256::digest(&bytes));
        info!("💾 Saved {} records to {}", records.len(), self.path.display());
        debug!(sha256 = %sha256, bytes = bytes.len(), "record store digest");
        Ok(WriteSummary {
            path: self.path.clone(),
            records: records.len(),
            sha256,
        })
    }

    pub fn load(&self) -> Result<Vec<StoredEvent>> {
        load_records(&self.path)
    }
}

/// Serialize `records` as UTF-8 CSV with a byte-order mark and the fixed
/// column order.
pub fn to_csv_bytes(records: &[EventRecord]) -> Result<Vec<u8>> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        writer.write_record(RECORD_COLUMNS)?;
        for record in records {
            writer.serialize(StoredEvent::from(record))?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Read a record store back, validating that every required column exists.
/// A missing column is a schema failure; rows with an empty name are skipped.
pub fn load_records(path: &Path) -> Result<Vec<StoredEvent>> {
    let bytes = fs::read(path)?;
    parse_records(&bytes)
}

pub fn parse_records(bytes: &[u8]) -> Result<Vec<StoredEvent>> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(body);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = RECORD_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h.trim() == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ScraperError::Schema { missing });
    }

    let mut rows = Vec::new();
    for row in reader.deserialize::<StoredEvent>() {
        let row = row?.trimmed();
        if row.event_name.is_empty() {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawEventRecord, Source};

    fn record(name: &str) -> EventRecord {
        let mut raw = RawEventRecord::new(Source::PghEvents);
        raw.event_name = Some(name.to_string());
        raw.date = NaiveDate::from_ymd_opt(2026, 3, 12);
        raw.time = NaiveTime::from_hms_opt(18, 0, 0);
        raw.price = Some("$10".into());
        EventRecord::from_raw(raw).unwrap()
    }

    #[test]
    fn header_and_sentinels() {
        let bytes = to_csv_bytes(&[record("Jazz Night")]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("event_name,date,time,location,price,source,url"));
        assert_eq!(
            lines.next(),
            Some("Jazz Night,2026-03-12,06:00 PM,N/A,$10,pgh.events,N/A")
        );
    }

    #[test]
    fn empty_table_still_has_header() {
        let rows = parse_records(&to_csv_bytes(&[]).unwrap()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn non_ascii_survives() {
        let bytes = to_csv_bytes(&[record("Café Tacuba en Concierto")]).unwrap();
        let rows = parse_records(&bytes).unwrap();
        assert_eq!(rows[0].event_name, "Café Tacuba en Concierto");
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = parse_records(b"event_name,date,location\nA,2026-01-01,X\n").unwrap_err();
        match err {
            ScraperError::Schema { missing } => {
                assert_eq!(missing, vec!["time", "price", "source", "url"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_names_are_skipped_and_fields_trimmed() {
        let csv = "event_name,date,time,location,price,source,url\n\
                   \" Gala \",2026-01-01,07:00 PM,Hall,$5,pgh.events,https://x\n\
                   ,2026-01-02,N/A,Hall,Free,pgh.events,N/A\n";
        let rows = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_name, "Gala");
        assert_eq!(rows[0].time(), NaiveTime::from_hms_opt(19, 0, 0));
    }
}
