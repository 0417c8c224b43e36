// Scrape pipeline: adapters -> cleaner -> record store

pub mod cleaner;
pub mod context;
pub mod overrides;

use crate::error::Result;
use crate::storage::RecordStore;
use crate::types::{EventSource, RawEventRecord};
use cleaner::{Cleaner, CleaningReport, RecordTable};
use context::ScrapeContext;
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// How one adapter fared during a run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub raw_records: usize,
    pub error: Option<String>,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub sources: Vec<SourceSummary>,
    pub report: CleaningReport,
    pub output_file: PathBuf,
    pub sha256: String,
    pub duration_secs: f64,
}

impl PipelineResult {
    pub fn total_raw(&self) -> usize {
        self.sources.iter().map(|s| s.raw_records).sum()
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Run every adapter in order, collecting whatever each yields. An adapter
    /// error is recorded in its summary and the run carries on.
    pub async fn collect_all(
        sources: &[Box<dyn EventSource>],
        ctx: &ScrapeContext,
    ) -> (Vec<Vec<RawEventRecord>>, Vec<SourceSummary>) {
        let mut batches = Vec::with_capacity(sources.len());
        let mut summaries = Vec::with_capacity(sources.len());

        for source in sources {
            let label = source.source().label();
            info!("🚀 Starting {}", label);
            println!("🚀 Starting {}", label);
            let t_source = Instant::now();

            match source.collect(ctx).await {
                Ok(records) => {
                    counter!("burgh_records_extracted_total", "source" => source.source().cli_name())
                        .increment(records.len() as u64);
                    histogram!("burgh_source_duration_seconds", "source" => source.source().cli_name())
                        .record(t_source.elapsed().as_secs_f64());
                    info!("✅ {} yielded {} raw records", label, records.len());
                    println!("✅ {} yielded {} raw records", label, records.len());
                    summaries.push(SourceSummary {
                        source: label.to_string(),
                        raw_records: records.len(),
                        error: None,
                    });
                    batches.push(records);
                }
                Err(e) => {
                    error!("{} failed: {}", label, e);
                    println!("❌ {} failed: {}", label, e);
                    summaries.push(SourceSummary {
                        source: label.to_string(),
                        raw_records: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        (batches, summaries)
    }

    /// Collect, clean and persist. The record store is replaced only after
    /// every adapter has finished.
    #[instrument(skip_all, fields(output = %store.path().display()))]
    pub async fn run(
        sources: &[Box<dyn EventSource>],
        ctx: &ScrapeContext,
        cleaner: &Cleaner,
        store: &RecordStore,
    ) -> Result<PipelineResult> {
        let run_id = Uuid::new_v4();
        let t_pipeline = Instant::now();
        info!(%run_id, "🚀 Starting scrape run over {} source(s)", sources.len());

        let (batches, summaries) = Self::collect_all(sources, ctx).await;

        info!("🔧 Cleaning records...");
        println!("🔧 Cleaning records...");
        let (table, report) = cleaner.aggregate(batches);

        let written = Self::persist(&table, store)?;
        println!("💾 Saved {} events to {}", written.records, written.path.display());

        let duration_secs = t_pipeline.elapsed().as_secs_f64();
        histogram!("burgh_pipeline_duration_seconds").record(duration_secs);
        counter!("burgh_pipeline_runs_total").increment(1);
        info!(%run_id, sha256 = %written.sha256, "🏁 Run finished in {:.1}s", duration_secs);

        Ok(PipelineResult {
            run_id,
            sources: summaries,
            report,
            output_file: written.path,
            sha256: written.sha256,
            duration_secs,
        })
    }

    fn persist(table: &RecordTable, store: &RecordStore) -> Result<crate::storage::WriteSummary> {
        store.write(table.records())
    }
}
