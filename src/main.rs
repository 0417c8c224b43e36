use anyhow::{Context, Result};
use burgh_events::apis::factory::{all_sources, parse_source_list};
use burgh_events::config::Config;
use burgh_events::constants;
use burgh_events::logging;
use burgh_events::pipeline::cleaner::Cleaner;
use burgh_events::pipeline::context::ScrapeContext;
use burgh_events::pipeline::Pipeline;
use burgh_events::query::{EventQuery, DEFAULT_HORIZON_DAYS};
use burgh_events::storage::RecordStore;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "burgh_events")]
#[command(about = "Pittsburgh event listing scraper")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a config.toml (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every source, clean the result and replace the record store
    Scrape {
        /// Sources to run (comma-separated). Available: pgh_events, eventbrite
        #[arg(long)]
        sources: Option<String>,
        /// Override the configured output path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List stored events, soonest first
    List {
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Maximum price in dollars; free events count as 0
        #[arg(long)]
        max_price: Option<f64>,
        /// Days ahead of today to include
        #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
        horizon_days: u64,
        /// Maximum rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the available sources
    Sources,
}

async fn run_scrape(config: &Config, sources: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let sources = match sources {
        Some(list) => parse_source_list(&list)?,
        None => all_sources(),
    };
    let ctx = ScrapeContext::from_config(config).context("failed to build scrape context")?;
    let cleaner = Cleaner::from_config(config)?;
    let store = RecordStore::new(output.unwrap_or_else(|| config.output_path.clone()));

    let result = Pipeline::run(&sources, &ctx, &cleaner, &store).await?;

    println!("\n📊 Run {}:", result.run_id);
    for summary in &result.sources {
        match &summary.error {
            Some(e) => println!("   {}: failed ({})", summary.source, e),
            None => println!("   {}: {} raw records", summary.source, summary.raw_records),
        }
    }
    println!("   Unnamed dropped: {}", result.report.dropped_unnamed);
    println!("   Duplicates dropped: {}", result.report.duplicates);
    println!("   Saved: {}", result.report.output);
    println!("   Output file: {}", result.output_file.display());
    println!("   SHA-256: {}", result.sha256);

    let failed = result.sources.iter().filter(|s| s.error.is_some()).count();
    if failed > 0 {
        warn!("{} source(s) failed during the run", failed);
    }
    Ok(())
}

fn run_list(config: &Config, query: EventQuery, limit: Option<usize>) -> Result<()> {
    let store = RecordStore::new(config.output_path.clone());
    let events = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?;
    let today = Local::now().date_naive();
    let matches = query.apply(&events, today);
    info!("{} of {} stored events match", matches.len(), events.len());

    for event in matches.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{}  {:>8}  {:<40}  {:<30}  {:<8}  {}",
            event.date, event.time, event.event_name, event.location, event.price, event.source
        );
    }
    println!("\n{} event(s)", matches.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _guard = logging::init_logging(&config.log_dir);

    match cli.command {
        Commands::Scrape { sources, output } => {
            println!("🔄 Running scrape pipeline...");
            if let Err(e) = run_scrape(&config, sources, output).await {
                error!("Scrape failed: {:#}", e);
                return Err(e);
            }
            println!("✅ Scrape completed successfully");
        }
        Commands::List {
            from,
            to,
            max_price,
            horizon_days,
            limit,
        } => {
            let query = EventQuery {
                from,
                to,
                max_price,
                horizon_days: Some(horizon_days),
            };
            run_list(&config, query, limit)?;
        }
        Commands::Sources => {
            println!("Available sources:");
            for name in constants::get_supported_sources() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
