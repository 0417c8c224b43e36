use super::{absolute_url, strip_query};
use crate::constants::{EVENTBRITE_BASE_URL, EVENTBRITE_LISTING_URL, MAX_PAGES};
use crate::error::{Result, ScraperError};
use crate::extract::patterns::{EVENT_LINK, EVENT_TITLE, HEADING};
use crate::extract::text::element_text;
use crate::extract::{extract_date_time, extract_location, extract_price, LocationCleaner, PriceRules};
use crate::pipeline::context::ScrapeContext;
use crate::types::{EventSource, RawEventRecord, Source};
use metrics::counter;
use scraper::Html;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

type DetailJob = (usize, String);

/// Eventbrite city listings. Listing pages only carry links; every field comes
/// from the event's own detail page, fetched by a pool of workers while
/// discovery is still walking the listing.
#[derive(Debug, Default)]
pub struct EventbriteSource;

impl EventbriteSource {
    pub fn new() -> Self {
        Self
    }

    pub fn listing_url(page: u32) -> String {
        if page <= 1 {
            EVENTBRITE_LISTING_URL.to_string()
        } else {
            format!("{EVENTBRITE_LISTING_URL}?page={page}")
        }
    }

    /// Walk the listing pages, queueing each newly seen detail link in
    /// discovery order. Returns how many links were queued.
    async fn discover(&self, ctx: &ScrapeContext, queue: mpsc::Sender<DetailJob>) -> usize {
        let mut seen: HashSet<String> = HashSet::new();

        for page in 1..=MAX_PAGES {
            if ctx.is_cancelled() {
                warn!("Run cancelled, stopping Eventbrite discovery at page {}", page);
                break;
            }
            let url = Self::listing_url(page);
            info!("📡 [Eventbrite] Fetching listing page {}: {}", page, url);

            let html = match ctx.fetch_page(Source::Eventbrite, &url).await {
                Ok(html) => html,
                Err(ScraperError::Cancelled) => {
                    warn!("Run cancelled, stopping Eventbrite discovery at page {}", page);
                    break;
                }
                Err(e) => {
                    warn!("Skipping Eventbrite listing page {}: {}", page, e);
                    continue;
                }
            };

            let mut queued = 0;
            for link in parse_listing_links(&html) {
                if !seen.insert(link.clone()) {
                    continue;
                }
                if queue.send((seen.len() - 1, link)).await.is_err() {
                    warn!("Detail workers are gone, stopping discovery");
                    return seen.len();
                }
                queued += 1;
            }
            info!("✅ [Eventbrite] {} new links on page {}", queued, page);
        }

        seen.len()
    }
}

#[async_trait::async_trait]
impl EventSource for EventbriteSource {
    fn source(&self) -> Source {
        Source::Eventbrite
    }

    #[instrument(skip(self, ctx))]
    async fn collect(&self, ctx: &ScrapeContext) -> Result<Vec<RawEventRecord>> {
        let (tx, rx) = mpsc::channel::<DetailJob>(ctx.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));
        let results: Arc<Mutex<Vec<(usize, RawEventRecord)>>> = Arc::new(Mutex::new(Vec::new()));

        let mut workers = JoinSet::new();
        for worker in 0..ctx.detail_workers {
            workers.spawn(detail_worker(worker, ctx.clone(), rx.clone(), results.clone()));
        }

        let discovered = self.discover(ctx, tx).await;
        info!("🔎 [Eventbrite] {} detail links discovered", discovered);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!("Eventbrite detail worker failed: {}", e);
            }
        }

        let mut indexed = std::mem::take(&mut *results.lock().await);
        indexed.sort_by_key(|(index, _)| *index);
        let records: Vec<RawEventRecord> = indexed.into_iter().map(|(_, record)| record).collect();

        info!(
            "📋 [Eventbrite] Total: {} raw records ({} detail pages skipped)",
            records.len(),
            discovered.saturating_sub(records.len())
        );
        Ok(records)
    }
}

/// Pull jobs until the queue closes. Once the run is cancelled the worker keeps
/// draining the queue without fetching so discovery never blocks on a full channel.
async fn detail_worker(
    worker: usize,
    ctx: ScrapeContext,
    queue: Arc<Mutex<mpsc::Receiver<DetailJob>>>,
    results: Arc<Mutex<Vec<(usize, RawEventRecord)>>>,
) {
    loop {
        let job = queue.lock().await.recv().await;
        let Some((index, url)) = job else {
            break;
        };
        if ctx.is_cancelled() {
            debug!(worker, index, "cancelled, not fetching {}", url);
            continue;
        }

        match ctx.fetch_page(Source::Eventbrite, &url).await {
            Ok(html) => {
                let record = parse_detail_page(&html, &url, ctx.location_cleaner());
                counter!("burgh_detail_pages_parsed_total").increment(1);
                results.lock().await.push((index, record));
            }
            Err(ScraperError::Cancelled) => {
                debug!(worker, index, "cancelled, not fetching {}", url);
            }
            Err(e) => {
                warn!("Skipping Eventbrite detail page {}: {}", url, e);
            }
        }
    }
    debug!(worker, "detail worker finished");
}

/// Detail links on a listing page, query strings removed, in page order and
/// without repeats.
pub fn parse_listing_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links: Vec<String> = Vec::new();
    for anchor in document.select(&EVENT_LINK) {
        let Some(link) = anchor
            .value()
            .attr("href")
            .and_then(|href| absolute_url(EVENTBRITE_BASE_URL, href))
            .map(|link| strip_query(&link))
        else {
            continue;
        };
        if !links.contains(&link) {
            links.push(link);
        }
    }
    links
}

/// Run every extraction cascade over one event page.
pub fn parse_detail_page(html: &str, url: &str, locations: &LocationCleaner) -> RawEventRecord {
    let document = Html::parse_document(html);
    let mut record = RawEventRecord::new(Source::Eventbrite);

    record.event_name = document
        .select(&HEADING)
        .next()
        .and_then(element_text)
        .or_else(|| document.select(&EVENT_TITLE).next().and_then(element_text));

    let timing = extract_date_time(&document, html);
    record.date = timing.date;
    record.time = timing.time;

    record.location = extract_location(&document, locations);
    record.price = extract_price(document.root_element(), html, PriceRules::eventbrite());
    record.url = Some(url.to_string());

    record
}
