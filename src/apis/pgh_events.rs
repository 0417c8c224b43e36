use super::absolute_url;
use crate::constants::{MAX_PAGES, PGH_EVENTS_BASE_URL};
use crate::error::{Result, ScraperError};
use crate::extract::datetime::{card_timing, leading_date};
use crate::extract::patterns::{ANCHOR_WITH_HREF, DAY_BLOCK, EVENT_CARD, MAIN_LINK, PARAGRAPH, TIME};
use crate::extract::text::element_text;
use crate::extract::{extract_price, PriceRules};
use crate::pipeline::context::ScrapeContext;
use crate::types::{EventSource, RawEventRecord, Source};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use tracing::{info, instrument, warn};

/// pgh.events aggregator. Listing pages are grouped into day blocks and every
/// card carries all fields, so one fetch per page is enough.
#[derive(Debug, Default)]
pub struct PghEventsSource;

impl PghEventsSource {
    pub fn new() -> Self {
        Self
    }

    pub fn page_url(page: u32) -> String {
        if page <= 1 {
            format!("{PGH_EVENTS_BASE_URL}/")
        } else {
            format!("{PGH_EVENTS_BASE_URL}/?page={page}")
        }
    }
}

#[async_trait::async_trait]
impl EventSource for PghEventsSource {
    fn source(&self) -> Source {
        Source::PghEvents
    }

    #[instrument(skip(self, ctx))]
    async fn collect(&self, ctx: &ScrapeContext) -> Result<Vec<RawEventRecord>> {
        let mut records = Vec::new();

        for page in 1..=MAX_PAGES {
            if ctx.is_cancelled() {
                warn!("Run cancelled, stopping pgh.events at page {}", page);
                break;
            }
            let url = Self::page_url(page);
            info!("📡 [pgh.events] Fetching page {}: {}", page, url);

            let html = match ctx.fetch_page(Source::PghEvents, &url).await {
                Ok(html) => html,
                Err(e) if e.is_transport() => {
                    warn!("Skipping pgh.events page {}: {}", page, e);
                    continue;
                }
                Err(ScraperError::Cancelled) => {
                    warn!("Run cancelled, stopping pgh.events at page {}", page);
                    break;
                }
                Err(e) => return Err(e),
            };

            match parse_listing_page(&html) {
                Some(found) => {
                    info!("✅ [pgh.events] {} cards on page {}", found.len(), page);
                    records.extend(found);
                }
                None => {
                    info!("No day blocks on page {}, end of listings", page);
                    break;
                }
            }
        }

        info!("📋 [pgh.events] Total: {} raw records", records.len());
        Ok(records)
    }
}

/// Every card on one listing page, or `None` when the page has no day blocks.
pub fn parse_listing_page(html: &str) -> Option<Vec<RawEventRecord>> {
    let document = Html::parse_document(html);
    let mut blocks = document.select(&DAY_BLOCK).peekable();
    blocks.peek()?;

    let mut records = Vec::new();
    for block in blocks {
        let day_date = block
            .select(&TIME)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .and_then(leading_date);
        records.extend(block.select(&EVENT_CARD).map(|card| parse_card(card, day_date)));
    }
    Some(records)
}

fn parse_card(card: ElementRef<'_>, day_date: Option<NaiveDate>) -> RawEventRecord {
    let mut record = RawEventRecord::new(Source::PghEvents);

    let main_link = card.select(&MAIN_LINK).next();
    record.event_name = main_link.and_then(element_text);

    let link = main_link
        .filter(|el| el.value().name() == "a")
        .or_else(|| card.select(&ANCHOR_WITH_HREF).next());
    record.url = link
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| absolute_url(PGH_EVENTS_BASE_URL, href));

    // The venue is the first paragraph without a class attribute.
    record.location = card
        .select(&PARAGRAPH)
        .filter(|p| p.value().attr("class").map_or(true, |c| c.trim().is_empty()))
        .find_map(element_text);

    let card_datetime = card
        .select(&TIME)
        .next()
        .and_then(|t| t.value().attr("datetime"));
    let timing = card_timing(card_datetime, day_date);
    record.date = timing.date;
    record.time = timing.time;

    let card_text = card.text().collect::<String>();
    record.price = extract_price(card, &card_text, PriceRules::pgh_events());

    record
}
