use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::error::{Result, ScraperError};
use crate::extract::LocationCleaner;
use crate::infra::http_client::ReqwestHttp;
use crate::infra::rate_limiter::RateLimiter;
use crate::types::Source;
use metrics::counter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Run-wide stop flag. Set explicitly with [`CancelSignal::abort`] or
/// implicitly once the optional deadline passes. Fetches already in flight
/// finish; no new ones start.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    aborted: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything an adapter needs to walk its source. Cheap to clone; worker
/// tasks each hold their own copy.
#[derive(Clone)]
pub struct ScrapeContext {
    http: Arc<dyn HttpClientPort>,
    limiter: Arc<RateLimiter>,
    cancel: CancelSignal,
    location_cleaner: Arc<LocationCleaner>,
    pub detail_workers: usize,
    pub queue_capacity: usize,
}

impl ScrapeContext {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        limiter: Arc<RateLimiter>,
        location_cleaner: LocationCleaner,
    ) -> Self {
        Self {
            http,
            limiter,
            cancel: CancelSignal::new(),
            location_cleaner: Arc::new(location_cleaner),
            detail_workers: 4,
            queue_capacity: 32,
        }
    }

    /// Live context: reqwest transport, configured pacing and tuning.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = ReqwestHttp::new(&config.user_agent, config.request_timeout())?;
        let mut ctx = Self::new(
            Arc::new(http),
            Arc::new(RateLimiter::new(config.delay())),
            LocationCleaner::new(&config.city)?,
        )
        .with_cancel(CancelSignal::with_timeout(config.run_timeout()));
        ctx.detail_workers = config.detail_workers;
        ctx.queue_capacity = config.queue_capacity;
        debug!(
            city = ctx.location_cleaner.city(),
            delay_ms = ctx.limiter.min_interval().as_millis() as u64,
            workers = ctx.detail_workers,
            queue = ctx.queue_capacity,
            "scrape context ready"
        );
        Ok(ctx)
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_workers(mut self, detail_workers: usize, queue_capacity: usize) -> Self {
        self.detail_workers = detail_workers.max(1);
        self.queue_capacity = queue_capacity.max(1);
        self
    }

    pub fn cancel(&self) -> &CancelSignal {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn location_cleaner(&self) -> &LocationCleaner {
        &self.location_cleaner
    }

    /// Fetch one page as text, honoring the shared politeness spacing. A
    /// non-2xx status is reported as [`ScraperError::HttpStatus`]; a run
    /// cancelled while waiting for a slot as [`ScraperError::Cancelled`].
    pub async fn fetch_page(&self, source: Source, url: &str) -> Result<String> {
        self.limiter.acquire().await;
        if self.is_cancelled() {
            debug!(%source, url, "cancelled before request");
            return Err(ScraperError::Cancelled);
        }
        debug!(%source, url, "fetching page");

        let res = match self.http.get(url).await {
            Ok(res) => res,
            Err(e) => {
                counter!("burgh_fetch_failures_total", "source" => source.cli_name()).increment(1);
                warn!(%source, url, error = %e, "request failed");
                return Err(e);
            }
        };
        if !res.is_success() {
            counter!("burgh_fetch_failures_total", "source" => source.cli_name()).increment(1);
            warn!(%source, url, status = res.status, "non-success status");
            return Err(ScraperError::HttpStatus {
                url: url.to_string(),
                status: res.status,
            });
        }

        counter!("burgh_pages_fetched_total", "source" => source.cli_name()).increment(1);
        debug!(%source, url, content_type = %res.content_type, bytes = res.bytes.len(), "page fetched");
        Ok(res.text())
    }
}
