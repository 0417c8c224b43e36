#![allow(dead_code)]

use async_trait::async_trait;
use burgh_events::app::ports::{HttpClientPort, HttpGetResult};
use burgh_events::error::Result;
use burgh_events::extract::LocationCleaner;
use burgh_events::infra::rate_limiter::RateLimiter;
use burgh_events::pipeline::context::{CancelSignal, ScrapeContext};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory transport: serves registered bodies, 404 for anything else.
#[derive(Default)]
pub struct FakeHttp {
    pages: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
    abort_on: Option<(String, CancelSignal)>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), (200, body.into()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), (status, String::new()));
        self
    }

    /// Abort `signal` while serving `url`, as an operator would mid-run.
    pub fn abort_on(mut self, url: &str, signal: CancelSignal) -> Self {
        self.abort_on = Some((url.to_string(), signal));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some((trigger, signal)) = &self.abort_on {
            if trigger == url {
                signal.abort();
            }
        }
        let (status, body) = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(HttpGetResult {
            status,
            bytes: body.into_bytes(),
            content_type: "text/html; charset=utf-8".into(),
        })
    }
}

pub fn context(http: Arc<FakeHttp>) -> ScrapeContext {
    ScrapeContext::new(
        http,
        Arc::new(RateLimiter::unlimited()),
        LocationCleaner::new("Pittsburgh").unwrap(),
    )
    .with_workers(3, 2)
}

pub const PGH_PAGE_1: &str = r#"
<html><body>
  <section class="day-module--day--1">
    <h2><time datetime="2026-02-22">Sunday</time></h2>
    <div class="event-module--event--a">
      <a class="event-module--mainLink--b" href="/event/jazz-night">Jazz Night</a>
      <p class="">Thunderbird Cafe &amp; Music Hall</p>
      <time datetime="2026-02-22T19:00:00-0500">7:00 PM</time>
      <span class="event-module--price--c">$15.</span>
    </div>
    <div class="event-module--event--a">
      <a class="event-module--mainLink--b" href="/event/gala">Spring Gala</a>
      <p>Wyndham Grand</p>
      <time datetime="2026-02-22T18:30:00-0500">6:30 PM</time>
      <span class="event-module--cost--d">$450.00.</span>
    </div>
    <div class="event-module--event--a">
      <p>A card with no title</p>
    </div>
  </section>
  <section class="day-module--day--2">
    <h2><time datetime="2026-02-23">Monday</time></h2>
    <div class="event-module--event--a">
      <a class="event-module--mainLink--b" href="/event/open-mic">Open Mic</a>
      <p>Club Café</p>
      <span>free</span>
    </div>
  </section>
</body></html>"#;

pub const PGH_PAGE_2: &str = r#"
<html><body>
  <section class="day-module--day--3">
    <h2><time datetime="2026-02-24">Tuesday</time></h2>
    <div class="event-module--event--a">
      <a class="event-module--mainLink--b" href="/event/jazz-night">Jazz Night</a>
      <p>Thunderbird Cafe &amp; Music Hall</p>
      <time datetime="2026-02-22T19:00:00-0500">7:00 PM</time>
    </div>
  </section>
</body></html>"#;

pub const EMPTY_PAGE: &str = "<html><body><p>No more events</p></body></html>";

pub fn eventbrite_listing(slugs: &[&str]) -> String {
    let links: String = slugs
        .iter()
        .map(|slug| format!(r#"<a href="https://www.eventbrite.com/e/{slug}?aff=ebdssbdestsearch">{slug}</a>"#))
        .collect();
    format!("<html><body>{links}</body></html>")
}

pub fn eventbrite_url(slug: &str) -> String {
    format!("https://www.eventbrite.com/e/{slug}")
}

pub fn eventbrite_detail(name: &str, start: &str, venue: &str) -> String {
    format!(
        r#"<html><head>
        <script type="application/ld+json">{{"@context":"https://schema.org","@type":"Event","startDate":"{start}"}}</script>
        </head><body>
        <h1>{name}</h1>
        <div data-spec="venue-name">{venue}</div>
        <p>Tickets from $20</p>
        </body></html>"#
    )
}
