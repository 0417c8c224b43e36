pub mod eventbrite;
pub mod factory;
pub mod pgh_events;

use url::Url;

/// Resolve `href` against `base`. `None` for empty or unjoinable links.
pub(crate) fn absolute_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}

/// Drop the query string and fragment from an absolute URL.
pub(crate) fn strip_query(link: &str) -> String {
    match Url::parse(link) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.into()
        }
        Err(_) => link.split(['?', '#']).next().unwrap_or(link).to_string(),
    }
}
