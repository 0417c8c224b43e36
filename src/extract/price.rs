use super::cascade::{first_success, Strategy};
use super::patterns::{CONVERSION_BAR, COST, PRICE, PRICE_FALLBACK, TICKET_PRICE};
use super::text::{capitalize, clean_opt, element_text};
use scraper::{ElementRef, Selector};

/// Per-source price markers. The secondary selector is consulted only when
/// the primary matches nothing.
#[derive(Debug, Clone, Copy)]
pub struct PriceRules {
    pub primary: &'static Selector,
    pub secondary: &'static Selector,
    pub capitalize_fallback: bool,
}

impl PriceRules {
    pub fn pgh_events() -> Self {
        Self {
            primary: &PRICE,
            secondary: &COST,
            capitalize_fallback: false,
        }
    }

    pub fn eventbrite() -> Self {
        Self {
            primary: &TICKET_PRICE,
            secondary: &CONVERSION_BAR,
            capitalize_fallback: true,
        }
    }
}

struct PriceInput<'a> {
    scope: ElementRef<'a>,
    fallback_text: &'a str,
    rules: PriceRules,
}

/// Price of the listing inside `scope`, else the first `Free` / `$n` literal in
/// `fallback_text`.
pub fn extract_price(scope: ElementRef<'_>, fallback_text: &str, rules: PriceRules) -> Option<String> {
    let input = PriceInput {
        scope,
        fallback_text,
        rules,
    };
    let strategies: [Strategy<PriceInput<'_>, String>; 2] = [
        Strategy::new("price_marker", from_marker),
        Strategy::new("price_pattern", from_pattern),
    ];
    first_success("price", &input, &strategies).map(|(_, price)| price)
}

fn from_marker(input: &PriceInput<'_>) -> Option<String> {
    let element = input
        .scope
        .select(input.rules.primary)
        .next()
        .or_else(|| input.scope.select(input.rules.secondary).next())?;
    element_text(element)
}

fn from_pattern(input: &PriceInput<'_>) -> Option<String> {
    let found = PRICE_FALLBACK.find(input.fallback_text)?.as_str();
    let price = if input.rules.capitalize_fallback {
        capitalize(found)
    } else {
        found.to_string()
    };
    clean_opt(&price)
}

/// `$450.00.` -> `$450.00`
pub fn strip_trailing_periods(price: &str) -> &str {
    price.trim_end_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn price_of(html: &str, rules: PriceRules) -> Option<String> {
        let doc = Html::parse_document(html);
        let text = doc.root_element().text().collect::<String>();
        extract_price(doc.root_element(), &text, rules)
    }

    #[test]
    fn primary_marker() {
        let html = r#"<div><span class="event-price">$25</span><span class="cost">$30</span></div>"#;
        assert_eq!(price_of(html, PriceRules::pgh_events()), Some("$25".into()));
    }

    #[test]
    fn secondary_marker_when_primary_missing() {
        let html = r#"<div><span class="entry-cost"> $12.50 </span></div>"#;
        assert_eq!(price_of(html, PriceRules::pgh_events()), Some("$12.50".into()));
    }

    #[test]
    fn empty_primary_falls_back_to_pattern() {
        let html = r#"<div><span class="price"> </span><p>Tickets $18</p></div>"#;
        assert_eq!(price_of(html, PriceRules::pgh_events()), Some("$18".into()));
    }

    #[test]
    fn eventbrite_fallback_is_capitalized() {
        let html = "<main><p>This event is free to attend</p></main>";
        assert_eq!(price_of(html, PriceRules::eventbrite()), Some("Free".into()));
    }

    #[test]
    fn pgh_fallback_keeps_case() {
        let html = "<main><p>FREE admission</p></main>";
        assert_eq!(price_of(html, PriceRules::pgh_events()), Some("FREE".into()));
    }

    #[test]
    fn free_must_be_a_whole_word() {
        let doc = Html::parse_document(r#"<script>{"isFree":false}</script><p>Tickets $85.00</p>"#);
        let raw = r#"<script>{"isFree":false}</script><p>Tickets $85.00</p>"#;
        assert_eq!(
            extract_price(doc.root_element(), raw, PriceRules::eventbrite()),
            Some("$85.00".into())
        );

        let html = "<main><p>Freeport Road Expo, $10 admission</p></main>";
        assert_eq!(price_of(html, PriceRules::eventbrite()), Some("$10".into()));
        assert_eq!(price_of("<p>A carefree night, $5 cover</p>", PriceRules::pgh_events()), Some("$5".into()));
    }

    #[test]
    fn nothing_found() {
        assert_eq!(price_of("<p>Ask at the door</p>", PriceRules::eventbrite()), None);
    }

    #[test]
    fn trailing_periods() {
        assert_eq!(strip_trailing_periods("$450.00."), "$450.00");
        assert_eq!(strip_trailing_periods("Free"), "Free");
        assert_eq!(strip_trailing_periods("$5.."), "$5");
    }
}
