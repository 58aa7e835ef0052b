use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::debug;

use super::{class_contains, element_text, first, first_text, ExtractionStrategy};
use crate::constants::LISTER_LIST_STRATEGY;
use crate::document::Document;
use crate::normalize::{clean_title, normalize_rating, normalize_votes, normalize_year};
use crate::types::Record;

static LIST: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"div[class*="lister-list"]"#).unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h3[class*="lister-item-header"] a"#).unwrap());
static YEAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"span[class*="lister-item-year"]"#).unwrap());
static RATING_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[class*="ratings-imdb-rating"]"#).unwrap());
static RATING_VALUE: Lazy<Selector> = Lazy::new(|| Selector::parse("strong").unwrap());
static VOTES: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"span[name="nv"]"#).unwrap());

const ITEM_CLASS: &str = "lister-item";

/// Card lists: `lister-item` blocks under a `lister-list` container, with a
/// separate rating block and a `name="nv"` vote span.
pub struct ListerListStrategy;

impl ListerListStrategy {
    fn rating(item: ElementRef<'_>) -> Option<f64> {
        let block = first(item, &RATING_BLOCK)?;
        first_text(block, &RATING_VALUE)
            .and_then(|text| normalize_rating(Some(&text)))
            .or_else(|| normalize_rating(block.value().attr("data-value")))
    }

    fn votes(item: ElementRef<'_>) -> Option<u64> {
        let span = first(item, &VOTES)?;
        normalize_votes(span.value().attr("data-value"))
            .or_else(|| normalize_votes(Some(&element_text(span))))
    }
}

impl ExtractionStrategy for ListerListStrategy {
    fn name(&self) -> &'static str {
        LISTER_LIST_STRATEGY
    }

    fn extract(&self, document: &Document) -> Vec<Record> {
        let Some(list) = document.html().select(&LIST).next() else {
            debug!("lister_list: no lister-list container found");
            return Vec::new();
        };

        // Direct children only; nested blocks such as lister-item-content
        // also contain the token
        let records: Vec<Record> = list
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|item| class_contains(*item, ITEM_CLASS))
            .filter_map(|item| {
                let title = first_text(item, &TITLE).and_then(|t| clean_title(&t))?;
                let year = first_text(item, &YEAR).and_then(|t| normalize_year(Some(&t)));
                Some(
                    Record::new(title)
                        .with_year(year)
                        .with_rating(Self::rating(item))
                        .with_votes(Self::votes(item)),
                )
            })
            .collect();

        debug!("lister_list: {} items extracted", records.len());
        records
    }
}
