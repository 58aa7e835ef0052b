use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::debug;

use super::{first_text, ExtractionStrategy};
use crate::constants::SUMMARY_LIST_STRATEGY;
use crate::document::Document;
use crate::normalize::{
    clean_title, expand_compact_count, normalize_rating, normalize_votes, normalize_year,
};
use crate::types::Record;

static ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"li[class*="ipc-metadata-list-summary-item"]"#).unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h3[class*="ipc-title__text"]"#).unwrap());
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[class*="ipc-title-link"]"#).unwrap());
static METADATA: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"span[class*="title-metadata-item"]"#).unwrap());
static RATING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"span[class*="ipc-rating-star--rating"]"#).unwrap());
static VOTE_COUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"span[class*="ipc-rating-star--voteCount"]"#).unwrap());

/// Current list and chart pages: `ipc-metadata-list-summary-item` entries
/// with an inline star rating and compact vote counts ("(3.1M)").
pub struct SummaryListStrategy;

impl SummaryListStrategy {
    fn title(item: ElementRef<'_>) -> Option<String> {
        first_text(item, &TITLE)
            .or_else(|| first_text(item, &TITLE_LINK))
            .and_then(|t| clean_title(&t))
    }

    fn votes(item: ElementRef<'_>) -> Option<u64> {
        let text = first_text(item, &VOTE_COUNT)?;
        let plain = expand_compact_count(&text)?;
        normalize_votes(Some(&plain))
    }
}

impl ExtractionStrategy for SummaryListStrategy {
    fn name(&self) -> &'static str {
        SUMMARY_LIST_STRATEGY
    }

    fn extract(&self, document: &Document) -> Vec<Record> {
        let mut records = Vec::new();
        for item in document.html().select(&ITEM) {
            let Some(title) = Self::title(item) else {
                continue;
            };
            // The first metadata span holds the release year
            let year = first_text(item, &METADATA).and_then(|t| normalize_year(Some(&t)));
            let rating = first_text(item, &RATING).and_then(|t| normalize_rating(Some(&t)));

            records.push(
                Record::new(title)
                    .with_year(year)
                    .with_rating(rating)
                    .with_votes(Self::votes(item)),
            );
        }

        if records.is_empty() {
            debug!("summary_list: no summary items found");
        } else {
            debug!("summary_list: {} items extracted", records.len());
        }
        records
    }
}
