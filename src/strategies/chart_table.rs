use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::debug;

use super::{element_text, first, first_text, ExtractionStrategy};
use crate::constants::CHART_TABLE_STRATEGY;
use crate::document::Document;
use crate::normalize::{clean_title, normalize_rating, normalize_votes, normalize_year, votes_phrase};
use crate::types::Record;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"table[class*="chart"]"#).unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static TITLE_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"td[class*="titleColumn"]"#).unwrap());
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static YEAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"span[class*="secondaryInfo"]"#).unwrap());
static RATING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"td[class*="imdbRating"] strong"#).unwrap());

/// Ranked chart pages: one `<tr>` per title, year in a secondary span next to
/// the link, rating in a `<strong>` whose tooltip carries the vote count.
pub struct ChartTableStrategy;

impl ExtractionStrategy for ChartTableStrategy {
    fn name(&self) -> &'static str {
        CHART_TABLE_STRATEGY
    }

    fn extract(&self, document: &Document) -> Vec<Record> {
        let Some(table) = document.html().select(&TABLE).next() else {
            debug!("chart_table: no chart table found");
            return Vec::new();
        };

        let mut records = Vec::new();
        for row in table.select(&ROW) {
            let Some(cell) = first(row, &TITLE_CELL) else {
                continue;
            };
            let Some(title) = first_text(cell, &TITLE_LINK).and_then(|t| clean_title(&t)) else {
                continue;
            };

            let year = first_text(cell, &YEAR).and_then(|t| normalize_year(Some(&t)));
            let rating_el = first(row, &RATING);
            let rating = rating_el.and_then(|el| normalize_rating(Some(&element_text(el))));
            let votes = rating_el
                .and_then(|el| el.value().attr("title"))
                .and_then(|tooltip| normalize_votes(Some(votes_phrase(tooltip))));

            records.push(
                Record::new(title)
                    .with_year(year)
                    .with_rating(rating)
                    .with_votes(votes),
            );
        }

        debug!("chart_table: {} rows extracted", records.len());
        records
    }
}
