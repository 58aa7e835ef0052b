use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::app::ports::PageFetcher;
use crate::document::Document;
use crate::error::Result;
use crate::strategies::{default_strategies, ExtractionStrategy};
use crate::types::{Record, Table};

/// Outcome of running the strategies over one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Name of the strategy whose records were used; `None` when nothing
    /// matched.
    pub strategy: Option<&'static str>,
    pub table: Table,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Fetch, parse, extract, sort. Each call works on its own document and
/// table; nothing is shared between runs.
pub struct Pipeline {
    fetcher: Box<dyn PageFetcher>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Pipeline {
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            strategies: default_strategies(),
        }
    }

    #[instrument(skip(self))]
    pub async fn scrape(&self, url: &str) -> Result<Extraction> {
        let started = Instant::now();
        let page = self.fetcher.fetch(url).await?;
        info!(
            "Fetched {} ({} bytes, status {})",
            page.url,
            page.body.len(),
            page.status
        );
        debug!("Content-Type: {:?}", page.content_type);

        let document = Document::from_bytes(&page.body)?;
        let extraction = run_strategies(&self.strategies, &document);
        info!(
            "Pipeline finished in {:.2}s with {} rows",
            started.elapsed().as_secs_f64(),
            extraction.table.len()
        );
        Ok(extraction)
    }
}

/// Extracts with the default strategies, no network involved.
pub fn extract_table(document: &Document) -> Extraction {
    run_strategies(&default_strategies(), document)
}

/// Tries strategies in order and keeps the first non-empty result. Later
/// strategies are not run once one has matched.
fn run_strategies(strategies: &[Box<dyn ExtractionStrategy>], document: &Document) -> Extraction {
    let mut winner: Option<(&'static str, Vec<Record>)> = None;
    for strategy in strategies {
        let records = strategy.extract(document);
        debug!("Strategy {} produced {} records", strategy.name(), records.len());
        if !records.is_empty() {
            winner = Some((strategy.name(), records));
            break;
        }
    }

    match winner {
        Some((name, records)) => {
            info!("Using strategy {} ({} records)", name, records.len());
            Extraction {
                strategy: Some(name),
                table: Table::from_records(records),
            }
        }
        None => {
            warn!("No strategy recognised the page layout");
            Extraction {
                strategy: None,
                table: Table::default(),
            }
        }
    }
}
