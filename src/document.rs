use scraper::Html;

use crate::error::{Result, ScraperError};

// Leading window inspected for NUL bytes when deciding a body is binary
const BINARY_SNIFF_LEN: usize = 1024;

/// A parsed page. Strategies only ever borrow it immutably.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a fetched body. Invalid UTF-8 sequences are decoded lossily so a
    /// stray byte in one title does not lose the whole page; only bodies that
    /// look binary (NUL bytes near the start) are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0) {
            return Err(ScraperError::Parse(
                "body looks like binary data, not HTML".into(),
            ));
        }
        Ok(Self::parse(&String::from_utf8_lossy(bytes)))
    }

    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}
