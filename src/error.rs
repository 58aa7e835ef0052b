use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP {status} returned for {url}")]
    Status { url: String, status: u16 },

    #[error("Could not parse document: {0}")]
    Parse(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spreadsheet export failed: {0}")]
    Export(#[from] zip::result::ZipError),
}

impl ScraperError {
    /// True for failures that happened while retrieving the page, as opposed
    /// to local configuration or export problems.
    pub fn is_fetch(&self) -> bool {
        matches!(self, ScraperError::Fetch(_) | ScraperError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
