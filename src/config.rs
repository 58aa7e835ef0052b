use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::*;
use crate::error::{Result, ScraperError};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub fetch: FetchConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub accept_language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub file_name: String,
    pub max_column_width: usize,
    pub column_padding: usize,
    pub header_row_height: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            column_padding: DEFAULT_COLUMN_PADDING,
            header_row_height: DEFAULT_HEADER_ROW_HEIGHT,
        }
    }
}

impl ScraperConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Reads `config.toml` from the working directory when it exists.
    pub fn load_or_default() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load(DEFAULT_CONFIG_PATH)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ScraperConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_seconds == 0 {
            return Err(ScraperError::Config(
                "fetch.timeout_seconds must be greater than zero".into(),
            ));
        }
        if self.export.max_column_width == 0 {
            return Err(ScraperError::Config(
                "export.max_column_width must be greater than zero".into(),
            ));
        }
        let height = self.export.header_row_height;
        if !height.is_finite() || height <= 0.0 {
            return Err(ScraperError::Config(format!(
                "export.header_row_height must be a positive number, got {}",
                height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = ScraperConfig::default();
        assert_eq!(config.fetch.timeout(), Duration::from_secs(25));
        assert_eq!(config.export.max_column_width, 50);
        assert_eq!(config.export.column_padding, 2);
        assert_eq!(config.export.file_name, "imdb_list.xlsx");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = ScraperConfig::from_toml(
            r#"
            [fetch]
            timeout_seconds = 5

            [export]
            sheet_name = "Top 250"
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.fetch.accept_language, DEFAULT_ACCEPT_LANGUAGE);
        assert_eq!(config.export.sheet_name, "Top 250");
        assert_eq!(config.export.max_column_width, DEFAULT_MAX_COLUMN_WIDTH);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ScraperConfig::from_toml("[fetch]\ntimeout_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn unusable_header_row_height_is_rejected() {
        for value in ["-1.0", "0.0", "nan", "inf"] {
            let err = ScraperConfig::from_toml(&format!("[export]\nheader_row_height = {}\n", value))
                .unwrap_err();
            assert!(matches!(err, ScraperError::Config(_)), "{} accepted", value);
        }
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[export]\ncolumn_padding = 4\n").unwrap();
        let config = ScraperConfig::load(&path).unwrap();
        assert_eq!(config.export.column_padding, 4);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ScraperConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }
}
