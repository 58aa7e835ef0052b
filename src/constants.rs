/// Column headers in export order. Row values follow the same order.
pub const COLUMNS: [&str; 4] = ["Title", "Year", "Rating", "Votes"];

// Strategy names, reported in logs and by the CLI
pub const CHART_TABLE_STRATEGY: &str = "chart_table";
pub const LISTER_LIST_STRATEGY: &str = "lister_list";
pub const SUMMARY_LIST_STRATEGY: &str = "summary_list";

// Fetch defaults
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 25;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

// Export defaults
pub const DEFAULT_SHEET_NAME: &str = "IMDb List";
pub const DEFAULT_FILE_NAME: &str = "imdb_list.xlsx";
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 50;
pub const DEFAULT_COLUMN_PADDING: usize = 2;
pub const DEFAULT_HEADER_ROW_HEIGHT: f64 = 20.0;

/// Longest sheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Get all strategy names in priority order
pub fn get_strategy_names() -> Vec<&'static str> {
    vec![
        CHART_TABLE_STRATEGY,
        LISTER_LIST_STRATEGY,
        SUMMARY_LIST_STRATEGY,
    ]
}
