use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use imdb_scraper::config::ScraperConfig;
use imdb_scraper::document::Document;
use imdb_scraper::export::write_xlsx;
use imdb_scraper::infra::http_client::ReqwestFetcher;
use imdb_scraper::logging;
use imdb_scraper::pipeline::{extract_table, Extraction, Pipeline};
use imdb_scraper::types::Table;

const EXIT_EMPTY: u8 = 2;

#[derive(Parser)]
#[command(name = "imdb_scraper")]
#[command(about = "Extracts movie listings into a styled spreadsheet")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a listing page and export it
    Scrape {
        url: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Extract from a saved HTML page instead of fetching
    Parse {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Spreadsheet path (defaults to the configured file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worksheet name
    #[arg(long)]
    sheet_name: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = match logging::init_logging(cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(extraction) if extraction.is_empty() => ExitCode::from(EXIT_EMPTY),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Extraction> {
    let mut config = match &cli.config {
        Some(path) => ScraperConfig::load(path)?,
        None => ScraperConfig::load_or_default()?,
    };

    let (extraction, output) = match cli.command {
        Commands::Scrape { url, output } => {
            let url = url.trim();
            if url.is_empty() {
                anyhow::bail!("Please provide a listing URL");
            }
            let fetcher = ReqwestFetcher::new(&config.fetch)?;
            let pipeline = Pipeline::new(Box::new(fetcher));
            let extraction = pipeline
                .scrape(url)
                .await
                .with_context(|| format!("Failed to process {}", url))?;
            (extraction, output)
        }
        Commands::Parse { file, output } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let document = Document::from_bytes(&bytes)?;
            (extract_table(&document), output)
        }
    };

    if let Some(name) = output.sheet_name {
        config.export.sheet_name = name;
    }
    let path = output
        .output
        .unwrap_or_else(|| PathBuf::from(&config.export.file_name));

    report(&extraction, &path);
    write_xlsx(&extraction.table, &config.export, &path)?;
    info!("Export complete");
    Ok(extraction)
}

fn report(extraction: &Extraction, path: &Path) {
    match extraction.strategy {
        Some(strategy) if !extraction.is_empty() => {
            print_table(&extraction.table);
            println!(
                "\n{} rows via {} layout -> {}",
                extraction.table.len(),
                strategy,
                path.display()
            );
        }
        _ => {
            println!("⚠️  No recognizable items found on this page.");
            println!("   A header-only spreadsheet is written to {}", path.display());
        }
    }
}

fn print_table(table: &Table) {
    let columns = table.columns();
    println!(
        "{:>3} | {:<40} | {:>4} | {:>6} | {:>10}",
        "#", columns[0], columns[1], columns[2], columns[3]
    );
    println!("{}", "-".repeat(75));
    for (i, record) in table.rows().iter().enumerate() {
        let [title, year, rating, votes] = record.cells();
        println!(
            "{:>3} | {:<40} | {:>4} | {:>6} | {:>10}",
            i + 1,
            truncate(title.as_deref().unwrap_or(""), 40),
            year.unwrap_or_default(),
            rating.unwrap_or_default(),
            votes.unwrap_or_default(),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}
