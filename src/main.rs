use anyhow::Context;
use clap::{Parser, ValueEnum};
use jobscraper::core::{DEFAULT_FULL_OUTPUT, DEFAULT_PARTIAL_OUTPUT};
use jobscraper::{Browser, ChromiumBrowser, Crawler, ScraperConfig, ScraperResult, StatsTracker};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Title, type, location and URL of every job
    Partial,
    /// Partial pass plus each job's description, requirements and benefits
    Full,
}

#[derive(Debug, Parser)]
#[command(name = "jobscraper", version, about = "Scrape Workable career pages into CSV")]
struct Cli {
    /// Career page URLs, e.g. https://apply.workable.com/acme/
    #[arg(required = true)]
    websites: Vec<Url>,

    #[arg(long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,

    /// Write results to CSV (partial mode skips this unless set)
    #[arg(long, conflicts_with = "no_save")]
    save: bool,

    /// Skip writing CSV in full mode
    #[arg(long)]
    no_save: bool,

    /// Concurrent detail pages in full mode
    #[arg(long, default_value_t = 5)]
    workers: usize,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Chromium executable (falls back to JOBSCRAPER_CHROME_PATH, then auto-detection)
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_PARTIAL_OUTPUT)]
    partial_output: PathBuf,

    #[arg(long, default_value = DEFAULT_FULL_OUTPUT)]
    full_output: PathBuf,

    /// Wait after each navigation before reading the page
    #[arg(long, default_value_t = 5000)]
    page_load_wait_ms: u64,

    /// How long to wait for the filter and load-more controls
    #[arg(long, default_value_t = 10_000)]
    element_timeout_ms: u64,

    /// Stop clicking "load more" after this many clicks
    #[arg(long)]
    max_load_more: Option<usize>,
}

impl Cli {
    fn should_save(&self) -> bool {
        match self.mode {
            Mode::Partial => self.save,
            Mode::Full => !self.no_save,
        }
    }

    fn config(&self) -> ScraperConfig {
        let mut config = ScraperConfig::default()
            .with_headless(!self.headed)
            .with_max_workers(self.workers)
            .with_partial_output(&self.partial_output)
            .with_full_output(&self.full_output)
            .with_page_load_wait(Duration::from_millis(self.page_load_wait_ms))
            .with_element_timeout(Duration::from_millis(self.element_timeout_ms));

        if let Some(path) = &self.chrome_path {
            config = config.with_chrome_executable(path);
        }
        if let Some(max) = self.max_load_more {
            config = config.with_max_load_more_clicks(max);
        }
        config
    }
}

/// Closes the run's stats and prints them, whether or not the pass succeeded.
fn report(stats: &StatsTracker, result: ScraperResult<usize>) -> ScraperResult<usize> {
    stats.finish();
    stats.print_summary();
    result
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("chromiumoxide", log::LevelFilter::Warn)
        .filter_module("tungstenite", log::LevelFilter::Warn)
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let save = cli.should_save();

    let browser = Arc::new(
        ChromiumBrowser::launch(&config)
            .await
            .context("failed to launch Chromium")?,
    );
    let mut crawler = Crawler::new(browser.clone(), config)?;

    let result = match cli.mode {
        Mode::Partial => crawler
            .partial_scrape(&cli.websites, save)
            .await
            .map(|jobs| jobs.len()),
        Mode::Full => crawler
            .full_scrape(&cli.websites, save)
            .await
            .map(|jobs| jobs.len()),
    };

    if let Err(e) = browser.shutdown().await {
        warn!("Browser shutdown failed: {}", e);
    }

    let count = report(crawler.stats(), result)?;
    info!("Scraped {} jobs", count);

    Ok(())
}
