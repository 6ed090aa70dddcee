pub mod browser;
pub mod core;
pub mod job;
pub mod parser;
pub mod stats;
pub mod storage;

pub use browser::{Browser, ChromiumBrowser, Session};
pub use crate::core::{Crawler, ScraperConfig, ScraperError, ScraperResult};
pub use job::{FullJob, JobDetails, JobListing};
pub use stats::StatsTracker;
pub use storage::CsvStorage;
