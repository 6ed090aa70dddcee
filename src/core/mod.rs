mod company;
mod config;
mod crawler;
mod errors;

pub use company::company_name;
pub use config::{
    HeadingRules, ScraperConfig, Selectors, DEFAULT_FULL_OUTPUT, DEFAULT_PARTIAL_OUTPUT,
};
pub use crawler::Crawler;
pub use errors::{ScraperError, ScraperResult};

#[cfg(test)]
mod tests;
