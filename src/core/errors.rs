use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Browser error: {0}")]
    BrowserError(#[from] chromiumoxide::error::CdpError),

    #[error("Browser configuration error: {0}")]
    BrowserConfigError(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid career website: {0}")]
    InvalidWebsite(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element interaction failed: {0}")]
    InteractionError(String),

    #[error("Navigation error: {0}")]
    NavigationError(String),
}

pub type ScraperResult<T> = Result<T, ScraperError>;
