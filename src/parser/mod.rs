pub mod detail;
pub mod headings;
pub mod listing;
pub mod text;

pub use detail::DetailParser;
pub use headings::{find_heading_index, strip_heading};
pub use listing::ListingParser;
pub use text::rendered_text;

use crate::{ScraperError, ScraperResult};
use scraper::Selector;

pub(crate) fn compile(selector: &str) -> ScraperResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScraperError::InvalidSelector(format!("{}: {:?}", selector, e)))
}
