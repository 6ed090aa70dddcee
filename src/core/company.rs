use crate::{ScraperError, ScraperResult};
use regex::Regex;
use std::sync::OnceLock;

fn company_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.com/([^/]+)").expect("valid company pattern"))
}

/// Company slug from a career page URL, e.g. `https://apply.workable.com/acme/` -> `Acme`.
pub fn company_name(website: &str) -> ScraperResult<String> {
    let slug = company_pattern()
        .captures(website)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ScraperError::InvalidWebsite(website.to_string()))?;

    Ok(capitalize(slug))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
