use crate::core::{HeadingRules, Selectors};
use crate::job::JobDetails;
use crate::parser::{compile, rendered_text, strip_heading};
use crate::ScraperResult;
use scraper::{Html, Selector};

/// Extracts description, requirements and benefits from a job detail page.
#[derive(Debug, Clone)]
pub struct DetailParser {
    description: Selector,
    requirements: Selector,
    benefits: Selector,
    headings: HeadingRules,
}

impl DetailParser {
    pub fn new(selectors: &Selectors, headings: &HeadingRules) -> ScraperResult<Self> {
        Ok(Self {
            description: compile(&selectors.description)?,
            requirements: compile(&selectors.requirements)?,
            benefits: compile(&selectors.benefits)?,
            headings: headings.clone(),
        })
    }

    pub fn parse(&self, html: &str) -> JobDetails {
        let document = Html::parse_document(html);

        JobDetails {
            description: section(&document, &self.description, &self.headings.description),
            requirements: section(&document, &self.requirements, &self.headings.requirements),
            benefits: section(&document, &self.benefits, &self.headings.benefits),
        }
    }
}

fn section(document: &Html, selector: &Selector, headings: &[String]) -> String {
    document
        .select(selector)
        .next()
        .map(|element| strip_heading(rendered_text(element), headings))
        .unwrap_or_default()
}
