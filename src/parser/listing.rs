use crate::core::Selectors;
use crate::job::{or_placeholder, JobListing, NO_LOCATION, NO_TITLE, NO_TYPE, NO_URL};
use crate::parser::{compile, rendered_text};
use crate::ScraperResult;
use log::{debug, trace};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Reads job cards off a fully expanded listing page.
#[derive(Debug, Clone)]
pub struct ListingParser {
    card: Selector,
    title: Selector,
    job_type: Selector,
    location: Selector,
    link: Selector,
}

impl ListingParser {
    pub fn new(selectors: &Selectors) -> ScraperResult<Self> {
        Ok(Self {
            card: compile(&selectors.job_card)?,
            title: compile(&selectors.job_title)?,
            job_type: compile(&selectors.job_type)?,
            location: compile(&selectors.job_location)?,
            link: compile(&selectors.job_link)?,
        })
    }

    pub fn parse(&self, html: &str, base: &Url, company: &str) -> Vec<JobListing> {
        let document = Html::parse_document(html);

        let listings: Vec<JobListing> = document
            .select(&self.card)
            .map(|card| {
                let listing = JobListing {
                    company: company.to_string(),
                    title: or_placeholder(first_text(card, &self.title), NO_TITLE),
                    job_type: or_placeholder(first_text(card, &self.job_type), NO_TYPE),
                    location: or_placeholder(first_text(card, &self.location), NO_LOCATION),
                    url: or_placeholder(self.link_url(card, base), NO_URL),
                };
                trace!("Parsed listing: {:?}", listing);
                listing
            })
            .collect();

        debug!("Found {} job cards on {}", listings.len(), base);
        listings
    }

    fn link_url(&self, card: ElementRef<'_>, base: &Url) -> Option<String> {
        let href = card.select(&self.link).next()?.value().attr("href")?;
        base.join(href).ok().map(|url| url.to_string())
    }
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(rendered_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"
        <html><body>
        <ul data-ui="list">
          <li data-ui="job">
            <a href="/acme/j/AAA111/">
              <h3 data-ui="job-title"><span>Backend Engineer</span></h3>
              <span data-ui="job-workplace"><strong>Remote</strong></span>
              <span data-ui="job-location">Lisbon, Portugal</span>
            </a>
          </li>
          <li data-ui="job">
            <a href="https://apply.workable.com/acme/j/BBB222/">
              <h3 data-ui="job-title"><span>  </span></h3>
              <span data-ui="job-location">Berlin,
                 Germany</span>
            </a>
          </li>
          <li data-ui="job">
            <h3 data-ui="job-title"><span>Designer</span></h3>
          </li>
        </ul>
        </body></html>
    "#;

    fn parser() -> ListingParser {
        ListingParser::new(&Selectors::default()).unwrap()
    }

    #[test]
    fn test_parse_listing_cards() {
        let base = Url::parse("https://apply.workable.com/acme/").unwrap();
        let jobs = parser().parse(LISTING_PAGE, &base, "Acme");

        assert_eq!(jobs.len(), 3);
        assert_eq!(
            jobs[0],
            JobListing {
                company: "Acme".to_string(),
                title: "Backend Engineer".to_string(),
                job_type: "Remote".to_string(),
                location: "Lisbon, Portugal".to_string(),
                url: "https://apply.workable.com/acme/j/AAA111/".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let base = Url::parse("https://apply.workable.com/acme/").unwrap();
        let jobs = parser().parse(LISTING_PAGE, &base, "Acme");

        assert_eq!(jobs[1].title, NO_TITLE);
        assert_eq!(jobs[1].job_type, NO_TYPE);
        assert_eq!(jobs[1].location, "Berlin, Germany");
        assert_eq!(jobs[1].url, "https://apply.workable.com/acme/j/BBB222/");

        assert_eq!(jobs[2].title, "Designer");
        assert_eq!(jobs[2].location, NO_LOCATION);
        assert_eq!(jobs[2].url, NO_URL);
    }

    #[test]
    fn test_page_without_jobs() {
        let base = Url::parse("https://apply.workable.com/empty/").unwrap();
        let jobs = parser().parse("<html><body><p>No openings</p></body></html>", &base, "Empty");
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let selectors = Selectors {
            job_card: "li[[".to_string(),
            ..Selectors::default()
        };
        assert!(ListingParser::new(&selectors).is_err());
    }
}
