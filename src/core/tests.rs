use crate::browser::{Browser, MockBrowser, MockPage};
use crate::core::{Crawler, ScraperConfig};
use crate::job::{JobDetails, NO_URL};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const CLEAR_FILTERS: &str = r##"<a data-ui="clear-filters" href="#">Clear filters</a>"##;
const LOAD_MORE: &str = r#"<button data-ui="load-more-button">Show more</button>"#;

fn site(company: &str) -> Url {
    Url::parse(&format!("https://apply.workable.com/{}/", company)).unwrap()
}

fn job_url(company: &str, slug: &str) -> Url {
    site(company).join(&format!("j/{}/", slug)).unwrap()
}

fn job_card(company: &str, slug: &str, title: &str) -> String {
    format!(
        r#"<li data-ui="job"><a href="/{company}/j/{slug}/">
             <h3 data-ui="job-title"><span>{title}</span></h3>
             <span data-ui="job-workplace"><strong>Remote</strong></span>
             <span data-ui="job-location">Lisbon, Portugal</span>
           </a></li>"#
    )
}

fn listing_page(company: &str, jobs: &[(&str, &str)], controls: &str) -> String {
    let cards: String = jobs
        .iter()
        .map(|(slug, title)| job_card(company, slug, title))
        .collect();
    format!("<html><body><ul>{}</ul>{}</body></html>", cards, controls)
}

fn detail_page(description: &str) -> String {
    format!(
        r#"<html><body>
             <section data-ui="job-description"><div>
               <p>Company Overview:</p><p>{description}</p>
             </div></section>
             <section data-ui="job-requirements"><div>
               <p>Requirements:</p><ul><li>Rust</li></ul>
             </div></section>
             <section data-ui="job-benefits"><div><p>Remote budget</p></div></section>
           </body></html>"#
    )
}

/// Filter banner, then two rounds of "load more", then the full list.
fn paged_site(company: &str) -> MockPage {
    MockPage::new(vec![
        listing_page(company, &[("A1", "Engineer")], CLEAR_FILTERS),
        listing_page(company, &[("A1", "Engineer")], LOAD_MORE),
        listing_page(company, &[("A1", "Engineer"), ("A2", "Designer")], LOAD_MORE),
        listing_page(
            company,
            &[("A1", "Engineer"), ("A2", "Designer"), ("A3", "Analyst")],
            "",
        ),
    ])
}

fn crawler(browser: MockBrowser, config: ScraperConfig) -> Crawler {
    Crawler::new(Arc::new(browser), config.without_waits()).unwrap()
}

#[tokio::test]
async fn test_partial_scrape_clears_filter_and_loads_everything() {
    let browser = MockBrowser::new().with_page(&site("acme"), paged_site("acme"));
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    let jobs = crawler.partial_scrape(&[site("acme")], false).await.unwrap();

    let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Engineer", "Designer", "Analyst"]);
    assert!(jobs.iter().all(|j| j.company == "Acme"));
    assert_eq!(jobs[1].url, job_url("acme", "A2").to_string());
    assert_eq!(jobs[0].job_type, "Remote");

    // one filter click plus two load-more clicks
    assert_eq!(browser.clicks(), 3);
    assert_eq!(browser.active_sessions(), 0);

    let stats = crawler.stats().get_stats();
    assert_eq!(stats.load_more_clicks, 2);
    assert_eq!(stats.listings_found, 3);
    assert_eq!(crawler.partial_jobs().map(|j| j.len()), Some(3));
}

#[tokio::test]
async fn test_script_click_fallback() {
    let browser = MockBrowser::new()
        .with_page(&site("acme"), paged_site("acme"))
        .with_failing_native_click();
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    let jobs = crawler.partial_scrape(&[site("acme")], false).await.unwrap();

    assert_eq!(jobs.len(), 3);
    assert_eq!(browser.clicks(), 0);
    assert_eq!(browser.js_clicks(), 3);
}

#[tokio::test]
async fn test_load_more_cap() {
    let browser = MockBrowser::new().with_page(&site("acme"), paged_site("acme"));
    let mut crawler = crawler(
        browser.clone(),
        ScraperConfig::default().with_max_load_more_clicks(1),
    );

    let jobs = crawler.partial_scrape(&[site("acme")], false).await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(crawler.stats().get_stats().load_more_clicks, 1);
}

#[tokio::test]
async fn test_bad_sites_are_skipped() {
    let odd = Url::parse("https://careers.example.org/jobs").unwrap();
    let browser = MockBrowser::new()
        .with_page(&site("acme"), paged_site("acme"))
        .with_page(&site("broken"), MockPage::failing())
        .with_page(
            &site("globex"),
            MockPage::single(listing_page("globex", &[("G1", "Chemist")], "")),
        );
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    let jobs = crawler
        .partial_scrape(&[site("acme"), odd, site("broken"), site("globex")], false)
        .await
        .unwrap();

    let companies: Vec<&str> = jobs.iter().map(|j| j.company.as_str()).collect();
    assert_eq!(companies, vec!["Acme", "Acme", "Acme", "Globex"]);

    let stats = crawler.stats().get_stats();
    assert_eq!(stats.sites_visited, 2);
    assert_eq!(stats.sites_failed, 2);
    assert_eq!(browser.active_sessions(), 0);
    // the malformed URL never opens a session
    assert_eq!(browser.sessions_opened(), 3);
}

#[tokio::test]
async fn test_partial_scrape_saves_csv() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Workable_jobs.csv");
    let browser = MockBrowser::new().with_page(&site("acme"), paged_site("acme"));
    let mut crawler = crawler(
        browser,
        ScraperConfig::default().with_partial_output(&output),
    );

    crawler.partial_scrape(&[site("acme")], true).await.unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Company,Title,Type,Location,URL");
    assert_eq!(lines.len(), 4);
    assert!(lines[3].starts_with("Acme,Analyst,Remote,\"Lisbon, Portugal\","));
}

#[tokio::test]
async fn test_full_scrape_fans_out_and_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Workable_Jobs_Full.csv");

    let slugs = ["J1", "J2", "J3", "J4", "J5", "J6", "J7"];
    let jobs: Vec<(&str, &str)> = slugs.iter().map(|s| (*s, "Engineer")).collect();

    let mut browser = MockBrowser::new().with_page(
        &site("acme"),
        MockPage::single(listing_page("acme", &jobs, "")),
    );
    for (i, slug) in slugs.iter().enumerate() {
        // earlier jobs finish last
        let delay = Duration::from_millis(10 * (slugs.len() - i) as u64);
        browser = browser.with_page(
            &job_url("acme", slug),
            MockPage::single(detail_page(&format!("Job {}", slug))).with_delay(delay),
        );
    }

    let mut crawler = crawler(
        browser.clone(),
        ScraperConfig::default()
            .with_max_workers(3)
            .with_full_output(&output),
    );

    let full = crawler.full_scrape(&[site("acme")], true).await.unwrap();

    assert_eq!(full.len(), slugs.len());
    for (job, slug) in full.iter().zip(slugs.iter()) {
        assert_eq!(job.url, job_url("acme", slug).to_string());
        assert_eq!(job.description, format!("Job {}", slug));
        assert_eq!(job.requirements, "Rust");
        assert_eq!(job.benefits, "Remote budget");
    }

    assert!(browser.peak_sessions() <= 3);
    assert!(browser.peak_sessions() >= 2);
    assert_eq!(browser.active_sessions(), 0);
    assert_eq!(crawler.stats().get_stats().details_scraped, slugs.len());

    let mut reader = ::csv::Reader::from_path(&output).unwrap();
    assert_eq!(reader.records().count(), slugs.len());
}

#[tokio::test]
async fn test_failed_detail_pages_yield_empty_sections() {
    let listing = format!(
        "<html><body><ul>{}{}<li data-ui=\"job\"><h3 data-ui=\"job-title\"><span>Ghost</span></h3></li></ul></body></html>",
        job_card("acme", "OK", "Engineer"),
        job_card("acme", "GONE", "Designer"),
    );
    let browser = MockBrowser::new()
        .with_page(&site("acme"), MockPage::single(listing))
        .with_page(&job_url("acme", "OK"), MockPage::single(detail_page("Fine")))
        .with_page(&job_url("acme", "GONE"), MockPage::failing());
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    let full = crawler.full_scrape(&[site("acme")], false).await.unwrap();

    assert_eq!(full.len(), 3);
    assert_eq!(full[0].description, "Fine");
    assert_eq!(full[1].title, "Designer");
    assert!(full[1].description.is_empty() && full[1].requirements.is_empty());
    assert_eq!(full[2].url, NO_URL);
    assert_eq!(full[2].listing().title, "Ghost");
    assert_eq!(
        JobDetails {
            description: full[2].description.clone(),
            requirements: full[2].requirements.clone(),
            benefits: full[2].benefits.clone(),
        },
        JobDetails::default()
    );

    let stats = crawler.stats().get_stats();
    assert_eq!(stats.details_scraped, 1);
    assert_eq!(stats.details_failed, 2);
    assert_eq!(browser.active_sessions(), 0);
}

#[tokio::test]
async fn test_full_scrape_reuses_partial_results() {
    let browser = MockBrowser::new()
        .with_page(
            &site("acme"),
            MockPage::single(listing_page("acme", &[("A1", "Engineer")], "")),
        )
        .with_page(&job_url("acme", "A1"), MockPage::single(detail_page("Reused")));
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    crawler.partial_scrape(&[site("acme")], false).await.unwrap();
    assert_eq!(browser.sessions_opened(), 1);

    let full = crawler.full_scrape(&[site("acme")], false).await.unwrap();

    assert_eq!(full.len(), 1);
    assert_eq!(full[0].description, "Reused");
    // only the detail page was opened the second time
    assert_eq!(browser.sessions_opened(), 2);
}

#[tokio::test]
async fn test_empty_site_list() {
    let browser = MockBrowser::new();
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    let full = crawler.full_scrape(&[], false).await.unwrap();

    assert!(full.is_empty());
    assert_eq!(browser.sessions_opened(), 0);
}

#[tokio::test]
async fn test_load_more_stops_when_both_click_styles_fail() {
    let browser = MockBrowser::new()
        .with_page(
            &site("acme"),
            MockPage::new(vec![
                listing_page("acme", &[("A1", "Engineer")], LOAD_MORE),
                listing_page("acme", &[("A1", "Engineer"), ("A2", "Designer")], ""),
            ]),
        )
        .with_failing_native_click()
        .with_failing_script_click();
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    let jobs = crawler.partial_scrape(&[site("acme")], false).await.unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(browser.clicks() + browser.js_clicks(), 0);
    assert_eq!(browser.active_sessions(), 0);

    let stats = crawler.stats().get_stats();
    assert_eq!(stats.load_more_clicks, 0);
    assert_eq!(stats.sites_visited, 1);
    assert_eq!(stats.sites_failed, 0);
}

#[tokio::test]
async fn test_unclickable_filter_does_not_abort_site() {
    let browser = MockBrowser::new()
        .with_page(
            &site("acme"),
            MockPage::new(vec![
                listing_page("acme", &[("A1", "Engineer")], CLEAR_FILTERS),
                listing_page("acme", &[("A1", "Engineer"), ("A2", "Designer")], ""),
            ]),
        )
        .with_page(
            &site("globex"),
            MockPage::single(listing_page("globex", &[("G1", "Chemist")], "")),
        )
        .with_failing_native_click()
        .with_failing_script_click();
    let mut crawler = crawler(browser.clone(), ScraperConfig::default());

    let jobs = crawler
        .partial_scrape(&[site("acme"), site("globex")], false)
        .await
        .unwrap();

    let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Engineer", "Chemist"]);

    let stats = crawler.stats().get_stats();
    assert_eq!(stats.sites_visited, 2);
    assert_eq!(stats.sites_failed, 0);
    assert_eq!(browser.active_sessions(), 0);
}
