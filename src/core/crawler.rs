use crate::browser::{Browser, Session};
use crate::core::company::company_name;
use crate::core::ScraperConfig;
use crate::job::{FullJob, JobDetails, JobListing};
use crate::parser::{DetailParser, ListingParser};
use crate::stats::StatsTracker;
use crate::storage::{CsvStorage, FULL_HEADERS, LISTING_HEADERS};
use crate::ScraperResult;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::spawn;
use tokio::task::JoinError;
use tokio::time::sleep;
use url::Url;

/// Drives the listing pass and the detail fan-out over a [`Browser`].
pub struct Crawler {
    browser: Arc<dyn Browser>,
    config: Arc<ScraperConfig>,
    listing_parser: ListingParser,
    detail_parser: Arc<DetailParser>,
    partial_jobs: Option<Vec<JobListing>>,
    stats: Arc<StatsTracker>,
}

impl Crawler {
    pub fn new(browser: Arc<dyn Browser>, config: ScraperConfig) -> ScraperResult<Self> {
        info!("Initializing crawler");
        let listing_parser = ListingParser::new(&config.selectors)?;
        let detail_parser = DetailParser::new(&config.selectors, &config.headings)?;

        Ok(Self {
            browser,
            config: Arc::new(config),
            listing_parser,
            detail_parser: Arc::new(detail_parser),
            partial_jobs: None,
            stats: Arc::new(StatsTracker::new()),
        })
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    /// Listings from the last partial pass, if one ran.
    pub fn partial_jobs(&self) -> Option<&[JobListing]> {
        self.partial_jobs.as_deref()
    }

    /// Collects title, type, location and URL of every job on each website.
    /// Sites that fail are logged and skipped.
    pub async fn partial_scrape(
        &mut self,
        websites: &[Url],
        save: bool,
    ) -> ScraperResult<Vec<JobListing>> {
        let mut jobs = Vec::new();

        for website in websites {
            match self.scrape_site(website).await {
                Ok(site_jobs) => jobs.extend(site_jobs),
                Err(e) => {
                    warn!("Skipping {}: {}", website, e);
                    self.stats.record_site_failure();
                }
            }
        }

        info!("Partial scrape found {} jobs", jobs.len());
        self.partial_jobs = Some(jobs.clone());

        if save {
            CsvStorage::new(&self.config.partial_output).write(&jobs, LISTING_HEADERS)?;
        }

        Ok(jobs)
    }

    /// Visits every listing's detail page, at most `max_workers` at a time.
    /// Runs the partial pass first unless one has already run.
    pub async fn full_scrape(&mut self, websites: &[Url], save: bool) -> ScraperResult<Vec<FullJob>> {
        let listings = match &self.partial_jobs {
            Some(jobs) => jobs.clone(),
            None => self.partial_scrape(websites, false).await?,
        };

        info!(
            "Scraping {} individual jobs with {} workers",
            listings.len(),
            self.config.max_workers
        );
        let details = self.scrape_details(&listings).await;

        let full_jobs: Vec<FullJob> = listings
            .into_iter()
            .zip(details)
            .map(|(listing, details)| FullJob::new(listing, details))
            .collect();

        if save {
            CsvStorage::new(&self.config.full_output).write(&full_jobs, FULL_HEADERS)?;
        }

        Ok(full_jobs)
    }

    async fn scrape_site(&self, website: &Url) -> ScraperResult<Vec<JobListing>> {
        let company = company_name(website.as_str())?;
        info!("Establishing connection to {} career website...", company);

        let mut session = self.browser.new_session().await?;
        let result = self.collect_listings(session.as_mut(), website, &company).await;

        debug!("Closing the connection to {}", website);
        if let Err(e) = session.close().await {
            warn!("Failed to close session for {}: {}", website, e);
        }

        let (jobs, clicks) = result?;
        info!("{}: {} jobs after {} load-more clicks", company, jobs.len(), clicks);
        self.stats.record_site(jobs.len(), clicks);
        Ok(jobs)
    }

    async fn collect_listings(
        &self,
        session: &mut dyn Session,
        website: &Url,
        company: &str,
    ) -> ScraperResult<(Vec<JobListing>, usize)> {
        session.goto(website).await?;
        sleep(self.config.page_load_wait).await;

        self.clear_filters(session).await;
        let clicks = self.load_all(session).await;

        info!("Searching job listings...");
        let html = session.content().await?;
        let base = match session.current_url().await {
            Ok(url) => url,
            Err(_) => website.clone(),
        };

        Ok((self.listing_parser.parse(&html, &base, company), clicks))
    }

    /// Some boards pre-filter by visitor location; clearing it shows every job.
    async fn clear_filters(&self, session: &dyn Session) {
        let selector = &self.config.selectors.clear_filters;

        match session
            .wait_for_clickable(selector, self.config.element_timeout)
            .await
        {
            Ok(true) => match self.click_with_fallback(session, selector).await {
                Ok(()) => info!("Cleared location filter"),
                Err(e) => debug!("Could not clear filter: {}", e),
            },
            Ok(false) => debug!("No filter to clear"),
            Err(e) => debug!("Filter lookup failed: {}", e),
        }
    }

    /// Clicks "load more" until it stops appearing. Returns the click count.
    async fn load_all(&self, session: &dyn Session) -> usize {
        let selector = &self.config.selectors.load_more;
        let mut clicks = 0;

        loop {
            if let Some(max) = self.config.max_load_more_clicks {
                if clicks >= max {
                    info!("Reached load-more limit of {}", max);
                    break;
                }
            }

            match session
                .wait_for_clickable(selector, self.config.element_timeout)
                .await
            {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    debug!("Load-more lookup failed: {}", e);
                    break;
                }
            }

            if let Err(e) = self.click_with_fallback(session, selector).await {
                warn!("Could not click load-more button: {}", e);
                break;
            }

            clicks += 1;
            debug!("Clicked load-more ({} so far)", clicks);
            sleep(self.config.load_more_settle).await;
        }

        clicks
    }

    async fn click_with_fallback(&self, session: &dyn Session, selector: &str) -> ScraperResult<()> {
        session.scroll_into_view(selector).await?;
        sleep(self.config.scroll_settle).await;

        if let Err(e) = session.click(selector).await {
            debug!("Click on {} failed ({}), retrying through script", selector, e);
            session.js_click(selector).await?;
        }
        Ok(())
    }

    async fn scrape_details(&self, listings: &[JobListing]) -> Vec<JobDetails> {
        let mut details = vec![JobDetails::default(); listings.len()];
        let mut futures = FuturesUnordered::new();

        for (index, listing) in listings.iter().enumerate() {
            if futures.len() >= self.config.max_workers {
                debug!(
                    "Reached worker limit {}, waiting for slot",
                    self.config.max_workers
                );
                if let Some(result) = futures.next().await {
                    store_detail(result, &mut details);
                }
            }

            let browser = Arc::clone(&self.browser);
            let config = Arc::clone(&self.config);
            let parser = Arc::clone(&self.detail_parser);
            let stats = Arc::clone(&self.stats);
            let url = listing.url.clone();

            futures.push(spawn(async move {
                let details = scrape_job_details(browser, config, parser, stats, url).await;
                (index, details)
            }));
        }

        while let Some(result) = futures.next().await {
            store_detail(result, &mut details);
        }

        details
    }
}

fn store_detail(result: Result<(usize, JobDetails), JoinError>, details: &mut [JobDetails]) {
    match result {
        Ok((index, job_details)) => details[index] = job_details,
        Err(e) => warn!("Detail task error: {}", e),
    }
}

/// Never fails: a broken page yields empty sections.
async fn scrape_job_details(
    browser: Arc<dyn Browser>,
    config: Arc<ScraperConfig>,
    parser: Arc<DetailParser>,
    stats: Arc<StatsTracker>,
    url: String,
) -> JobDetails {
    let start = Utc::now();
    let result = fetch_details(browser.as_ref(), &config, &parser, &url).await;
    let duration = Utc::now().signed_duration_since(start);

    match result {
        Ok(details) => {
            stats.record_detail(true, duration);
            details
        }
        Err(e) => {
            warn!("Failed to scrape {}: {}", url, e);
            stats.record_detail(false, duration);
            JobDetails::default()
        }
    }
}

async fn fetch_details(
    browser: &dyn Browser,
    config: &ScraperConfig,
    parser: &DetailParser,
    url: &str,
) -> ScraperResult<JobDetails> {
    let url = Url::parse(url)?;
    info!("Scraping {}", url);

    let mut session = browser.new_session().await?;
    let html = load_page(session.as_mut(), &url, config).await;
    if let Err(e) = session.close().await {
        warn!("Failed to close session for {}: {}", url, e);
    }

    Ok(parser.parse(&html?))
}

async fn load_page(
    session: &mut dyn Session,
    url: &Url,
    config: &ScraperConfig,
) -> ScraperResult<String> {
    session.goto(url).await?;
    sleep(config.page_load_wait).await;
    session.content().await
}
