use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapingStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub sites_visited: usize,
    pub sites_failed: usize,
    pub load_more_clicks: usize,
    pub listings_found: usize,
    pub details_scraped: usize,
    pub details_failed: usize,
    pub average_detail_time: f64, // in milliseconds
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<ScrapingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(ScrapingStats {
                start_time: Utc::now(),
                end_time: None,
                sites_visited: 0,
                sites_failed: 0,
                load_more_clicks: 0,
                listings_found: 0,
                details_scraped: 0,
                details_failed: 0,
                average_detail_time: 0.0,
            })),
        }
    }

    pub fn record_site(&self, listings: usize, load_more_clicks: usize) {
        let mut stats = self.stats.write();
        stats.sites_visited += 1;
        stats.listings_found += listings;
        stats.load_more_clicks += load_more_clicks;
    }

    pub fn record_site_failure(&self) {
        self.stats.write().sites_failed += 1;
    }

    pub fn record_detail(&self, success: bool, duration: chrono::Duration) {
        let mut stats = self.stats.write();
        if success {
            stats.details_scraped += 1;
        } else {
            stats.details_failed += 1;
        }

        let total = stats.details_scraped + stats.details_failed;
        let current_total = stats.average_detail_time * (total - 1) as f64;
        let new_duration = duration.num_milliseconds() as f64;
        stats.average_detail_time = (current_total + new_duration) / total as f64;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> ScrapingStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        println!("\nScraping Statistics:");
        println!("===================");
        println!("Duration: {} seconds", duration.num_seconds());
        println!("Sites Visited: {}", stats.sites_visited);
        println!("Sites Failed: {}", stats.sites_failed);
        println!("Load More Clicks: {}", stats.load_more_clicks);
        println!("Listings Found: {}", stats.listings_found);

        if stats.details_scraped + stats.details_failed > 0 {
            println!("Detail Pages Scraped: {}", stats.details_scraped);
            println!("Detail Pages Failed: {}", stats.details_failed);
            println!(
                "Average Detail Page Time: {:.2}ms",
                stats.average_detail_time
            );
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
