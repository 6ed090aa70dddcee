use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PARTIAL_OUTPUT: &str = "Workable_jobs.csv";
pub const DEFAULT_FULL_OUTPUT: &str = "Workable_Jobs_Full.csv";

/// CSS selectors for the Workable career page markup.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub clear_filters: String,
    pub load_more: String,
    pub job_card: String,
    pub job_title: String,
    pub job_type: String,
    pub job_location: String,
    pub job_link: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            clear_filters: "a[data-ui='clear-filters']".to_string(),
            load_more: "button[data-ui='load-more-button']".to_string(),
            job_card: "li[data-ui='job']".to_string(),
            job_title: "h3[data-ui='job-title'] > span".to_string(),
            job_type: "span[data-ui='job-workplace'] > strong".to_string(),
            job_location: "span[data-ui='job-location']".to_string(),
            job_link: "a[href]".to_string(),
            description: "section[data-ui='job-description'] > div".to_string(),
            requirements: "section[data-ui='job-requirements'] > div".to_string(),
            benefits: "section[data-ui='job-benefits'] > div".to_string(),
        }
    }
}

/// Boilerplate headings cut from the front of each detail section.
/// Everything up to and including the line holding the earliest heading is dropped.
#[derive(Debug, Clone)]
pub struct HeadingRules {
    pub description: Vec<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            description: vec!["Company Overview:\n".to_string()],
            requirements: vec!["The Role:\n".to_string(), "Requirements:\n".to_string()],
            benefits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub page_load_wait: Duration,
    pub element_timeout: Duration,
    pub scroll_settle: Duration,
    pub load_more_settle: Duration,
    pub max_load_more_clicks: Option<usize>,
    pub max_workers: usize,
    pub partial_output: PathBuf,
    pub full_output: PathBuf,
    pub selectors: Selectors,
    pub headings: HeadingRules,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            page_load_wait: Duration::from_secs(5),
            element_timeout: Duration::from_secs(10),
            scroll_settle: Duration::from_secs(2),
            load_more_settle: Duration::from_secs(3),
            max_load_more_clicks: None,
            max_workers: 5,
            partial_output: PathBuf::from(DEFAULT_PARTIAL_OUTPUT),
            full_output: PathBuf::from(DEFAULT_FULL_OUTPUT),
            selectors: Selectors::default(),
            headings: HeadingRules::default(),
        }
    }
}

impl ScraperConfig {
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_page_load_wait(mut self, wait: Duration) -> Self {
        self.page_load_wait = wait;
        self
    }

    pub fn with_element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    pub fn with_scroll_settle(mut self, wait: Duration) -> Self {
        self.scroll_settle = wait;
        self
    }

    pub fn with_load_more_settle(mut self, wait: Duration) -> Self {
        self.load_more_settle = wait;
        self
    }

    pub fn with_max_load_more_clicks(mut self, max: usize) -> Self {
        self.max_load_more_clicks = Some(max);
        self
    }

    /// Worker count is clamped to at least one.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    pub fn with_partial_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.partial_output = path.into();
        self
    }

    pub fn with_full_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.full_output = path.into();
        self
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn with_headings(mut self, headings: HeadingRules) -> Self {
        self.headings = headings;
        self
    }

    /// Zero waits everywhere. Meant for in-memory browsers.
    pub fn without_waits(self) -> Self {
        self.with_page_load_wait(Duration::ZERO)
            .with_element_timeout(Duration::ZERO)
            .with_scroll_settle(Duration::ZERO)
            .with_load_more_settle(Duration::ZERO)
    }
}
