use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No Title Found";
pub const NO_TYPE: &str = "No Type Found";
pub const NO_LOCATION: &str = "No Location Found";
pub const NO_URL: &str = "No URL Found";

/// One row of the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Type")]
    pub job_type: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "URL")]
    pub url: String,
}

/// Free-text sections of a job's detail page. Empty when missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    pub description: String,
    pub requirements: String,
    pub benefits: String,
}

impl JobDetails {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.requirements.is_empty() && self.benefits.is_empty()
    }
}

// csv can't serialize flattened structs, so the listing columns are repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullJob {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Type")]
    pub job_type: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Job_Description")]
    pub description: String,
    #[serde(rename = "Job_Requirements")]
    pub requirements: String,
    #[serde(rename = "Job_Benefits")]
    pub benefits: String,
}

impl FullJob {
    pub fn new(listing: JobListing, details: JobDetails) -> Self {
        Self {
            company: listing.company,
            title: listing.title,
            job_type: listing.job_type,
            location: listing.location,
            url: listing.url,
            description: details.description,
            requirements: details.requirements,
            benefits: details.benefits,
        }
    }

    #[cfg(test)]
    pub fn listing(&self) -> JobListing {
        JobListing {
            company: self.company.clone(),
            title: self.title.clone(),
            job_type: self.job_type.clone(),
            location: self.location.clone(),
            url: self.url.clone(),
        }
    }
}

/// Falls back to `placeholder` when the scraped value is blank.
pub(crate) fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder.to_string(),
    }
}
