// src/market_analysis/mod.rs
use serde::{Deserialize, Serialize};

pub mod discovery;
pub mod job_analyzer;
pub mod job_scraper;
pub mod types;

pub use discovery::{CancelToken, DelayRange, DiscoveryStream};
pub use job_analyzer::{JobAnalyzer, SKILLS_TO_TRACK};
pub use job_scraper::{JobScraper, JobSource};
pub use types::{MarketReport, RankedCounts, SkillFrequencyTable, SummaryStats};

/// One job posting extracted from a listing card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
}

impl JobRecord {
    /// Build a record whose description is synthesized from the title
    pub fn from_listing(title: &str, company: &str, location: &str) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            description: job_scraper::describe(title),
        }
    }
}
