// src/market_analysis/job_scraper.rs
use super::JobRecord;
use crate::core::FsOps;
use crate::error::{AnalyzerError, ParseError, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const RESULTS_CONTAINER: &str = "ResultsContainer";
const CARD_SELECTOR: &str = "div.card-content";
const TITLE_SELECTOR: &str = "h2.title";
const COMPANY_SELECTOR: &str = "h3.company";
const LOCATION_SELECTOR: &str = "p.location";

const FALLBACK_SKILLS: &str = "Python, SQL";

/// Title keyword → skills implied by it. Every matching rule contributes.
const TITLE_RULES: &[(&[&str], &[&str])] = &[
    (&["python", "data"], &["Python", "Pandas", "SQL"]),
    (&["developer"], &["JavaScript", "React", "Docker"]),
    (&["engineer"], &["AWS", "Java", "Kubernetes"]),
    (&["manager"], &["Azure", "Full Stack"]),
];

/// Where the listing markup comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    Url(String),
    File(PathBuf),
}

impl std::fmt::Display for JobSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobSource::Url(url) => write!(f, "{}", url),
            JobSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Cards that could not be turned into records, with the absent or blank field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCard {
    pub index: usize,
    pub missing_field: &'static str,
}

#[derive(Debug, Default, Clone)]
pub struct ParsedBatch {
    pub jobs: Vec<JobRecord>,
    pub skipped: Vec<SkippedCard>,
}

pub struct JobScraper {
    client: Client,
}

impl JobScraper {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyzerError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Single attempt, no retry. Non-success status codes are errors.
    pub async fn fetch_jobs(&self, url: &str) -> Result<String> {
        info!("Starting scrape on {}...", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::fetch(format!("HTTP error: {}", status)));
        }

        let body = response.text().await?;
        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    pub async fn load(&self, source: &JobSource) -> Result<String> {
        match source {
            JobSource::Url(url) => self.fetch_jobs(url).await,
            JobSource::File(path) => FsOps::read_file_safe(path)
                .await
                .map_err(|e| AnalyzerError::fetch(format!("{:#}", e))),
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css.to_string()).into())
}

/// Extract job records from the listing page, in document order.
///
/// Blank markup yields an empty batch. A page without the results container
/// is a `ParseError`. Cards whose required sub-node is missing or holds only
/// whitespace are skipped and logged.
pub fn parse_jobs(html: &str) -> Result<ParsedBatch> {
    if html.trim().is_empty() {
        return Ok(ParsedBatch::default());
    }

    let document = Html::parse_document(html);
    let container_selector = selector(&format!("#{}", RESULTS_CONTAINER))?;
    let card_selector = selector(CARD_SELECTOR)?;
    let fields = [
        ("title", selector(TITLE_SELECTOR)?),
        ("company", selector(COMPANY_SELECTOR)?),
        ("location", selector(LOCATION_SELECTOR)?),
    ];

    let container = document
        .select(&container_selector)
        .next()
        .ok_or(ParseError::ContainerNotFound(RESULTS_CONTAINER))?;

    let mut batch = ParsedBatch::default();

    for (index, card) in container.select(&card_selector).enumerate() {
        let mut values: [String; 3] = Default::default();
        let mut missing = None;

        for (slot, (name, sel)) in values.iter_mut().zip(fields.iter()) {
            match first_text(card, sel) {
                Some(text) => *slot = text,
                None => {
                    missing = Some(*name);
                    break;
                }
            }
        }

        if let Some(missing_field) = missing {
            warn!("Skipping listing card #{}: missing or blank '{}'", index, missing_field);
            batch.skipped.push(SkippedCard { index, missing_field });
            continue;
        }

        let [title, company, location] = values;
        batch.jobs.push(JobRecord::from_listing(&title, &company, &location));
    }

    info!("Successfully parsed {} jobs.", batch.jobs.len());
    Ok(batch)
}

fn first_text(card: ElementRef<'_>, sel: &Selector) -> Option<String> {
    card.select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Synthesize a description from the title keywords.
pub fn describe(title: &str) -> String {
    let lower_title = title.to_lowercase();

    let detected: Vec<&str> = TITLE_RULES
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| lower_title.contains(k)))
        .flat_map(|(_, skills)| skills.iter().copied())
        .collect();

    let skills = if detected.is_empty() {
        FALLBACK_SKILLS.to_string()
    } else {
        detected.join(", ")
    };

    format!("Seeking a {} with skills in: {}", title, skills)
}
