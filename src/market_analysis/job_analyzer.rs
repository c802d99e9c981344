// src/market_analysis/job_analyzer.rs
use super::types::{MarketReport, RankedCounts, SkillFrequencyTable, SummaryStats};
use super::JobRecord;
use crate::error::{AnalyzerError, Result};
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

pub const SKILLS_TO_TRACK: [&str; 17] = [
    "Python",
    "SQL",
    "Java",
    "JavaScript",
    "React",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Pandas",
    "Spark",
    "Tableau",
    "FastAPI",
    "Machine Learning",
    "AI",
    "Full Stack",
];

const TOP_N: usize = 3;

/// Counts skill mentions and summarizes a batch of job records.
///
/// Every call works on the full batch it is given; nothing is cached between
/// calls except the compiled skill patterns.
pub struct JobAnalyzer {
    patterns: Vec<(&'static str, Regex)>,
}

impl JobAnalyzer {
    pub fn new() -> Result<Self> {
        let patterns = SKILLS_TO_TRACK
            .iter()
            .map(|skill| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(skill)))
                    .case_insensitive(true)
                    .build()
                    .map(|re| (*skill, re))
                    .map_err(|e| AnalyzerError::config(format!("Invalid skill pattern '{}': {}", skill, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Whole-word, case-insensitive mention counts over all descriptions,
    /// ranked by count. Empty batch gives an empty table.
    pub fn extract_skills(&self, jobs: &[JobRecord]) -> SkillFrequencyTable {
        if jobs.is_empty() {
            warn!("No data found to analyze.");
            return SkillFrequencyTable::default();
        }

        let all_descriptions = jobs
            .iter()
            .map(|job| job.description.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let counts = self
            .patterns
            .iter()
            .map(|(skill, re)| (skill.to_string(), re.find_iter(&all_descriptions).count()))
            .collect();

        let table = SkillFrequencyTable::ranked(counts);
        debug!("Skill counts over {} jobs: {:?}", jobs.len(), table);
        table
    }

    /// Total count and the most frequent locations and companies.
    ///
    /// Fails on the first record with a blank `location` or `company`.
    pub fn get_summary(&self, jobs: &[JobRecord]) -> Result<SummaryStats> {
        for (index, job) in jobs.iter().enumerate() {
            for (field, value) in [("location", &job.location), ("company", &job.company)] {
                if value.trim().is_empty() {
                    return Err(AnalyzerError::MissingField {
                        index,
                        field,
                        title: job.title.clone(),
                    });
                }
            }
        }

        Ok(SummaryStats {
            total_jobs: jobs.len(),
            top_locations: RankedCounts::top_n(jobs.iter().map(|j| j.location.as_str()), TOP_N),
            top_companies: RankedCounts::top_n(jobs.iter().map(|j| j.company.as_str()), TOP_N),
        })
    }

    pub fn report(&self, jobs: &[JobRecord]) -> Result<MarketReport> {
        let skills = self.extract_skills(jobs);
        let summary = self.get_summary(jobs)?;
        Ok(MarketReport { summary, skills })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, company: &str, location: &str) -> JobRecord {
        JobRecord::from_listing(title, company, location)
    }

    fn with_description(description: &str) -> JobRecord {
        JobRecord {
            title: "Anything".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_single_case_variant_mention() {
        let analyzer = JobAnalyzer::new().unwrap();
        for (text, skill) in [
            ("we love kubernetes here", "Kubernetes"),
            ("FASTAPI services", "FastAPI"),
            ("machine LEARNING team", "Machine Learning"),
            ("full stack role", "Full Stack"),
        ] {
            let table = analyzer.extract_skills(&[with_description(text)]);
            assert_eq!(table.len(), SKILLS_TO_TRACK.len());
            for (name, count) in table.iter() {
                let expected = usize::from(name == skill);
                assert_eq!(count, expected, "{} in {:?}", name, text);
            }
        }
    }

    #[test]
    fn test_substrings_are_not_counted() {
        let analyzer = JobAnalyzer::new().unwrap();
        let table = analyzer.extract_skills(&[with_description(
            "Javascripting Pythonic SQLite Dockerized Reactive sparkle AIrflow",
        )]);
        assert!(!table.has_mentions());
    }

    #[test]
    fn test_counts_every_occurrence() {
        let analyzer = JobAnalyzer::new().unwrap();
        let table = analyzer.extract_skills(&[
            with_description("Python, python and PYTHON"),
            with_description("more Python"),
        ]);
        assert_eq!(table.get("Python"), Some(4));
        assert_eq!(table.iter().next(), Some(("Python", 4)));
    }

    #[test]
    fn test_order_independent() {
        let analyzer = JobAnalyzer::new().unwrap();
        let mut jobs = vec![
            job("Senior Python Developer", "A", "X"),
            job("Cloud Engineer", "B", "Y"),
            job("Product Manager", "C", "Z"),
            job("Data Analyst", "A", "X"),
        ];
        let forward = analyzer.extract_skills(&jobs);
        jobs.reverse();
        assert_eq!(forward, analyzer.extract_skills(&jobs));
        jobs.swap(0, 2);
        assert_eq!(forward, analyzer.extract_skills(&jobs));
    }

    #[test]
    fn test_empty_batch() {
        let analyzer = JobAnalyzer::new().unwrap();
        assert!(analyzer.extract_skills(&[]).is_empty());

        let summary = analyzer.get_summary(&[]).unwrap();
        assert_eq!(summary.total_jobs, 0);
        assert!(summary.top_locations.is_empty());
        assert!(summary.top_companies.is_empty());
    }

    #[test]
    fn test_summary_limits() {
        let analyzer = JobAnalyzer::new().unwrap();
        let jobs: Vec<JobRecord> = (0..8)
            .map(|i| job("Barista", &format!("Company {}", i % 5), &format!("Town {}", i % 4)))
            .collect();

        let summary = analyzer.get_summary(&jobs).unwrap();
        assert_eq!(summary.total_jobs, 8);
        assert_eq!(summary.top_locations.len(), 3);
        assert_eq!(summary.top_companies.len(), 3);
        assert!(summary.top_locations.iter().all(|(_, c)| c <= 8));
        let companies: Vec<_> = summary.top_companies.iter().collect();
        assert_eq!(
            companies,
            vec![("Company 0", 2), ("Company 1", 2), ("Company 2", 2)]
        );
    }

    #[test]
    fn test_blank_field_names_record() {
        let analyzer = JobAnalyzer::new().unwrap();
        let jobs = vec![job("Cloud Engineer", "B", "Y"), job("Product Manager", "C", "  ")];

        match analyzer.get_summary(&jobs) {
            Err(AnalyzerError::MissingField { index, field, title }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "location");
                assert_eq!(title, "Product Manager");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_end_to_end_three_titles() {
        let analyzer = JobAnalyzer::new().unwrap();
        let jobs = vec![
            job("Senior Python Developer", "Payne, Roberts and Davis", "Stewartbury, AA"),
            job("Cloud Engineer", "Vasquez-Davidson", "Christopherville, AA"),
            job("Product Manager", "Jackson, Chambers and Levy", "Port Ericaburgh, AA"),
        ];

        let report = analyzer.report(&jobs).unwrap();
        assert_eq!(report.summary.total_jobs, 3);

        let expected = [
            ("Python", 2),
            ("SQL", 1),
            ("Java", 1),
            ("JavaScript", 1),
            ("React", 1),
            ("AWS", 1),
            ("Azure", 1),
            ("Docker", 1),
            ("Kubernetes", 1),
            ("Pandas", 1),
            ("Full Stack", 1),
            ("GCP", 0),
            ("Spark", 0),
            ("Tableau", 0),
            ("FastAPI", 0),
            ("Machine Learning", 0),
            ("AI", 0),
        ];
        let got: Vec<_> = report.skills.iter().collect();
        assert_eq!(got, expected.to_vec());
    }
}
