// src/report.rs
use anyhow::{Context, Result};
use std::io::Write;

use crate::market_analysis::{SkillFrequencyTable, SummaryStats};

const TOP_SKILLS: usize = 10;
const RULE_WIDTH: usize = 40;

/// Consumer of one finished analysis
pub trait ReportRenderer {
    fn render(&mut self, summary: &SummaryStats, skills: &SkillFrequencyTable) -> Result<()>;
}

/// Plain-text summary for the terminal
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl ConsoleReport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_report(&mut self, summary: &SummaryStats, skills: &SkillFrequencyTable) -> std::io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let out = &mut self.out;

        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "📈 JOB MARKET ANALYSIS SUMMARY")?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "Total Jobs Analyzed: {}", summary.total_jobs)?;

        writeln!(out, "\nTop Technical Skills in Demand:")?;
        for (skill, count) in skills.top_mentioned(TOP_SKILLS) {
            writeln!(out, "- {}: {} mentions", skill, count)?;
        }

        writeln!(out, "\nTop Locations:")?;
        for (location, count) in summary.top_locations.iter() {
            writeln!(out, "- {}: {} openings", location, count)?;
        }

        writeln!(out, "{}", rule)?;
        out.flush()
    }
}

impl<W: Write> ReportRenderer for ConsoleReport<W> {
    fn render(&mut self, summary: &SummaryStats, skills: &SkillFrequencyTable) -> Result<()> {
        self.write_report(summary, skills)
            .context("Failed to write console report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_analysis::{JobAnalyzer, JobRecord};

    #[test]
    fn test_console_report_layout() {
        let jobs = vec![
            JobRecord::from_listing("Senior Python Developer", "Payne", "Stewartbury, AA"),
            JobRecord::from_listing("Cloud Engineer", "Vasquez", "Stewartbury, AA"),
        ];
        let analyzer = JobAnalyzer::new().unwrap();
        let report = analyzer.report(&jobs).unwrap();

        let mut console = ConsoleReport::new(Vec::new());
        console.render(&report.summary, &report.skills).unwrap();
        let text = String::from_utf8(console.into_inner()).unwrap();

        assert!(text.contains("Total Jobs Analyzed: 2"));
        assert!(text.contains("- Python: 2 mentions"));
        assert!(text.contains("- Stewartbury, AA: 2 openings"));
        assert!(!text.contains("GCP"));

        let skill_lines = text.lines().filter(|l| l.ends_with(" mentions")).count();
        assert_eq!(skill_lines, 9);
    }
}
