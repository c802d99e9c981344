// src/pipeline.rs
//! Fetch → extract → aggregate → render, in batch or simulated-live mode

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::core::{ConfigManager, FsOps};
use crate::error::AnalyzerError;
use crate::market_analysis::job_scraper::parse_jobs;
use crate::market_analysis::{
    CancelToken, DiscoveryStream, JobAnalyzer, JobRecord, JobScraper, JobSource, MarketReport,
};
use crate::report::ReportRenderer;
use crate::state::AppState;

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing to analyze: the fetch or parse failed, or the page had no listings
    NoData,
    Completed(MarketReport),
}

pub struct Pipeline {
    config: ConfigManager,
    scraper: JobScraper,
    analyzer: JobAnalyzer,
}

impl Pipeline {
    pub fn new(config: ConfigManager) -> Result<Self> {
        let scraper = JobScraper::new(&config.scraper.user_agent, config.timeout())
            .context("Failed to create job scraper")?;
        let analyzer = JobAnalyzer::new().context("Failed to build skill patterns")?;

        Ok(Self {
            config,
            scraper,
            analyzer,
        })
    }

    /// The source URL from configuration
    pub fn default_source(&self) -> JobSource {
        JobSource::Url(self.config.scraper.source_url.clone())
    }

    /// Load and parse the listing page. Fetch and parse failures are logged
    /// and yield an empty batch.
    pub async fn collect_jobs(&self, source: &JobSource) -> Result<Vec<JobRecord>> {
        let html = match self.scraper.load(source).await {
            Ok(html) => html,
            Err(e) if e.is_recoverable() => {
                error!("Could not load {}: {}", source, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match parse_jobs(&html) {
            Ok(batch) => {
                if !batch.skipped.is_empty() {
                    warn!(
                        "Skipped {} malformed listing card(s) from {}",
                        batch.skipped.len(),
                        source
                    );
                }
                Ok(batch.jobs)
            }
            Err(e) if e.is_recoverable() => {
                error!("Could not parse {}: {}", source, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// One-shot analysis. Writes the JSON report to `save_to` when given.
    pub async fn analyze(
        &self,
        source: &JobSource,
        renderer: &mut dyn ReportRenderer,
        save_to: Option<&Path>,
    ) -> Result<RunOutcome> {
        let jobs = self.collect_jobs(source).await?;
        if jobs.is_empty() {
            error!("No jobs found. Check your connection or the target URL.");
            return Ok(RunOutcome::NoData);
        }

        let report = self.build_report(&jobs)?;
        renderer.render(&report.summary, &report.skills)?;

        if let Some(path) = save_to {
            save_report(path, &report).await?;
        }

        Ok(RunOutcome::Completed(report))
    }

    /// Fetch the batch, then replay it through the discovery stream.
    pub async fn live<W: Write>(
        &self,
        source: &JobSource,
        state: &mut AppState,
        renderer: &mut dyn ReportRenderer,
        progress: &mut W,
    ) -> Result<RunOutcome> {
        let jobs = self.collect_jobs(source).await?;
        self.replay(jobs, state, renderer, progress).await
    }

    /// Replay an already fetched batch through the discovery stream,
    /// accumulating into `state` and writing one progress line per delivered
    /// record. Stops early when the state's cancel token fires.
    pub async fn replay<W: Write>(
        &self,
        jobs: Vec<JobRecord>,
        state: &mut AppState,
        renderer: &mut dyn ReportRenderer,
        progress: &mut W,
    ) -> Result<RunOutcome> {
        if jobs.is_empty() {
            warn!("No listings found.");
            return Ok(RunOutcome::NoData);
        }

        let total = jobs.len();
        info!("Streaming {} jobs", total);
        let mut stream = DiscoveryStream::new(jobs, self.config.delay_range(), state.cancel_token());

        while let Some(job) = stream.next_job().await {
            let line = format!("{} @ {} ({})", job.title, job.company, job.location);
            state.push(job);

            let skills = self.analyzer.extract_skills(state.records());
            let leader = skills
                .top_mentioned(1)
                .next()
                .map(|(skill, count)| format!("{} ({})", skill, count))
                .unwrap_or_else(|| "-".to_string());

            writeln!(
                progress,
                "[{}/{}] {} | top skill: {}",
                stream.delivered(),
                total,
                line,
                leader
            )
            .context("Failed to write progress")?;
        }

        if state.is_streaming_stopped() {
            info!("Stream stopped after {} of {} jobs", stream.delivered(), total);
        }

        if state.is_empty() {
            return Ok(RunOutcome::NoData);
        }

        let report = self.build_report(state.records())?;
        renderer.render(&report.summary, &report.skills)?;
        Ok(RunOutcome::Completed(report))
    }

    fn build_report(&self, jobs: &[JobRecord]) -> Result<MarketReport> {
        self.analyzer.report(jobs).map_err(|e| match e {
            AnalyzerError::MissingField { .. } => {
                anyhow::Error::new(e).context("Aggregation failed on a malformed record")
            }
            other => other.into(),
        })
    }
}

pub async fn save_report(path: &Path, report: &MarketReport) -> Result<()> {
    FsOps::write_json(path, report).await?;
    info!("Results saved to {}", path.display());
    Ok(())
}

/// Cancel `token` on the first Ctrl-C. Abort the handle once the stream is done.
pub fn spawn_ctrl_c_watcher(token: CancelToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stop requested, finishing after the current item");
            token.cancel();
        }
    })
}
