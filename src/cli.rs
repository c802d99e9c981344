// src/cli.rs
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::app_log;
use crate::core::ConfigManager;
use crate::market_analysis::{JobSource, SKILLS_TO_TRACK};
use crate::pipeline::{spawn_ctrl_c_watcher, Pipeline, RunOutcome};
use crate::report::ConsoleReport;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "job-market")]
#[command(about = "Scrape job listings and rank the skills in demand")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch once, print the summary and save the JSON report
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Where to write the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report without writing the JSON file
        #[arg(long)]
        no_save: bool,
    },
    /// Replay the listings one by one as if discovered live (Ctrl-C stops)
    Live {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long)]
        min_delay_ms: Option<u64>,

        #[arg(long)]
        max_delay_ms: Option<u64>,
    },
    /// List the tracked skill vocabulary
    Skills,
}

#[derive(Args)]
pub struct SourceArgs {
    /// Listing page URL (overrides configuration)
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Read the listing page from a local HTML file instead of fetching it
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl SourceArgs {
    fn resolve(&self, config: &ConfigManager) -> JobSource {
        match (&self.file, &self.url) {
            (Some(path), _) => JobSource::File(path.clone()),
            (None, Some(url)) => JobSource::Url(url.clone()),
            (None, None) => JobSource::Url(config.scraper.source_url.clone()),
        }
    }
}

pub async fn run(command: Command, mut config: ConfigManager) -> Result<()> {
    match command {
        Command::Analyze {
            source,
            output,
            no_save,
        } => {
            if let Some(path) = output {
                config.output_path = path;
            }
            let source = source.resolve(&config);
            let save_to = (!no_save).then(|| config.output_path.clone());

            app_log!(info, "Job Market Analyzer starting on {}", source);
            let pipeline = Pipeline::new(config)?;
            let mut console = ConsoleReport::stdout();

            if let RunOutcome::NoData = pipeline
                .analyze(&source, &mut console, save_to.as_deref())
                .await?
            {
                println!("No data: no job listings could be retrieved from {}", source);
            }
        }

        Command::Live {
            source,
            min_delay_ms,
            max_delay_ms,
        } => {
            if let Some(min) = min_delay_ms {
                config.stream.min_delay_ms = min;
            }
            if let Some(max) = max_delay_ms {
                config.stream.max_delay_ms = max;
            }
            config.validate()?;

            let source = source.resolve(&config);
            let pipeline = Pipeline::new(config)?;
            let jobs = pipeline.collect_jobs(&source).await?;

            // Ctrl-C only stops the stream once there is something to stream
            let mut state = AppState::new();
            let watcher = spawn_ctrl_c_watcher(state.cancel_token());

            let mut console = ConsoleReport::stdout();
            let mut progress = std::io::stdout();
            let outcome = pipeline
                .replay(jobs, &mut state, &mut console, &mut progress)
                .await;
            watcher.abort();

            if let RunOutcome::NoData = outcome? {
                println!("No data: no job listings could be retrieved from {}", source);
            }
        }

        Command::Skills => {
            for skill in SKILLS_TO_TRACK {
                println!("{}", skill);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::try_parse_from([
            "job-market",
            "analyze",
            "--file",
            "jobs.html",
            "-o",
            "out/report.json",
            "--config",
            "alt.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
        match cli.command {
            Command::Analyze { source, output, no_save } => {
                assert_eq!(
                    source.resolve(&ConfigManager::default()),
                    JobSource::File(PathBuf::from("jobs.html"))
                );
                assert_eq!(output, Some(PathBuf::from("out/report.json")));
                assert!(!no_save);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_url_and_file_conflict() {
        let result = Cli::try_parse_from([
            "job-market",
            "live",
            "--url",
            "http://example.com",
            "--file",
            "jobs.html",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_defaults_to_config_url() {
        let args = SourceArgs { url: None, file: None };
        let config = ConfigManager::default();
        assert_eq!(
            args.resolve(&config),
            JobSource::Url(config.scraper.source_url.clone())
        );
    }
}
