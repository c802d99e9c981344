pub mod cli;
pub mod core;
pub mod error;
pub mod log;
pub mod market_analysis;
pub mod pipeline;
pub mod report;
pub mod state;

pub use error::{AnalyzerError, ParseError};
pub use market_analysis::{JobAnalyzer, JobRecord, JobScraper};
pub use pipeline::{Pipeline, RunOutcome};
