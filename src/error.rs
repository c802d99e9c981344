// src/error.rs
//! Error taxonomy for the analyzer pipeline.
//!
//! - Fetch and parse failures are recoverable: the pipeline reports them and
//!   finishes the run with no data.
//! - A malformed record reaching aggregation is fatal for the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Network failure, timeout, non-success status, or unreadable local source
    #[error("Failed to fetch data: {0}")]
    Fetch(String),

    #[error("HTML parsing error: {0}")]
    Parse(#[from] ParseError),

    /// A record handed to the aggregator lacks a required field
    #[error("Record #{index} ({title:?}) is missing required field '{field}'")]
    MissingField {
        index: usize,
        field: &'static str,
        title: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0} not found in HTML")]
    ContainerNotFound(&'static str),

    #[error("invalid selector '{0}'")]
    Selector(String),
}

impl AnalyzerError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the pipeline should degrade to an empty result instead of failing
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Parse(_))
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Fetch(format!("request timed out: {}", err))
        } else {
            Self::Fetch(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(AnalyzerError::fetch("boom").is_recoverable());
        assert!(AnalyzerError::from(ParseError::ContainerNotFound("ResultsContainer")).is_recoverable());
        assert!(!AnalyzerError::config("bad").is_recoverable());

        let missing = AnalyzerError::MissingField {
            index: 2,
            field: "location",
            title: "Cloud Engineer".to_string(),
        };
        assert!(!missing.is_recoverable());
        assert_eq!(
            missing.to_string(),
            "Record #2 (\"Cloud Engineer\") is missing required field 'location'"
        );
    }
}
