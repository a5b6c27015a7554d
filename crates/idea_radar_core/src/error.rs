//! crates/idea_radar_core/src/error.rs
//!
//! The fatal error type surfaced by the ingestion and synthesis pipelines.

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required credential or setting is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The news source failed or answered with a non-2xx status.
    #[error("News source error: {0}")]
    ExternalFetch(String),

    /// Nothing to work with. The store has not been touched.
    #[error("{0}")]
    NoData(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl PipelineError {
    /// Classifies a failure of the news source port.
    pub fn from_fetch(err: PortError) -> Self {
        match err {
            PortError::MissingCredentials(name) => {
                PipelineError::Configuration(format!("{} is not configured", name))
            }
            other => PipelineError::ExternalFetch(other.to_string()),
        }
    }

    pub fn from_store(err: PortError) -> Self {
        PipelineError::Store(err.to_string())
    }
}
