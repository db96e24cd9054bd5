use thiserror::Error;

/// Failure of one analysis round-trip. Every variant renders a message fit
/// for the analysis display surface; backend-supplied messages pass through
/// verbatim.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Backend(String),
    #[error("analysis backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis response missing `result` field")]
    MissingResult,
}
