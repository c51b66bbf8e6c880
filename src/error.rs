use thiserror::Error;

/// Errors produced by the probability/volatility pipeline
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed numeric input (negative mean, NaN threshold, duplicate dates, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The GARCH optimizer produced a non-finite likelihood
    #[error("numerical failure: {0}")]
    NumericalFailure(String),
}
