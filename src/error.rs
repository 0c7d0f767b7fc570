use thiserror::Error;

/// Errors that abort an analysis run. The engine never returns partial
/// results: any of these fails the whole invocation and is handed back to
/// the calling layer for translation into a user-facing message.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed request, rejected before any provider call is made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Provider rejected credentials or lacks permission. Check the API key
    /// and its scopes; retrying without fixing the credential will not help.
    #[error("provider authentication failed: {0}")]
    ProviderAuth(String),

    /// Provider signalled throttling. Not retried here; callers own backoff.
    #[error("provider rate limited: {0}")]
    ProviderRateLimited(String),

    /// Any other provider-side failure: network error, malformed response,
    /// unexpected status.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Zero-magnitude vector hit during normalization or cosine similarity.
    /// Never coerced to a score of 0 or propagated as NaN.
    #[error("degenerate vector math: {0}")]
    DegenerateMath(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::ProviderUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
