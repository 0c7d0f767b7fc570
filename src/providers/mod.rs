// ============================================
// SEMALIGN - External Provider Collaborators
// ============================================

mod completion;
mod embedding;

pub use completion::{CompletionProvider, MockCompletionProvider, OpenAIChat};
pub use embedding::{EmbeddingProvider, MockEmbeddingProvider, OpenAIEmbeddings};

use crate::error::AnalysisError;

/// Map a provider HTTP status onto the error taxonomy. Auth and rate-limit
/// failures are surfaced as their own kinds so the calling layer can react
/// (fix credentials, back off); everything else is a generic provider
/// failure. Nothing is retried here.
pub(crate) fn classify_status(status: reqwest::StatusCode, body: &str) -> AnalysisError {
    match status.as_u16() {
        401 | 403 => AnalysisError::ProviderAuth(format!(
            "provider returned {} - check API key and scopes: {}",
            status, body
        )),
        429 => AnalysisError::ProviderRateLimited(format!(
            "provider returned 429 - try again later: {}",
            body
        )),
        _ => AnalysisError::ProviderUnavailable(format!(
            "provider returned {}: {}",
            status, body
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_auth() {
        let err = classify_status(reqwest::StatusCode::UNAUTHORIZED, "bad key");
        assert!(matches!(err, AnalysisError::ProviderAuth(_)));

        let err = classify_status(reqwest::StatusCode::FORBIDDEN, "no scope");
        assert!(matches!(err, AnalysisError::ProviderAuth(_)));
    }

    #[test]
    fn test_classify_status_rate_limit() {
        let err = classify_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, AnalysisError::ProviderRateLimited(_)));
    }

    #[test]
    fn test_classify_status_other() {
        let err = classify_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, AnalysisError::ProviderUnavailable(_)));
    }
}
