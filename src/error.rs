use thiserror::Error;

/// Errors raised while fetching and decoding search results.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The search request failed (network error or non-2xx response).
    #[error("search failed for `{jql}`: {reason}")]
    Fetch { jql: String, reason: String },

    /// An id lookup returned zero issues.
    #[error("no issue found for id {id}")]
    NotFound { id: String },

    /// The response body did not have the expected shape.
    #[error("malformed search response: {0}")]
    MalformedResponse(String),
}

impl ReportError {
    pub fn fetch(jql: &str, reason: impl std::fmt::Display) -> Self {
        ReportError::Fetch {
            jql: jql.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ReportError::MalformedResponse(message.into())
    }
}
