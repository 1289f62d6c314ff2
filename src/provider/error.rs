#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Provider returned status {status}")]
    BadStatus { status: u16 },

    #[error("Failed to parse provider response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}
