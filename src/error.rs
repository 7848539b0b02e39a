use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Provider { status: StatusCode, body: String },

    #[error("no API key configured")]
    MissingApiKey,

    #[error("could not find a platform data directory")]
    NoDataDir,
}
