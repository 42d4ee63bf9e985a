use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Malformed {endpoint} response: {source}")]
    MalformedResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
