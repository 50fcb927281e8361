/// Possible error types while talking to the backend or OpenAuth.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connect failures, timeouts and non-2xx statuses, passed through unmodified.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("token storage error: {0}")]
    Storage(#[from] keyring::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
