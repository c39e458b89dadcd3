use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeraldError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Failure of a call to something this service does not own: the backend
/// API, the public site, or the indexing service.
///
/// Callers decide whether this degrades to "no data" or surfaces as an
/// HTTP error; the variants only describe what went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,

    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("malformed upstream response: {0}")]
    Malformed(String),

    #[error("upstream reported success=false")]
    Unsuccessful,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}
