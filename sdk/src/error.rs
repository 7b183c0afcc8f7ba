use thiserror::Error;

/// Everything that can go wrong on one API call. Callers of the client
/// never see this type: it is folded into a failure response.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout - please try again")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered with an `error` field in its payload.
    #[error("{0}")]
    Server(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
