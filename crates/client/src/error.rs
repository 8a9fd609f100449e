/// Errors returned by [`DatabaseClient`](crate::DatabaseClient) and
/// [`TableQuery`](crate::TableQuery).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or undecodable response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. `message` is the body's
    /// `error` field when present.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// The call needs a signed-in session.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The server-supplied message for API errors.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
