/// Errors that can occur while exchanging bytes with the controller.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or no response arrived.
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    /// The controller answered with a non-200 status.
    #[error("controller at {url} answered {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// The response body could not be read.
    #[error("failed reading response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl TransportError {
    /// HTTP status associated with this failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request { source, .. } | TransportError::Body { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            TransportError::Client(_) => None,
        }
    }

    /// True when the request timed out before a response arrived.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Request { source, .. } | TransportError::Body { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
