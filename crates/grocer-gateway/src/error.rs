use reqwest::StatusCode;
use thiserror::Error;

/// Fallback shown when a rejection carries no usable message body.
const GENERIC_REJECTION: &str = "Something went wrong. Try again.";

/// Errors surfaced by gateway calls.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.  `message` is the
    /// server's own wording when the body carried one.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// The server answered 2xx but the body did not match the expected
    /// shape.
    #[error("Invalid response from the server: {0}")]
    Decode(#[source] reqwest::Error),
}

impl GatewayError {
    /// Build a rejection from a non-2xx response body, extracting the
    /// `message` field of a JSON body when present.
    pub(crate) fn rejected(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(String::from))
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());

        Self::Rejected { status, message }
    }

    /// True when the server itself rejected the request, as opposed to the
    /// request never reaching it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
