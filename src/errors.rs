/// Error types for the Upbit SDK.
///
/// Every failure reachable from an endpoint call is one of these variants and
/// is surfaced through [`ResultEnvelope`](crate::decoder::ResultEnvelope).
use thiserror::Error;

/// Message used when the exchange answers 200 with no elements.
pub const EMPTY_RESULT_MESSAGE: &str = "HTTP STATUS IS 200 BUT RESULT IS EMPTY";

/// The primary error type for the Upbit SDK.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpbitError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Transport(String),

    // Exchange-reported errors (status != 200)
    #[error("{name} ({message})")]
    Exchange {
        status: u16,
        name: String,
        message: String,
    },

    #[error("{}", EMPTY_RESULT_MESSAGE)]
    EmptyResult,

    // Client-side errors
    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UpbitError {
    /// HTTP status reported by the exchange, for [`UpbitError::Exchange`] only.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpbitError::Exchange { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, UpbitError::Transport(_))
    }

    /// Returns true for the 200-but-empty anomaly.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, UpbitError::EmptyResult)
    }

    /// Returns true if the call was rejected before anything was sent.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            UpbitError::Signing(_)
                | UpbitError::Precondition(_)
                | UpbitError::InvalidParameter(_)
                | UpbitError::Config(_)
        )
    }
}

impl From<reqwest::Error> for UpbitError {
    fn from(err: reqwest::Error) -> Self {
        UpbitError::Transport(err.to_string())
    }
}
