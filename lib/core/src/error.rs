//! Error taxonomy shared by the remote collaborators.
//!
//! Both the completion service and the persistence backend are opaque
//! HTTP services; their failures collapse into one [`RemoteError`] type
//! so the turn handler can treat any remote failure uniformly. Every
//! remote failure is turn-scoped, never fatal to the process.

use std::fmt;

/// Errors from a remote service round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The transport failed before a response was received.
    Transport { reason: String },
    /// The service answered with a non-success status.
    ///
    /// `detail` carries the response body so the upstream error message
    /// is surfaced rather than discarded.
    Status { status: u16, detail: String },
    /// The response was well-formed but contained no usable candidate.
    EmptyResponse,
    /// The response body could not be decoded.
    MalformedResponse { reason: String },
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => {
                write!(f, "transport failure: {reason}")
            }
            Self::Status { status, detail } => {
                write!(f, "remote service returned status {status}: {detail}")
            }
            Self::EmptyResponse => write!(f, "remote response contained no candidates"),
            Self::MalformedResponse { reason } => {
                write!(f, "failed to decode remote response: {reason}")
            }
        }
    }
}

impl std::error::Error for RemoteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        let err = RemoteError::Transport {
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn status_error_surfaces_detail() {
        let err = RemoteError::Status {
            status: 429,
            detail: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn empty_response_display() {
        let err = RemoteError::EmptyResponse;
        assert!(err.to_string().contains("no candidates"));
    }
}
