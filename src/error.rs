//! Typed errors raised by the dashboard library.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// A record in the inbound payload could not be turned into an observation.
    #[error("malformed observation at index {index}: {reason}")]
    MalformedObservation { index: usize, reason: String },
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
    #[error("request to {url} returned status {status}")]
    HttpStatus { status: u16, url: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("no week matches '{0}'")]
    UnknownWeek(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_observation_message() {
        let err = DashboardError::MalformedObservation {
            index: 3,
            reason: "missing field `datetime`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed observation at index 3: missing field `datetime`"
        );
    }

    #[test]
    fn test_http_status_message() {
        let err = DashboardError::HttpStatus {
            status: 503,
            url: "https://example.com/data".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request to https://example.com/data returned status 503"
        );
    }
}
