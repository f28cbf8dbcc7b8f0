use std::time::Duration;
use thiserror::Error;

/// Step-level failures reported by a transport. These are recorded on the
/// step result and never abort the run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl AgentError {
    /// Classify a reqwest failure, using `timeout` for the timeout message
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AgentError::Timeout(timeout)
        } else if err.is_decode() {
            AgentError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            AgentError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            AgentError::Network(err.to_string())
        }
    }
}
