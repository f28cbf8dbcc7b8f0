use super::error::AgentError;
use super::types::{AgentRequest, AgentResponse};
use async_trait::async_trait;

/// Seam between the runner and the remote agent service.
///
/// Implementations perform exactly one attempt per call; retries and
/// pacing belong to the caller.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Base URL of the service, shown in reports
    fn base_url(&self) -> &str;

    /// Send one message and return the decoded reply.
    ///
    /// Non-2xx statuses, timeouts, network failures and undecodable
    /// bodies all come back as `Err`.
    async fn send_message(&self, request: &AgentRequest) -> Result<AgentResponse, AgentError>;

    /// Create a conversation up front and return its id
    async fn create_conversation(&self, title: &str) -> Result<String, AgentError>;
}
