pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::AgentError;
pub use http::HttpAgentClient;
pub use traits::AgentTransport;
