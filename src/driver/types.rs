use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Routing mode sent with every message
pub const AUTO_MODE: &str = "auto";

/// `meta.mode` value reported when several specialists collaborated
pub const MULTI_AGENT_MODE: &str = "multi-agent";

/// Body of `POST /api/agent/run`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRequest {
    pub question: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl AgentRequest {
    pub fn new(question: &str, conversation_id: Option<&str>) -> Self {
        Self {
            question: question.to_string(),
            mode: AUTO_MODE.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        }
    }
}

/// Fields of the agent reply this tool looks at.
///
/// Everything is kept as raw JSON so a field of an unexpected type only
/// blanks out that field instead of failing the whole step.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub conversation_id: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub meta: Option<Value>,
}

impl AgentResponse {
    fn meta_field(&self, key: &str) -> Option<&Value> {
        self.meta.as_ref().and_then(|m| m.get(key))
    }

    /// Text content; non-string values count as empty
    pub fn content(&self) -> &str {
        self.content.as_ref().and_then(Value::as_str).unwrap_or_default()
    }

    /// Conversation id, ignoring empty strings and non-string values
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id
            .as_ref()
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Specialist name; scalars other than strings are shown as JSON text
    pub fn specialist(&self) -> Option<String> {
        match self.meta_field("specialist")? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Null | Value::Bool(false) => None,
            Value::Array(a) if a.is_empty() => None,
            Value::Object(o) if o.is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_multi_agent(&self) -> bool {
        self.meta_field("mode").and_then(Value::as_str) == Some(MULTI_AGENT_MODE)
    }

    pub fn subtask_count(&self) -> usize {
        self.meta_field("subtasks")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Body of `POST /api/conversation/create`
#[derive(Debug, Clone, Serialize)]
pub struct CreateConversationRequest {
    pub title: String,
    pub mode: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationResponse {
    #[serde(default)]
    pub conversation_id: Option<Value>,
}

impl CreateConversationResponse {
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id
            .as_ref()
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}
