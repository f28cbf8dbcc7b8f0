use serde::{Deserialize, Serialize};

/// One scripted exchange in the test conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedStep {
    /// 1-based position in the conversation
    pub step: u32,
    pub message: String,
    /// Routing label the service is expected to pick (informational)
    pub expected_routing: String,
    pub description: String,
}

impl ScriptedStep {
    pub fn new(step: u32, message: &str, expected_routing: &str, description: &str) -> Self {
        Self {
            step,
            message: message.to_string(),
            expected_routing: expected_routing.to_string(),
            description: description.to_string(),
        }
    }
}

/// Ordered, immutable list of steps driven by the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationScript {
    pub name: String,
    pub steps: Vec<ScriptedStep>,
}

impl ConversationScript {
    /// Routing and multi-agent smoke conversation used when no script file is given
    pub fn builtin() -> Self {
        Self {
            name: "Grace routing & multi-agent conversation".to_string(),
            steps: vec![
                ScriptedStep::new(
                    1,
                    "Hey Grace! What can you help me with?",
                    "general_chat",
                    "Initial greeting - should use GPT-4o",
                ),
                ScriptedStep::new(
                    2,
                    "I need to build a user dashboard for a SaaS application. Can you help?",
                    "complex_task",
                    "Complex task - should trigger multi-agent collaboration",
                ),
                ScriptedStep::new(
                    3,
                    "What are the latest trends in dashboard UI design for 2025?",
                    "web_research",
                    "Research task - should use GLM-4 Plus",
                ),
                ScriptedStep::new(
                    4,
                    "Can you create a quick prototype of a dashboard layout with sidebar and cards?",
                    "ui_design",
                    "UI design - should use Microsoft Phi-4",
                ),
                ScriptedStep::new(
                    5,
                    "Review the code you just generated for any issues",
                    "code_review",
                    "Code review - should use DeepSeek Coder",
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
