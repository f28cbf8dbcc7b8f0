use crate::runner::state::{RunSummary, StepResult};
use serde::{Deserialize, Serialize};

/// Saved outcome of one run, written with `--report`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub session_id: String,
    pub script_name: String,
    pub base_url: String,
    pub conversation_id: Option<String>,
    pub steps: Vec<StepResult>,
    pub summary: RunSummary,
    pub generated_at: String,
}

impl RunReport {
    pub fn new(
        script_name: &str,
        base_url: &str,
        conversation_id: Option<String>,
        steps: Vec<StepResult>,
        summary: RunSummary,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            script_name: script_name.to_string(),
            base_url: base_url.to_string(),
            conversation_id,
            steps,
            summary,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
