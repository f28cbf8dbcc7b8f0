use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Outcome of one scripted step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepOutcome {
    #[serde(rename_all = "camelCase")]
    Passed {
        specialist: Option<String>,
        multi_agent: bool,
        subtask_count: usize,
        /// Reply length in characters
        response_length: usize,
    },
    Failed {
        error: String,
    },
}

/// Recorded result of one scripted step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step: u32,
    pub message: String,
    pub expected_routing: String,
    pub duration_secs: f64,
    pub outcome: StepOutcome,
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, StepOutcome::Passed { .. })
    }

    pub fn is_multi_agent(&self) -> bool {
        matches!(
            self.outcome,
            StepOutcome::Passed {
                multi_agent: true,
                ..
            }
        )
    }

    pub fn specialist(&self) -> Option<&str> {
        match &self.outcome {
            StepOutcome::Passed { specialist, .. } => specialist.as_deref(),
            StepOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            StepOutcome::Failed { error } => Some(error),
            StepOutcome::Passed { .. } => None,
        }
    }
}

/// Aggregate statistics for a finished run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub multi_agent: usize,
    pub total_duration_secs: f64,
    /// Mean over every recorded step, failed ones included
    pub average_duration_secs: f64,
}

impl RunSummary {
    pub fn from_results(results: &[StepResult], total_elapsed: Duration) -> Self {
        let passed = results.iter().filter(|r| r.is_success()).count();
        let multi_agent = results.iter().filter(|r| r.is_multi_agent()).count();
        let average_duration_secs = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.duration_secs).sum::<f64>() / results.len() as f64
        };

        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            multi_agent,
            total_duration_secs: total_elapsed.as_secs_f64(),
            average_duration_secs,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Mutable state of one run, owned by the runner
#[derive(Debug, Clone)]
pub struct SessionState {
    pub conversation_id: Option<String>,
    pub results: Vec<StepResult>,
    pub started_at: Instant,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            conversation_id: None,
            results: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Keep the first conversation id seen; later ones are ignored.
    /// Returns true when the id was captured by this call.
    pub fn capture_conversation(&mut self, id: Option<&str>) -> bool {
        match (&self.conversation_id, id) {
            (None, Some(id)) if !id.is_empty() => {
                self.conversation_id = Some(id.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn record(&mut self, result: StepResult) {
        self.results.push(result);
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_results(&self.results, self.started_at.elapsed())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
