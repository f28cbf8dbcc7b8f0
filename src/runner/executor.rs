use anyhow::{Context, Result};
use std::time::{Duration, Instant};

use super::events::{EventSink, RunEvent};
use super::state::{RunSummary, SessionState, StepOutcome, StepResult};
use crate::driver::traits::AgentTransport;
use crate::driver::types::AgentRequest;
use crate::parser::types::{ConversationScript, ScriptedStep};

/// Characters of the reply shown in the console
pub const PREVIEW_CHARS: usize = 200;

pub const CONVERSATION_TITLE: &str = "Test Conversation - Routing & Multi-Agent";

/// Runner knobs that do not belong to the transport
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub step_delay: Duration,
    pub create_conversation: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_secs(2),
            create_conversation: false,
        }
    }
}

/// First `PREVIEW_CHARS` characters of `content`, with `...` when cut
pub fn content_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Drives a scripted conversation against one agent service, one step at a time
pub struct ConversationRunner {
    transport: Box<dyn AgentTransport>,
    sink: Box<dyn EventSink>,
    options: RunOptions,
    session: SessionState,
}

impl ConversationRunner {
    pub fn new(
        transport: Box<dyn AgentTransport>,
        sink: Box<dyn EventSink>,
        options: RunOptions,
    ) -> Self {
        Self {
            transport,
            sink,
            options,
            session: SessionState::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Run every step in order and return the summary.
    ///
    /// Step failures are recorded and never end the run early. An `Err`
    /// means the run itself broke and no summary was produced.
    pub async fn run(&mut self, script: &ConversationScript) -> Result<RunSummary> {
        if script.is_empty() {
            anyhow::bail!("Script '{}' has no steps", script.name);
        }

        self.session = SessionState::new();
        self.sink.emit(RunEvent::RunStarted {
            script_name: script.name.clone(),
            base_url: self.transport.base_url().to_string(),
            step_count: script.len(),
        });

        if self.options.create_conversation {
            let id = self
                .transport
                .create_conversation(CONVERSATION_TITLE)
                .await
                .context("Failed to create conversation")?;
            log::debug!("Created conversation {}", id);
            self.session.capture_conversation(Some(&id));
            self.sink.emit(RunEvent::ConversationCreated {
                conversation_id: id,
            });
        }

        for (i, step) in script.steps.iter().enumerate() {
            let result = self.send_step(step).await;
            self.session.record(result);

            if i + 1 < script.len() && !self.options.step_delay.is_zero() {
                tokio::time::sleep(self.options.step_delay).await;
            }
        }

        let summary = self.session.summary();
        self.sink.emit(RunEvent::RunFinished {
            summary: summary.clone(),
            results: self.session.results.clone(),
            conversation_id: self.session.conversation_id.clone(),
            base_url: self.transport.base_url().to_string(),
        });

        Ok(summary)
    }

    /// Send a single step and turn the reply into a `StepResult`.
    /// Does not record it on the session.
    pub async fn send_step(&mut self, step: &ScriptedStep) -> StepResult {
        self.sink.emit(RunEvent::StepStarted {
            step: step.step,
            description: step.description.clone(),
            message: step.message.clone(),
        });

        let request = AgentRequest::new(&step.message, self.session.conversation_id.as_deref());
        log::debug!(
            "Step {}: sending (conversation: {:?})",
            step.step,
            request.conversation_id
        );

        let started = Instant::now();
        let reply = self.transport.send_message(&request).await;
        let duration_secs = started.elapsed().as_secs_f64();

        let outcome = match reply {
            Ok(response) => {
                if self.session.capture_conversation(response.conversation_id()) {
                    let id = response.conversation_id().unwrap_or_default().to_string();
                    log::debug!("Captured conversation {}", id);
                    self.sink.emit(RunEvent::ConversationCreated {
                        conversation_id: id,
                    });
                }

                let content = response.content();
                let specialist = response.specialist();
                let multi_agent = response.is_multi_agent();
                let subtask_count = response.subtask_count();

                self.sink.emit(RunEvent::StepPassed {
                    step: step.step,
                    preview: content_preview(content),
                    duration_secs,
                    expected_routing: step.expected_routing.clone(),
                    specialist: specialist.clone(),
                    multi_agent,
                    subtask_count,
                });

                StepOutcome::Passed {
                    specialist,
                    multi_agent,
                    subtask_count,
                    response_length: content.chars().count(),
                }
            }
            Err(e) => {
                let error = e.to_string();
                log::warn!("Step {} failed after {:.2}s: {}", step.step, duration_secs, error);
                self.sink.emit(RunEvent::StepFailed {
                    step: step.step,
                    error: error.clone(),
                    duration_secs,
                });
                StepOutcome::Failed { error }
            }
        };

        StepResult {
            step: step.step,
            message: step.message.clone(),
            expected_routing: step.expected_routing.clone(),
            duration_secs,
            outcome,
        }
    }
}
