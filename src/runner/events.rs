use super::state::{RunSummary, StepResult};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

const RULE_WIDTH: usize = 80;

/// Run events for console and test observers
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    RunStarted {
        script_name: String,
        base_url: String,
        step_count: usize,
    },
    ConversationCreated {
        conversation_id: String,
    },
    StepStarted {
        step: u32,
        description: String,
        message: String,
    },
    StepPassed {
        step: u32,
        preview: String,
        duration_secs: f64,
        expected_routing: String,
        specialist: Option<String>,
        multi_agent: bool,
        subtask_count: usize,
    },
    StepFailed {
        step: u32,
        error: String,
        duration_secs: f64,
    },
    RunFinished {
        summary: RunSummary,
        results: Vec<StepResult>,
        conversation_id: Option<String>,
        base_url: String,
    },
}

/// Receiver of run events
pub trait EventSink: Send {
    fn emit(&mut self, event: RunEvent);
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Summary block printed once the run is over
pub fn format_summary(
    summary: &RunSummary,
    results: &[StepResult],
    conversation_id: Option<&str>,
    base_url: &str,
) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        rule(),
        "📊 TEST SUMMARY".bold().to_string(),
        rule(),
        String::new(),
        format!("✅ Successful: {}/{}", summary.passed, summary.total),
        format!("❌ Failed: {}/{}", summary.failed, summary.total),
        format!("⏱️  Total time: {:.2}s", summary.total_duration_secs),
        format!(
            "⚡ Average response time: {:.2}s",
            summary.average_duration_secs
        ),
        format!("🤝 Multi-agent collaborations: {}", summary.multi_agent),
        String::new(),
        "📋 Detailed Results:".to_string(),
        String::new(),
    ];

    for result in results {
        let status = if result.is_success() { "✅" } else { "❌" };
        let multi_agent = if result.is_multi_agent() { "🤝" } else { "  " };
        lines.push(format!(
            "{} {} Step {}: {:.2}s - {}",
            status, multi_agent, result.step, result.duration_secs, result.expected_routing
        ));
        if let Some(specialist) = result.specialist() {
            lines.push(format!("     └─ Specialist: {}", specialist));
        }
        if let Some(error) = result.error() {
            lines.push(format!("     └─ Error: {}", error.red()));
        }
    }

    lines.push(String::new());
    lines.push(rule());
    lines.push("🎉 Test completed!".to_string());
    lines.push(rule());
    lines.push(String::new());
    lines.push(format!(
        "Conversation ID: {}",
        conversation_id.unwrap_or("none")
    ));
    lines.push(format!("View at: {}", base_url));
    lines
}

/// Console renderer for run events
pub struct ConsoleEventListener {
    spinner: Option<ProgressBar>,
    interactive: bool,
}

impl ConsoleEventListener {
    pub fn new() -> Self {
        Self {
            spinner: None,
            interactive: std::io::stdout().is_terminal(),
        }
    }

    fn start_spinner(&mut self) {
        // Piped output gets no escape codes
        let pb = if self.interactive {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("    {spinner} {msg} {elapsed}")
        {
            pb.set_style(style);
        }
        pb.set_message("Waiting for response...".dimmed().to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for ConsoleEventListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleEventListener {
    fn emit(&mut self, event: RunEvent) {
        match event {
            RunEvent::RunStarted {
                script_name,
                base_url,
                step_count,
            } => {
                println!("\n{}", rule());
                println!("{}", "🧪 GRACE AI CONVERSATION TEST".bold());
                println!("{}", rule());
                println!("\n  Script: {} ({} steps)", script_name.cyan(), step_count);
                println!("  Target: {}", base_url.cyan());
                println!("\nTesting:");
                println!("  ✓ Specialist routing");
                println!("  ✓ Multi-agent collaboration");
                println!("  ✓ Response speed");
                println!("  ✓ Conversation flow");
                println!();
            }

            RunEvent::ConversationCreated { conversation_id } => {
                println!("✅ Conversation created: {}\n", conversation_id.cyan());
            }

            RunEvent::StepStarted {
                step,
                description,
                message,
            } => {
                println!("\n{}", rule());
                println!("📝 Step {}: {}", step, description);
                println!("{}", rule());
                println!("\n{} {}\n", "👤 User:".blue(), message);
                self.start_spinner();
            }

            RunEvent::StepPassed {
                preview,
                duration_secs,
                expected_routing,
                specialist,
                multi_agent,
                subtask_count,
                ..
            } => {
                self.stop_spinner();
                println!("{} {}\n", "🤖 Grace:".green(), preview);
                println!("⏱️  Response time: {:.2}s", duration_secs);
                println!("🎯 Expected routing: {}", expected_routing);
                if let Some(name) = specialist {
                    println!("✅ Specialist used: {}", name.green());
                }
                if multi_agent {
                    println!("🤝 Multi-agent collaboration activated!");
                    println!("   Subtasks: {}", subtask_count);
                }
            }

            RunEvent::StepFailed {
                error,
                duration_secs,
                ..
            } => {
                self.stop_spinner();
                println!("\n{}", format!("❌ Error: {}", error).red());
                println!("⏱️  Failed after: {:.2}s\n", duration_secs);
            }

            RunEvent::RunFinished {
                summary,
                results,
                conversation_id,
                base_url,
            } => {
                self.stop_spinner();
                for line in format_summary(&summary, &results, conversation_id.as_deref(), &base_url)
                {
                    println!("{}", line);
                }
                println!();
            }
        }
    }
}
