pub mod events;
pub mod executor;
pub mod state;

use anyhow::{Context, Result};
use colored::Colorize;
use std::future::Future;
use std::path::Path;

use crate::driver::http::HttpAgentClient;
use crate::parser::types::ConversationScript;
use crate::report::{json, types::RunReport};
use crate::utils::config::Config;

pub use events::*;
pub use executor::{ConversationRunner, RunOptions};
pub use state::*;

/// Run a conversation script against the configured service.
///
/// Prints progress and the summary to stdout, optionally saves a JSON
/// report, and returns the summary. The caller maps it to an exit code.
pub async fn run_conversation(
    config: &Config,
    script: &ConversationScript,
    report_path: Option<&Path>,
) -> Result<RunSummary> {
    let transport = HttpAgentClient::new(config).context("Failed to set up agent client")?;
    let options = RunOptions {
        step_delay: config.step_delay,
        create_conversation: config.create_conversation,
    };

    let mut runner = ConversationRunner::new(
        Box::new(transport),
        Box::new(ConsoleEventListener::new()),
        options,
    );
    let summary = runner.run(script).await?;

    if let Some(path) = report_path {
        let session = runner.session();
        let report = RunReport::new(
            &script.name,
            runner.base_url(),
            session.conversation_id.clone(),
            session.results.clone(),
            summary.clone(),
        );
        json::save(&report, path)?;
        println!("Report saved to: {}", path.display());
    }

    Ok(summary)
}

/// Run `work` on its own task and turn the outcome into a process exit code.
///
/// Run-level errors and panics both print `❌ Test failed` and give 1;
/// otherwise the code returned by `work` is passed through.
pub async fn guarded_exit_code<F>(work: F) -> i32
where
    F: Future<Output = Result<i32>> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            println!("\n{}", format!("❌ Test failed: {:#}", e).red());
            1
        }
        Err(join_err) => {
            let reason = if join_err.is_panic() {
                let payload = join_err.into_panic();
                payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic".to_string())
            } else {
                join_err.to_string()
            };
            log::error!("Runner aborted: {}", reason);
            println!("\n{}", format!("❌ Test failed: {}", reason).red());
            1
        }
    }
}
