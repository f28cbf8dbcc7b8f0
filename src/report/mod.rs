pub mod json;
pub mod types;

use crate::runner::events::format_summary;
use anyhow::Result;
use std::path::Path;

/// Print the summary of a saved report and return its exit code
pub fn show_report(path: &Path) -> Result<i32> {
    let report = json::load(path)?;
    println!(
        "Report {} ({}) generated at {}",
        report.session_id, report.script_name, report.generated_at
    );
    for line in format_summary(
        &report.summary,
        &report.steps,
        report.conversation_id.as_deref(),
        &report.base_url,
    ) {
        println!("{}", line);
    }
    Ok(report.summary.exit_code())
}
