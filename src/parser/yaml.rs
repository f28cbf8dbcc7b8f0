use super::types::{ConversationScript, ScriptedStep};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Script file layout; step numbers are optional and default to file order
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScriptFile {
    name: Option<String>,
    #[serde(default)]
    steps: Vec<StepEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepEntry {
    step: Option<u32>,
    message: String,
    #[serde(default)]
    expected_routing: String,
    #[serde(default)]
    description: String,
}

/// Parse a YAML conversation script from disk
pub fn parse_script_file(path: &Path) -> Result<ConversationScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;

    let fallback_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "script".to_string());

    parse_yaml_content(&content, &fallback_name)
}

/// Parse YAML content into a ConversationScript
pub fn parse_yaml_content(content: &str, fallback_name: &str) -> Result<ConversationScript> {
    let file: ScriptFile =
        serde_yaml::from_str(content).context("Failed to parse script YAML")?;

    if file.steps.is_empty() {
        anyhow::bail!("Script has no steps");
    }

    let mut steps = Vec::with_capacity(file.steps.len());
    for (i, entry) in file.steps.into_iter().enumerate() {
        let number = entry.step.unwrap_or(i as u32 + 1);
        if number == 0 {
            anyhow::bail!("Step {} has number 0; step numbers start at 1", i + 1);
        }
        if entry.message.trim().is_empty() {
            anyhow::bail!("Step {} has an empty message", number);
        }
        steps.push(ScriptedStep {
            step: number,
            message: entry.message,
            expected_routing: entry.expected_routing,
            description: entry.description,
        });
    }

    Ok(ConversationScript {
        name: file.name.unwrap_or_else(|| fallback_name.to_string()),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_script() {
        let yaml = r#"
name: Billing follow-up
steps:
  - message: "How much is the pro plan?"
    expectedRouting: general_chat
    description: Pricing question
  - message: "Compare it with the team plan"
    expectedRouting: web_research
"#;

        let script = parse_yaml_content(yaml, "fallback").unwrap();
        assert_eq!(script.name, "Billing follow-up");
        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[0].step, 1);
        assert_eq!(script.steps[1].step, 2);
        assert_eq!(script.steps[1].expected_routing, "web_research");
        assert_eq!(script.steps[1].description, "");
    }

    #[test]
    fn test_explicit_step_numbers_are_kept() {
        let yaml = r#"
steps:
  - step: 10
    message: "hello"
  - step: 20
    message: "again"
"#;
        let script = parse_yaml_content(yaml, "numbered").unwrap();
        assert_eq!(script.name, "numbered");
        assert_eq!(script.steps[0].step, 10);
        assert_eq!(script.steps[1].step, 20);
    }

    #[test]
    fn test_rejects_empty_and_blank_steps() {
        assert!(parse_yaml_content("steps: []", "x").is_err());
        assert!(parse_yaml_content("name: nothing", "x").is_err());

        let blank = "steps:\n  - message: \"   \"\n";
        let err = parse_yaml_content(blank, "x").unwrap_err();
        assert!(err.to_string().contains("empty message"));

        let zero = "steps:\n  - step: 0\n    message: hi\n";
        assert!(parse_yaml_content(zero, "x").is_err());
    }

    #[test]
    fn test_bundled_followup_script() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scripts/followup.yaml");
        let script = parse_script_file(&path).unwrap();
        assert_eq!(script.name, "Dashboard follow-up");
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[2].expected_routing, "code_review");
    }

    #[test]
    fn test_parse_script_file_uses_file_stem() {
        let mut file = tempfile::Builder::new()
            .prefix("smoke")
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "steps:\n  - message: ping").unwrap();

        let script = parse_script_file(file.path()).unwrap();
        let stem = file.path().file_stem().unwrap().to_string_lossy().to_string();
        assert_eq!(script.name, stem);
        assert_eq!(script.steps[0].message, "ping");
    }
}
