pub mod types;
pub mod yaml;

use anyhow::Result;
use std::path::Path;
use types::ConversationScript;

/// Script from `path`, or the built-in conversation when none is given
pub fn load_script(path: Option<&Path>) -> Result<ConversationScript> {
    match path {
        Some(p) => yaml::parse_script_file(p),
        None => Ok(ConversationScript::builtin()),
    }
}
