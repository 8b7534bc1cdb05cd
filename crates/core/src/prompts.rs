//! Prompt templates for the agent.
//!
//! Defaults are compiled in; a prompts directory can override them file by file.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/system_prompt.md");
const DEFAULT_GREETING: &str = include_str!("../prompts/greeting.md");

const SYSTEM_PROMPT_FILE: &str = "system_prompt.md";
const GREETING_FILE: &str = "greeting.md";

/// The agent's standing instructions and the opening-turn instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system_prompt: String,
    pub greeting: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.trim().to_string(),
            greeting: DEFAULT_GREETING.trim().to_string(),
        }
    }
}

impl Prompts {
    /// Loads prompts, letting files in `dir` replace the built-in ones.
    ///
    /// A missing file keeps its default; an unreadable one is an error.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut prompts = Self::default();
        let Some(dir) = dir else {
            return Ok(prompts);
        };

        if let Some(system_prompt) = read_override(dir, SYSTEM_PROMPT_FILE)? {
            prompts.system_prompt = system_prompt;
        }
        if let Some(greeting) = read_override(dir, GREETING_FILE)? {
            prompts.greeting = greeting;
        }
        Ok(prompts)
    }
}

fn read_override(dir: &Path, file_name: &str) -> Result<Option<String>> {
    let path = dir.join(file_name);
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read prompt file {}", path.display()))?;
    debug!(path = %path.display(), "Loaded prompt override");
    Ok(Some(content.trim().to_string()))
}
