//! Prompts
//!
//! Line input for the interactive dashboard, behind a small trait so the
//! menu loop can be driven by a scripted reader in tests. The terminal
//! implementation uses the `dialoguer` crate.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;

/// A synchronous "read a line" capability.
pub trait Prompt {
    /// Read one line of input under the given label. Returns the raw line;
    /// callers trim. An `Err` means input is no longer available (EOF or
    /// interrupt) and the caller should stop prompting.
    fn read_line(&mut self, label: &str) -> Result<String>;

    /// Block until the user acknowledges (Enter).
    fn pause(&mut self) -> Result<()> {
        self.read_line("Press Enter to continue")?;
        Ok(())
    }
}

/// Terminal-backed prompt.
pub struct TermPrompt;

impl Prompt for TermPrompt {
    fn read_line(&mut self, label: &str) -> Result<String> {
        let value: String = Input::new()
            .with_prompt(format!("{} {}", "\u{2192}".cyan(), label.white()))
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }
}

/// Scripted prompt for tests: returns canned lines in order, then errors.
#[cfg(test)]
pub struct ScriptedPrompt {
    lines: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(lines: &[&str]) -> Self {
        ScriptedPrompt {
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, _label: &str) -> Result<String> {
        self.lines
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }
}
