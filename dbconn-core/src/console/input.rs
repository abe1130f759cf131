//! Line input for the console.

use std::collections::VecDeque;
use std::io;

/// Source of command lines and credential answers.
///
/// Both methods block the console until an answer arrives. `Ok(None)`
/// signals end of input.
pub trait LineSource {
    /// Prints `prompt` and reads one line without its line terminator.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Prints `prompt` and reads a secret without echoing it.
    fn read_password(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Scripted input, used for tests and piped command files.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Input that yields `lines` in order, then end of input.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn read_password(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Removes one trailing `\n` or `\r\n`.
pub fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
