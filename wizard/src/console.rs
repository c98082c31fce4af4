//! The question/answer seam between the wizards and the terminal.

use std::collections::VecDeque;

use etshell_core::parse_yes;

use crate::error::ConsoleError;

/// Line-oriented user interaction.
///
/// Implementors supply [`read_line`](Console::read_line) and
/// [`notify`](Console::notify); the wizards only use the provided helpers.
pub trait Console {
    /// Shows `prompt` and reads one line, without trimming.
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    /// Shows an informational message.
    fn notify(&mut self, message: &str);

    /// Asks a question and returns the trimmed answer.
    ///
    /// A required question is repeated until the answer is not blank.
    fn ask(&mut self, prompt: &str, required: bool) -> Result<String, ConsoleError> {
        loop {
            let answer = self.read_line(prompt)?;
            let answer = answer.trim();
            if !required || !answer.is_empty() {
                return Ok(answer.to_string());
            }
        }
    }

    /// Asks a Y/N question. Anything but `Y` is a no.
    fn confirm(&mut self, prompt: &str) -> Result<bool, ConsoleError> {
        self.ask(prompt, true).map(|answer| parse_yes(&answer))
    }
}

/// A [`Console`] that replays canned answers and records what it was shown.
///
/// Once the answers run out every question fails with
/// [`ConsoleError::Cancelled`], as if the user had pressed Ctrl-D.
///
/// # Examples
///
/// ```
/// use etshell_wizard::{Console, ScriptedConsole};
///
/// let mut console = ScriptedConsole::new(["", "  tst  "]);
/// assert_eq!(console.ask("Prefix: ", true).unwrap(), "tst");
/// assert_eq!(console.prompts().len(), 2);
/// assert!(console.ask("Name: ", true).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    messages: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Queues more answers.
    pub fn push_answers<I, S>(&mut self, answers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers.extend(answers.into_iter().map(Into::into));
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Every prompt shown, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Every message passed to [`Console::notify`], in order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(ConsoleError::Cancelled)
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_question_repeats_on_blank() {
        let mut console = ScriptedConsole::new(["", "   ", "orders"]);
        assert_eq!(console.ask("Name: ", true).unwrap(), "orders");
        assert_eq!(console.prompts().len(), 3);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn test_optional_question_accepts_blank() {
        let mut console = ScriptedConsole::new([""]);
        assert_eq!(console.ask("Default value: ", false).unwrap(), "");
    }

    #[test]
    fn test_confirm() {
        let mut console = ScriptedConsole::new(["y", "Y", "N", "yes"]);
        assert!(console.confirm("?").unwrap());
        assert!(console.confirm("?").unwrap());
        assert!(!console.confirm("?").unwrap());
        assert!(!console.confirm("?").unwrap());
    }

    #[test]
    fn test_exhausted_script_cancels() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        assert_eq!(console.ask("Name: ", false), Err(ConsoleError::Cancelled));
        console.push_answers(["late"]);
        assert_eq!(console.ask("Name: ", false).unwrap(), "late");
    }
}
