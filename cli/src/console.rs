//! Terminal-backed [`Console`] using rustyline.

use etshell_wizard::{Console, ConsoleError};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Reads answers with line editing and history; prints messages to stdout.
pub struct TerminalConsole {
    editor: DefaultEditor,
}

impl TerminalConsole {
    pub fn new() -> Result<Self, ConsoleError> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

fn readline_error(err: ReadlineError) -> ConsoleError {
    match err {
        ReadlineError::Interrupted | ReadlineError::Eof => ConsoleError::Cancelled,
        err => ConsoleError::Io(err.to_string()),
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        let line = self.editor.readline(prompt).map_err(readline_error)?;
        if !line.trim().is_empty() {
            // History is a convenience; failing to record it is not an error.
            let _ = self.editor.add_history_entry(line.as_str());
        }
        Ok(line)
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}
