//! The print / execute / save decision every generated statement goes
//! through.

use etshell_wizard::{Console, ConsoleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChoice {
    Print,
    Execute,
    Save,
}

impl OutputChoice {
    /// `P`, `E` or `S`, in either case.
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim() {
            "P" | "p" => Some(OutputChoice::Print),
            "E" | "e" => Some(OutputChoice::Execute),
            "S" | "s" => Some(OutputChoice::Save),
            _ => None,
        }
    }
}

/// Asks until a valid choice is given.
pub fn ask_output_choice<C>(console: &mut C, target: &str) -> Result<OutputChoice, ConsoleError>
where
    C: Console + ?Sized,
{
    let prompt = format!(
        "Would you like to print the query, or to execute it directly to {target}? (P: Print, E: Execute, S: Save it to a file) "
    );
    loop {
        let answer = console.ask(&prompt, true)?;
        if let Some(choice) = OutputChoice::parse(&answer) {
            return Ok(choice);
        }
        console.notify(
            "Please select a valid option: P to print the query, E to execute it or S to save it to a file.",
        );
    }
}
