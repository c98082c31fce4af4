use std::fmt;

/// SQL produced by a wizard step, waiting for the print/execute/save
/// decision.
///
/// Wizards only ever hand these out; running them is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDdl {
    pub text: String,
}

impl PendingDdl {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for PendingDdl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
