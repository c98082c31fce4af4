//! Command registration and dispatch.
//!
//! Commands are collected in a [`CommandRegistry`] and then frozen into a
//! read-only [`Registry`]. Dispatch splits the input on whitespace, looks
//! the first token up and hands the remaining tokens to the handler along
//! with the registry itself, so `:help` can list what is available.

use tracing::debug;

use crate::error::{Result, ShellError};

/// A command handler over shell state `S`.
pub type Handler<S> = fn(&mut S, &Registry<S>, &[&str]) -> Result<()>;

/// One registered command.
pub struct CommandSpec<S> {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    handler: Handler<S>,
}

/// Collects commands before the shell starts.
pub struct CommandRegistry<S> {
    commands: Vec<CommandSpec<S>>,
}

impl<S> CommandRegistry<S> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Adds a command. Names must be unique.
    pub fn register(
        &mut self,
        name: &'static str,
        usage: &'static str,
        description: &'static str,
        handler: Handler<S>,
    ) -> Result<&mut Self> {
        if self.commands.iter().any(|c| c.name == name) {
            return Err(ShellError::DuplicateCommand(name.to_string()));
        }
        self.commands.push(CommandSpec {
            name,
            usage,
            description,
            handler,
        });
        Ok(self)
    }

    /// Ends registration.
    pub fn freeze(self) -> Registry<S> {
        Registry {
            commands: self.commands,
        }
    }
}

impl<S> Default for CommandRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// The frozen set of commands.
pub struct Registry<S> {
    commands: Vec<CommandSpec<S>>,
}

impl<S> Registry<S> {
    /// Commands in registration order.
    pub fn commands(&self) -> &[CommandSpec<S>] {
        &self.commands
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec<S>> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Runs the command named by the first token of `line`.
    ///
    /// Blank input is ignored.
    pub fn dispatch(&self, state: &mut S, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();
        let command = self
            .get(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;
        debug!(command = name, args = args.len(), "Dispatching");
        (command.handler)(state, self, &args)
    }
}
