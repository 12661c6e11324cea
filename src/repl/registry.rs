//! # Command Registry
//!
//! Maps command names to their handlers and descriptions.
//!
//! - Names are unique. Registering a taken name fails and leaves the existing
//!   entry untouched.
//! - `help` is installed at construction and can never be replaced.
//! - Names are listed in registration order.
//! - Handler errors pass through `invoke` unchanged.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::repl::command::{check_arity, Command, CommandContext, CommandError, CommandOutput};
use crate::session::EditorSession;

pub const HELP_COMMAND: &str = "help";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("command '{0}' is not registered")]
    NotRegistered(String),

    #[error("invalid command name '{0}'")]
    InvalidName(String),
}

/// A registered command with its description
pub struct CommandEntry {
    name: String,
    description: String,
    handler: Box<dyn Command>,
}

impl CommandEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn handler(&self) -> &dyn Command {
        self.handler.as_ref()
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

struct HelpCommand;

impl Command for HelpCommand {
    fn execute(
        &self,
        context: &mut CommandContext<'_>,
        args: &[String],
    ) -> Result<CommandOutput, CommandError> {
        check_arity(HELP_COMMAND, args, 0, Some(0), HELP_COMMAND)?;
        Ok(CommandOutput::Lines(context.commands.list_names()))
    }
}

pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create a registry holding only `help`
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        registry.insert(
            HELP_COMMAND.to_string(),
            "List all registered commands".to_string(),
            Box::new(HelpCommand),
        );
        registry
    }

    /// Register `handler` under `name`
    pub fn register<C>(
        &mut self,
        name: &str,
        handler: C,
        description: &str,
    ) -> Result<(), RegistryError>
    where
        C: Command + 'static,
    {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.index.contains_key(name) {
            tracing::debug!("Rejecting duplicate registration of '{}'", name);
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }

        self.insert(name.to_string(), description.to_string(), Box::new(handler));
        tracing::debug!("Registered command '{}'", name);
        Ok(())
    }

    /// Register a closure as a command
    pub fn register_fn<F>(
        &mut self,
        name: &str,
        handler: F,
        description: &str,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut CommandContext<'_>, &[String]) -> Result<CommandOutput, CommandError> + 'static,
    {
        self.register(name, handler, description)
    }

    pub fn lookup(&self, name: &str) -> Result<&CommandEntry, RegistryError> {
        self.index
            .get(name)
            .map(|&position| &self.entries[position])
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))
    }

    /// Resolve `name` and run its handler against `session`
    pub fn invoke(
        &self,
        name: &str,
        args: &[String],
        session: &mut dyn EditorSession,
    ) -> Result<CommandOutput, CommandError> {
        let entry = self.lookup(name)?;
        let mut context = CommandContext {
            session,
            commands: self,
        };
        entry.handler.execute(&mut context, args)
    }

    pub fn list_names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: String, description: String, handler: Box<dyn Command>) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(CommandEntry {
            name,
            description,
            handler,
        });
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
