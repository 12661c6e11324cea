//! # Command Pattern Infrastructure
//!
//! A command is anything that can run with the editor session and a list of
//! whitespace-separated arguments. Plain closures qualify through a blanket
//! impl, so small commands need no type of their own.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::repl::registry::{CommandRegistry, RegistryError};
use crate::session::{EditorSession, SessionError};

/// What a command produced, ready to be printed by the dispatch loop
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Nothing to print
    None,
    Text(String),
    /// Printed one per line
    Lines(Vec<String>),
    /// Structured value returned by the editor, printed as JSON
    Value(Value),
    /// Ends the dispatch loop
    Quit,
}

impl CommandOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None | Self::Quit => true,
            Self::Text(text) => text.is_empty(),
            Self::Lines(lines) => lines.is_empty(),
            Self::Value(_) => false,
        }
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None | Self::Quit => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Lines(lines) => f.write_str(&lines.join("\n")),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("usage: {usage}")]
    Usage { command: String, usage: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Everything a command may touch while it runs
pub struct CommandContext<'a> {
    /// The attached editor
    pub session: &'a mut dyn EditorSession,
    /// The registry the command was invoked through
    pub commands: &'a CommandRegistry,
}

/// A named unit of behavior invocable from the dispatch loop
///
/// Commands validate their own arguments; the registry only routes.
pub trait Command {
    fn execute(
        &self,
        context: &mut CommandContext<'_>,
        args: &[String],
    ) -> Result<CommandOutput, CommandError>;
}

impl<F> Command for F
where
    F: Fn(&mut CommandContext<'_>, &[String]) -> Result<CommandOutput, CommandError>,
{
    fn execute(
        &self,
        context: &mut CommandContext<'_>,
        args: &[String],
    ) -> Result<CommandOutput, CommandError> {
        self(context, args)
    }
}

/// Fail with a usage error unless `min <= args.len() <= max`
pub fn check_arity(
    command: &str,
    args: &[String],
    min: usize,
    max: Option<usize>,
    usage: &str,
) -> Result<(), CommandError> {
    let too_few = args.len() < min;
    let too_many = max.is_some_and(|max| args.len() > max);
    if too_few || too_many {
        return Err(CommandError::Usage {
            command: command.to_string(),
            usage: usage.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn check_arity_should_accept_range() {
        assert!(check_arity("search", &args(&["foo"]), 1, Some(2), "search <term>").is_ok());
        assert!(check_arity("search", &args(&["foo", "src"]), 1, Some(2), "search").is_ok());
        assert!(check_arity("cmd", &args(&["a", "b", "c"]), 1, None, "cmd").is_ok());
    }

    #[test]
    fn check_arity_should_reject_outside_range() {
        let err = check_arity("search", &[], 1, Some(2), "search <term> [folder]").unwrap_err();
        assert_eq!(err.to_string(), "usage: search <term> [folder]");

        let err = check_arity("help", &args(&["x"]), 0, Some(0), "help").unwrap_err();
        assert!(matches!(err, CommandError::Usage { command, .. } if command == "help"));
    }

    #[test]
    fn output_should_render_for_terminal() {
        assert_eq!(CommandOutput::None.to_string(), "");
        assert_eq!(CommandOutput::Text("hi".into()).to_string(), "hi");
        assert_eq!(
            CommandOutput::Lines(vec!["a".into(), "b".into()]).to_string(),
            "a\nb"
        );
        assert_eq!(CommandOutput::Value(json!([1, 2, 3])).to_string(), "[1,2,3]");
        assert!(CommandOutput::Quit.is_empty());
        assert!(!CommandOutput::Value(json!(null)).is_empty());
    }
}
