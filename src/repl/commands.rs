//! # Built-in Editor Commands
//!
//! The commands every session starts with, on top of `help`:
//!
//! | name              | arguments              |
//! |-------------------|------------------------|
//! | `describe`        | `<name>`               |
//! | `get_curr_buffer` |                        |
//! | `get_windows`     |                        |
//! | `search`          | `<term> [folder]`      |
//! | `cmd`             | `<text...>`            |
//! | `eval`            | `<expr...>`            |
//! | `set_var`         | `<name> <value...>`    |
//! | `get_var`         | `<name>`               |
//! | `quit` / `exit`   |                        |

use serde_json::Value;

use crate::config::Config;
use crate::repl::command::{check_arity, Command, CommandContext, CommandError, CommandOutput};
use crate::repl::registry::{CommandRegistry, RegistryError};

/// Build a registry holding `help` and all built-in commands
pub fn builtin_registry(config: &Config) -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry, config)?;
    Ok(registry)
}

pub fn register_builtin_commands(
    registry: &mut CommandRegistry,
    config: &Config,
) -> Result<(), RegistryError> {
    registry.register_fn("describe", describe, "Show what a command does: describe <name>")?;
    registry.register_fn(
        "get_curr_buffer",
        get_curr_buffer,
        "Show the editor's current buffer",
    )?;
    registry.register_fn("get_windows", get_windows, "List the editor's windows")?;
    registry.register(
        "search",
        SearchCommand::from_config(config),
        "Search for text in a folder: search <term> [folder]",
    )?;
    registry.register_fn("cmd", run_command, "Run an editor command: cmd <text...>")?;
    registry.register_fn("eval", eval, "Evaluate an editor expression: eval <expr...>")?;
    registry.register_fn(
        "set_var",
        set_var,
        "Set a global editor variable: set_var <name> <value...>",
    )?;
    registry.register_fn("get_var", get_var, "Read a global editor variable: get_var <name>")?;
    registry.register_fn("quit", quit, "Leave vimline")?;
    registry.register_fn("exit", quit, "Leave vimline")?;
    Ok(())
}

fn describe(context: &mut CommandContext<'_>, args: &[String]) -> Result<CommandOutput, CommandError> {
    check_arity("describe", args, 1, Some(1), "describe <name>")?;
    let entry = context.commands.lookup(&args[0])?;
    let description = if entry.description().is_empty() {
        "(no description)"
    } else {
        entry.description()
    };
    Ok(CommandOutput::Text(format!("{}: {}", entry.name(), description)))
}

fn get_curr_buffer(
    context: &mut CommandContext<'_>,
    args: &[String],
) -> Result<CommandOutput, CommandError> {
    check_arity("get_curr_buffer", args, 0, Some(0), "get_curr_buffer")?;
    let buffer = context.session.get_current_buffer()?;
    Ok(CommandOutput::Text(buffer.to_string()))
}

fn get_windows(
    context: &mut CommandContext<'_>,
    args: &[String],
) -> Result<CommandOutput, CommandError> {
    check_arity("get_windows", args, 0, Some(0), "get_windows")?;
    let windows = context.session.get_windows()?;
    Ok(CommandOutput::Lines(
        windows.iter().map(ToString::to_string).collect(),
    ))
}

fn run_command(
    context: &mut CommandContext<'_>,
    args: &[String],
) -> Result<CommandOutput, CommandError> {
    check_arity("cmd", args, 1, None, "cmd <text...>")?;
    context.session.run_editor_command(&args.join(" "))?;
    Ok(CommandOutput::None)
}

fn eval(context: &mut CommandContext<'_>, args: &[String]) -> Result<CommandOutput, CommandError> {
    check_arity("eval", args, 1, None, "eval <expr...>")?;
    let value = context.session.eval(&args.join(" "))?;
    Ok(CommandOutput::Value(value))
}

fn set_var(context: &mut CommandContext<'_>, args: &[String]) -> Result<CommandOutput, CommandError> {
    check_arity("set_var", args, 2, None, "set_var <name> <value...>")?;
    let value = parse_value(&args[1..].join(" "));
    context.session.set_variable(&args[0], value)?;
    Ok(CommandOutput::None)
}

fn get_var(context: &mut CommandContext<'_>, args: &[String]) -> Result<CommandOutput, CommandError> {
    check_arity("get_var", args, 1, Some(1), "get_var <name>")?;
    let value = context.session.get_variable(&args[0])?;
    Ok(CommandOutput::Value(value))
}

fn quit(_: &mut CommandContext<'_>, _: &[String]) -> Result<CommandOutput, CommandError> {
    Ok(CommandOutput::Quit)
}

/// JSON when it parses (`[1, 2, 3]`, `42`, `true`), a plain string otherwise
fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Runs a search through an editor command built from a template
///
/// `{term}` and `{folder}` in the template are replaced by the arguments.
/// Without a folder argument the configured default is used, and failing
/// that the editor's own working directory.
pub struct SearchCommand {
    template: String,
    default_folder: Option<String>,
}

impl SearchCommand {
    pub fn new(template: impl Into<String>, default_folder: Option<String>) -> Self {
        Self {
            template: template.into(),
            default_folder,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.search_command.clone(), config.search_folder.clone())
    }

    pub fn render(&self, term: &str, folder: &str) -> String {
        self.template
            .replace("{term}", term)
            .replace("{folder}", folder)
    }
}

impl Command for SearchCommand {
    fn execute(
        &self,
        context: &mut CommandContext<'_>,
        args: &[String],
    ) -> Result<CommandOutput, CommandError> {
        check_arity("search", args, 1, Some(2), "search <term> [folder]")?;

        let term = &args[0];
        let folder = match (args.get(1), &self.default_folder) {
            (Some(folder), _) => folder.clone(),
            (None, Some(folder)) => folder.clone(),
            (None, None) => context.session.working_directory()?,
        };

        let command = self.render(term, &folder);
        tracing::debug!("search: running '{}'", command);
        context.session.run_editor_command(&command)?;
        Ok(CommandOutput::Text(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{BufferHandle, MockSession, SessionError};
    use serde_json::json;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn registry() -> CommandRegistry {
        builtin_registry(&Config::default()).unwrap()
    }

    #[test]
    fn builtin_registry_should_list_help_first() {
        let names = registry().list_names();
        assert_eq!(names[0], "help");
        for name in ["describe", "get_curr_buffer", "get_windows", "search", "cmd", "quit", "exit"] {
            assert!(names.iter().any(|n| n == name), "missing {name}");
        }
    }

    #[test]
    fn registering_builtins_twice_should_fail() {
        let mut registry = registry();
        let err = register_builtin_commands(&mut registry, &Config::default()).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("describe".into()));
    }

    #[test]
    fn search_should_use_given_folder() {
        let registry = registry();
        let mut session = MockSession::new();

        let output = registry
            .invoke("search", &args(&["foo", "./src"]), &mut session)
            .unwrap();

        assert_eq!(output, CommandOutput::Text("!ack foo ./src".into()));
        assert_eq!(session.executed_commands(), ["!ack foo ./src"]);
    }

    #[test]
    fn search_should_default_to_editor_directory() {
        let registry = registry();
        let mut session = MockSession::new().with_working_directory("/work/app");

        registry.invoke("search", &args(&["foo"]), &mut session).unwrap();
        assert_eq!(session.executed_commands(), ["!ack foo /work/app"]);
    }

    #[test]
    fn search_should_prefer_configured_folder() {
        let command = SearchCommand::new("Rg {term} {folder}", Some("lib".into()));
        let mut registry = CommandRegistry::new();
        registry.register("search", command, "").unwrap();
        let mut session = MockSession::new();

        registry.invoke("search", &args(&["needle"]), &mut session).unwrap();
        assert_eq!(session.executed_commands(), ["Rg needle lib"]);
    }

    #[test]
    fn search_should_require_a_term() {
        let registry = registry();
        let mut session = MockSession::new();
        for bad in [args(&[]), args(&["a", "b", "c"])] {
            let err = registry.invoke("search", &bad, &mut session).unwrap_err();
            assert_eq!(err.to_string(), "usage: search <term> [folder]");
        }
        assert!(session.executed_commands().is_empty());
    }

    #[test]
    fn describe_should_show_description() {
        let registry = registry();
        let mut session = MockSession::new();
        let output = registry
            .invoke("describe", &args(&["help"]), &mut session)
            .unwrap();
        assert_eq!(
            output,
            CommandOutput::Text("help: List all registered commands".into())
        );

        let err = registry
            .invoke("describe", &args(&["nope"]), &mut session)
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Registry(RegistryError::NotRegistered(_))
        ));
    }

    #[test]
    fn buffer_and_windows_should_render_session_state() {
        let registry = registry();
        let mut session = MockSession::new().with_buffer(BufferHandle {
            number: 2,
            name: "notes.md".into(),
            line_count: 10,
            modified: true,
        });

        let output = registry.invoke("get_curr_buffer", &[], &mut session).unwrap();
        assert_eq!(
            output,
            CommandOutput::Text("buffer 2: notes.md (10 lines, modified)".into())
        );

        let output = registry.invoke("get_windows", &[], &mut session).unwrap();
        assert_eq!(
            output,
            CommandOutput::Lines(vec!["window 1000 (#1 in tab 1): buffer 1, 80x24".into()])
        );
    }

    #[test]
    fn cmd_should_join_arguments() {
        let registry = registry();
        let mut session = MockSession::new();
        registry
            .invoke("cmd", &args(&["echo", "'hello", "world'"]), &mut session)
            .unwrap();
        assert_eq!(session.executed_commands(), ["echo 'hello world'"]);
    }

    #[test]
    fn variables_should_round_trip_through_session() {
        let registry = registry();
        let mut session = MockSession::new();

        registry
            .invoke("set_var", &args(&["global_var", "[1,", "2,", "3]"]), &mut session)
            .unwrap();
        registry
            .invoke("set_var", &args(&["greeting", "hello", "there"]), &mut session)
            .unwrap();

        assert_eq!(session.variable("global_var"), Some(&json!([1, 2, 3])));
        assert_eq!(session.variable("greeting"), Some(&json!("hello there")));

        let output = registry
            .invoke("get_var", &args(&["global_var"]), &mut session)
            .unwrap();
        assert_eq!(output, CommandOutput::Value(json!([1, 2, 3])));
    }

    #[test]
    fn session_failures_should_propagate() {
        let registry = registry();
        let mut session = MockSession::new();
        session.fail_next(SessionError::Disconnected);

        let err = registry.invoke("get_windows", &[], &mut session).unwrap_err();
        assert!(matches!(err, CommandError::Session(SessionError::Disconnected)));
    }

    #[test]
    fn quit_and_exit_should_end_loop() {
        let registry = registry();
        let mut session = MockSession::new();
        assert_eq!(
            registry.invoke("quit", &[], &mut session).unwrap(),
            CommandOutput::Quit
        );
        assert_eq!(
            registry.invoke("exit", &[], &mut session).unwrap(),
            CommandOutput::Quit
        );
    }
}
