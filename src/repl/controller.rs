//! # REPL Application Controller
//!
//! Owns the dispatch loop: prompt, read a line, route it through the
//! registry, print what came back, repeat. Every failure raised while
//! dispatching a line is reported and the loop carries on; only a broken
//! output stream ends it early.

use std::io::{self, Stdout, Write};

use anyhow::Result;

use crate::config::Config;
use crate::repl::command::{CommandError, CommandOutput};
use crate::repl::commands::builtin_registry;
use crate::repl::frame::DispatchFrame;
use crate::repl::io::{LineSource, StdinLineSource};
use crate::repl::registry::{CommandRegistry, RegistryError};
use crate::session::{EditorSession, SessionError};

/// Counters for the lines handled so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub dispatched: usize,
    pub failed: usize,
}

pub struct AppController<S: EditorSession, LS: LineSource, W: Write> {
    registry: CommandRegistry,
    session: S,
    line_source: LS,
    output: W,
    prompt: String,
    stats: LoopStats,
    should_quit: bool,
}

impl<S: EditorSession> AppController<S, StdinLineSource, Stdout> {
    /// Controller reading stdin and writing stdout, with the built-in commands
    pub fn new(session: S, config: &Config) -> Result<Self> {
        let registry = builtin_registry(config)?;
        Ok(Self::with_io_streams(
            registry,
            session,
            StdinLineSource::new(),
            io::stdout(),
            &config.prompt,
        ))
    }
}

impl<S: EditorSession, LS: LineSource, W: Write> AppController<S, LS, W> {
    /// Create a controller with injected I/O streams (dependency injection)
    pub fn with_io_streams(
        registry: CommandRegistry,
        session: S,
        line_source: LS,
        output: W,
        prompt: &str,
    ) -> Self {
        Self {
            registry,
            session,
            line_source,
            output,
            prompt: prompt.to_string(),
            stats: LoopStats::default(),
            should_quit: false,
        }
    }

    /// Run until `quit`/`exit` or end of input
    pub fn run(&mut self) -> Result<()> {
        while !self.should_quit {
            if self.line_source.is_interactive() {
                write!(self.output, "{}", self.prompt)?;
                self.output.flush()?;
            }

            let Some(line) = self.line_source.read_line()? else {
                tracing::debug!("End of input");
                break;
            };
            self.dispatch_line(&line)?;
        }

        tracing::info!(
            "Session finished: {} line(s) dispatched, {} failed",
            self.stats.dispatched,
            self.stats.failed
        );
        Ok(())
    }

    /// Handle one input line and print its result or error
    ///
    /// Only output failures are returned; command failures are printed.
    pub fn dispatch_line(&mut self, line: &str) -> Result<()> {
        let frame = DispatchFrame::parse(line);
        self.stats.dispatched += 1;
        tracing::debug!(
            "Dispatching '{}' with {:?}",
            frame.command_name(),
            frame.arguments()
        );

        match self
            .registry
            .invoke(frame.command_name(), frame.arguments(), &mut self.session)
        {
            Ok(CommandOutput::Quit) => {
                self.should_quit = true;
            }
            Ok(output) => {
                if !output.is_empty() {
                    writeln!(self.output, "{output}")?;
                }
            }
            Err(error) => {
                self.stats.failed += 1;
                tracing::warn!("'{}' failed: {}", frame.raw_input(), error);
                writeln!(self.output, "{}", error_message(&error))?;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Add a command after construction
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Single-line message for a failed dispatch
pub fn error_message(error: &CommandError) -> String {
    match error {
        CommandError::Registry(RegistryError::NotRegistered(name)) if name.is_empty() => {
            "error: no command given (try 'help')".to_string()
        }
        CommandError::Registry(RegistryError::NotRegistered(name)) => {
            format!("error: command '{name}' is not registered (try 'help')")
        }
        CommandError::Usage { usage, .. } => format!("usage: {usage}"),
        CommandError::Session(SessionError::SessionTimeout(timeout)) => {
            format!("error: editor did not answer within {timeout:?}")
        }
        CommandError::Session(SessionError::Disconnected) => {
            "error: editor session is gone, restart vimline to attach again".to_string()
        }
        CommandError::Session(SessionError::Remote { message }) => format!("editor: {message}"),
        other => format!("error: {}", single_line(&other.to_string())),
    }
}

fn single_line(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join(" ")
}
