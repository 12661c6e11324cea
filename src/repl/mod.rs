//! # REPL
//!
//! The interactive half of vimline:
//!
//! ```text
//! LineSource ──▶ DispatchFrame ──▶ CommandRegistry ──▶ Command ──▶ EditorSession
//!                                        │
//!      Write ◀── CommandOutput / error ◀─┘
//! ```

pub mod command;
pub mod commands;
pub mod controller;
pub mod frame;
pub mod io;
pub mod registry;

pub use command::{Command, CommandContext, CommandError, CommandOutput};
pub use commands::{builtin_registry, register_builtin_commands, SearchCommand};
pub use controller::{AppController, LoopStats};
pub use frame::DispatchFrame;
pub use registry::{CommandEntry, CommandRegistry, RegistryError};
