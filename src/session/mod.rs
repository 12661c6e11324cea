//! # Editor Session Layer
//!
//! Everything that talks to (or finds) a running editor.
//!
//! ```text
//! SessionIdentity ──▶ locator::locate() ──▶ SocketDescriptor
//!                                                 │
//!                                                 ▼
//!                 commands ──▶ dyn EditorSession (NvimSession / MockSession)
//! ```
//!
//! The dispatch loop only ever sees the [`EditorSession`] trait, so command
//! implementations can be exercised against [`mock::MockSession`] without a
//! running editor.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod launcher;
pub mod locator;
pub mod mock;
pub mod nvim;

pub use locator::{locate, SelectionPolicy, SessionLocator, SocketDescriptor};
pub use mock::MockSession;
pub use nvim::NvimSession;

/// Summary of the editor's current buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferHandle {
    pub number: i64,
    pub name: String,
    pub line_count: i64,
    pub modified: bool,
}

impl fmt::Display for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "[No Name]"
        } else {
            &self.name
        };
        write!(
            f,
            "buffer {}: {} ({} lines{})",
            self.number,
            name,
            self.line_count,
            if self.modified { ", modified" } else { "" }
        )
    }
}

/// Summary of one editor window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowHandle {
    pub id: i64,
    pub number: i64,
    pub buffer: i64,
    pub width: i64,
    pub height: i64,
    pub tab: i64,
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window {} (#{} in tab {}): buffer {}, {}x{}",
            self.id, self.number, self.tab, self.buffer, self.width, self.height
        )
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no editor session found for identity {identity_hash} in {}", .directory.display())]
    SessionNotFound {
        identity_hash: String,
        directory: PathBuf,
    },

    #[error("multiple editor sessions found for identity {identity_hash}: {}", .candidates.join(", "))]
    MultipleSessionsFound {
        identity_hash: String,
        candidates: Vec<String>,
    },

    #[error("cannot read socket directory {}: {source}", .directory.display())]
    SocketDirectory {
        directory: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot connect to editor at {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("editor did not answer within {0:?}")]
    SessionTimeout(Duration),

    #[error("editor session closed the connection")]
    Disconnected,

    #[error("editor error: {message}")]
    Remote { message: String },

    #[error("editor I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode request: {0}")]
    Encode(String),

    #[error("failed to decode editor response: {0}")]
    Decode(String),

    #[error("failed to launch '{editor}': {source}")]
    Launch {
        editor: String,
        #[source]
        source: io::Error,
    },
}

/// Remote control capability of an attached editor
///
/// Implementations are already connected; establishing the connection is a
/// startup concern and never happens through this trait.
pub trait EditorSession {
    fn get_current_buffer(&mut self) -> Result<BufferHandle, SessionError>;

    fn get_windows(&mut self) -> Result<Vec<WindowHandle>, SessionError>;

    /// Execute an ex command (`:` command line) in the editor
    fn run_editor_command(&mut self, command_text: &str) -> Result<(), SessionError>;

    /// Set a global (`g:`) variable
    fn set_variable(&mut self, name: &str, value: Value) -> Result<(), SessionError>;

    /// Read a global (`g:`) variable
    fn get_variable(&mut self, name: &str) -> Result<Value, SessionError>;

    /// Evaluate an editor expression
    fn eval(&mut self, expression: &str) -> Result<Value, SessionError>;

    /// The editor's current working directory
    fn working_directory(&mut self) -> Result<String, SessionError>;
}
