//! # vimline - Drive a Running Neovim from Your Shell
//!
//! vimline finds the Neovim instance that was started for a folder and
//! attaches to it over its Unix socket, then reads commands line by line.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  hash   ┌──────────────┐  socket  ┌───────────────┐
//! │   identity   │────────▶│   locator    │─────────▶│  NvimSession  │
//! │ (folder md5) │         │ (socket dir) │          │ (msgpack-rpc) │
//! └──────────────┘         └──────────────┘          └───────────────┘
//!                                                            ▲
//!                                                            │ EditorSession
//! ┌──────────────┐  line   ┌──────────────┐  invoke  ┌───────┴───────┐
//! │  LineSource  │────────▶│AppController │─────────▶│CommandRegistry│
//! └──────────────┘         └──────────────┘          └───────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod identity;
pub mod repl;
pub mod session;

// Re-export main types for easy access
pub use config::Config;
pub use identity::SessionIdentity;
pub use repl::*;
pub use session::{EditorSession, MockSession, NvimSession, SessionError};
