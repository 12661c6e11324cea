//! # I/O Abstraction Layer
//!
//! The dispatch loop reads lines through [`LineSource`] and writes through any
//! `std::io::Write`, so it can be driven by a script in tests.
//!
//! ```text
//! Production:  AppController ──▶ StdinLineSource ──▶ std::io::stdin()
//!                            ──▶ io::Stdout
//!
//! Testing:     AppController ──▶ MockLineSource  ──▶ VecDeque<String>
//!                            ──▶ Vec<u8>
//! ```

use anyhow::Result;

pub mod mock;
pub mod terminal;

pub use mock::MockLineSource;
pub use terminal::StdinLineSource;

/// Source of input lines for the dispatch loop
pub trait LineSource {
    /// Block for the next line, without its line terminator
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Whether a person is typing (controls the prompt)
    fn is_interactive(&self) -> bool;
}
