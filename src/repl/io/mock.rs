//! # Mock I/O Implementation for Testing
//!
//! Feeds a fixed script of lines to the dispatch loop.

use std::collections::VecDeque;

use anyhow::Result;

use super::LineSource;

pub struct MockLineSource {
    lines: VecDeque<String>,
    interactive: bool,
}

impl MockLineSource {
    /// Create a source that yields `lines` and then end of input
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            interactive: false,
        }
    }

    /// Pretend a person is typing, so the prompt is printed
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Lines not consumed yet
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for MockLineSource {
    fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
