//! # Terminal I/O Implementation
//!
//! Reads lines from the process's standard input.

use std::io::{self, BufRead};

use anyhow::Result;

use super::LineSource;

pub struct StdinLineSource {
    stdin: io::Stdin,
    interactive: bool,
}

impl StdinLineSource {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            interactive: atty::is(atty::Stream::Stdin),
        }
    }
}

impl Default for StdinLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLineSource {
    fn read_line(&mut self) -> Result<Option<String>> {
        Ok(read_lossy_line(&mut self.stdin.lock())?)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Read one line, replacing invalid UTF-8 with U+FFFD instead of failing
fn read_lossy_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut bytes = Vec::new();
    if reader.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&bytes).into_owned();
    Ok(Some(strip_line_ending(line)))
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_ending_should_handle_unix_and_windows_endings() {
        assert_eq!(strip_line_ending("help\n".into()), "help");
        assert_eq!(strip_line_ending("help\r\n".into()), "help");
        assert_eq!(strip_line_ending("help".into()), "help");
        assert_eq!(strip_line_ending("\n".into()), "");
    }

    #[test]
    fn read_lossy_line_should_keep_going_after_invalid_utf8() {
        let mut input = io::Cursor::new(b"caf\xe9\nhelp\r\nquit".to_vec());

        assert_eq!(
            read_lossy_line(&mut input).unwrap().as_deref(),
            Some("caf\u{fffd}")
        );
        assert_eq!(read_lossy_line(&mut input).unwrap().as_deref(), Some("help"));
        assert_eq!(read_lossy_line(&mut input).unwrap().as_deref(), Some("quit"));
        assert_eq!(read_lossy_line(&mut input).unwrap(), None);
    }
}
