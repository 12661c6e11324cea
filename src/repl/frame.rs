//! One line of user input split into a command name and its arguments.

/// Parsed form of a single input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFrame {
    raw_input: String,
    command_name: String,
    arguments: Vec<String>,
}

impl DispatchFrame {
    /// Split `raw_input` on whitespace; the first token names the command
    ///
    /// A blank line yields an empty command name.
    pub fn parse(raw_input: &str) -> Self {
        let mut tokens = raw_input.split_whitespace().map(str::to_string);
        let command_name = tokens.next().unwrap_or_default();
        Self {
            raw_input: raw_input.to_string(),
            command_name,
            arguments: tokens.collect(),
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}
