//! # Mock Editor Session for Testing
//!
//! In-memory [`EditorSession`] that records every command it is asked to run
//! and keeps variables in a map. A failure can be queued to make the next
//! call return an error.

use std::collections::HashMap;

use serde_json::Value;

use super::{BufferHandle, EditorSession, SessionError, WindowHandle};

pub struct MockSession {
    buffer: BufferHandle,
    windows: Vec<WindowHandle>,
    working_directory: String,
    variables: HashMap<String, Value>,
    executed: Vec<String>,
    evaluated: Vec<String>,
    pending_failure: Option<SessionError>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            buffer: BufferHandle {
                number: 1,
                name: String::new(),
                line_count: 1,
                modified: false,
            },
            windows: vec![WindowHandle {
                id: 1000,
                number: 1,
                buffer: 1,
                width: 80,
                height: 24,
                tab: 1,
            }],
            working_directory: "/".to_string(),
            variables: HashMap::new(),
            executed: Vec::new(),
            evaluated: Vec::new(),
            pending_failure: None,
        }
    }

    pub fn with_buffer(mut self, buffer: BufferHandle) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_windows(mut self, windows: Vec<WindowHandle>) -> Self {
        self.windows = windows;
        self
    }

    pub fn with_working_directory(mut self, directory: impl Into<String>) -> Self {
        self.working_directory = directory.into();
        self
    }

    /// Make the next session call fail with `error`
    pub fn fail_next(&mut self, error: SessionError) {
        self.pending_failure = Some(error);
    }

    /// Editor commands run so far, in order
    pub fn executed_commands(&self) -> &[String] {
        &self.executed
    }

    /// Expressions evaluated so far, in order
    pub fn evaluated_expressions(&self) -> &[String] {
        &self.evaluated
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    fn check(&mut self) -> Result<(), SessionError> {
        match self.pending_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession for MockSession {
    fn get_current_buffer(&mut self) -> Result<BufferHandle, SessionError> {
        self.check()?;
        Ok(self.buffer.clone())
    }

    fn get_windows(&mut self) -> Result<Vec<WindowHandle>, SessionError> {
        self.check()?;
        Ok(self.windows.clone())
    }

    fn run_editor_command(&mut self, command_text: &str) -> Result<(), SessionError> {
        self.check()?;
        self.executed.push(command_text.to_string());
        Ok(())
    }

    fn set_variable(&mut self, name: &str, value: Value) -> Result<(), SessionError> {
        self.check()?;
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    fn get_variable(&mut self, name: &str) -> Result<Value, SessionError> {
        self.check()?;
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::Remote {
                message: format!("Key not found: {name}"),
            })
    }

    fn eval(&mut self, expression: &str) -> Result<Value, SessionError> {
        self.check()?;
        self.evaluated.push(expression.to_string());
        Ok(Value::String(expression.to_string()))
    }

    fn working_directory(&mut self) -> Result<String, SessionError> {
        self.check()?;
        Ok(self.working_directory.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mock_should_record_commands_and_variables() {
        let mut session = MockSession::new();
        session.run_editor_command("vsplit").unwrap();
        session.set_variable("global_var", json!([1, 2, 3])).unwrap();

        assert_eq!(session.executed_commands(), ["vsplit"]);
        assert_eq!(session.get_variable("global_var").unwrap(), json!([1, 2, 3]));
        assert!(session.get_variable("other").is_err());
    }

    #[test]
    fn queued_failure_should_affect_only_next_call() {
        let mut session = MockSession::new();
        session.fail_next(SessionError::Disconnected);

        assert!(matches!(
            session.run_editor_command("q"),
            Err(SessionError::Disconnected)
        ));
        assert!(session.run_editor_command("q").is_ok());
        assert_eq!(session.executed_commands(), ["q"]);
    }
}
