//! # Neovim Session
//!
//! Blocking msgpack-RPC client for a Neovim instance listening on a Unix
//! socket. One request is in flight at a time: the dispatch loop is
//! single-threaded, so the client writes a request and reads until the
//! matching response arrives.
//!
//! Wire format (msgpack arrays):
//!
//! ```text
//! request:      [0, msgid, method, params]
//! response:     [1, msgid, error, result]
//! notification: [2, method, params]
//! ```

use std::fmt;
use std::io::{self, BufReader, ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{BufferHandle, EditorSession, SessionError, WindowHandle};

const REQUEST: u64 = 0;
const RESPONSE: u64 = 1;
const NOTIFICATION: u64 = 2;

const BUFFER_EXPR: &str =
    "{'number': bufnr('%'), 'name': bufname('%'), 'line_count': line('$'), 'modified': &modified}";

const WINDOWS_EXPR: &str = "map(getwininfo(), {_, w -> {'id': w.winid, 'number': w.winnr, \
     'buffer': w.bufnr, 'width': w.width, 'height': w.height, 'tab': w.tabnr}})";

#[derive(Deserialize)]
struct RawBuffer {
    number: i64,
    name: String,
    line_count: i64,
    modified: i64,
}

/// Connection to a running Neovim
pub struct NvimSession {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
    socket_path: PathBuf,
    timeout: Duration,
    next_id: u32,
}

impl NvimSession {
    /// Attach to the editor listening on `socket_path`
    ///
    /// Every later read and write on the connection is bounded by `timeout`.
    pub fn connect(socket_path: &Path, timeout: Duration) -> Result<Self, SessionError> {
        let connect_err = |source| SessionError::Connect {
            path: socket_path.to_path_buf(),
            source,
        };

        let stream = UnixStream::connect(socket_path).map_err(connect_err)?;
        stream
            .set_read_timeout(Some(timeout))
            .map_err(connect_err)?;
        stream
            .set_write_timeout(Some(timeout))
            .map_err(connect_err)?;
        let writer = stream.try_clone().map_err(connect_err)?;

        tracing::info!("Attached to editor at {}", socket_path.display());

        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            socket_path: socket_path.to_path_buf(),
            timeout,
            next_id: 0,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Issue one RPC call and wait for its result
    pub fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value, SessionError> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        tracing::debug!("rpc -> #{} {} {:?}", id, method, params);
        let request = rmp_serde::to_vec(&(REQUEST, id, method, params))
            .map_err(|e| SessionError::Encode(e.to_string()))?;
        self.writer
            .write_all(&request)
            .and_then(|()| self.writer.flush())
            .map_err(|e| self.map_io_error(e))?;

        loop {
            let WireValue(message) =
                rmp_serde::from_read(&mut self.reader).map_err(|e| self.map_decode_error(e))?;

            let mut items = match message {
                Value::Array(items) => items,
                other => {
                    return Err(SessionError::Decode(format!(
                        "expected a message array, got {other}"
                    )));
                }
            };

            match items.first().and_then(Value::as_u64) {
                Some(RESPONSE) if items.len() == 4 => {
                    if items[1].as_u64() != Some(u64::from(id)) {
                        // Late answer to a request that already timed out
                        tracing::debug!("rpc <- dropping stale response {}", items[1]);
                        continue;
                    }
                    let result = items.pop().unwrap_or(Value::Null);
                    let error = items.pop().unwrap_or(Value::Null);
                    if !error.is_null() {
                        tracing::debug!("rpc <- #{} error {}", id, error);
                        return Err(SessionError::Remote {
                            message: remote_message(&error),
                        });
                    }
                    tracing::debug!("rpc <- #{} {}", id, result);
                    return Ok(result);
                }
                Some(NOTIFICATION) => {
                    tracing::debug!("rpc <- ignoring notification {:?}", items.get(1));
                }
                _ => {
                    return Err(SessionError::Decode(format!(
                        "unexpected message {}",
                        Value::Array(items)
                    )));
                }
            }
        }
    }

    fn call_as<T: serde::de::DeserializeOwned>(
        &mut self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SessionError> {
        let value = self.call(method, params)?;
        serde_json::from_value(value).map_err(|e| SessionError::Decode(e.to_string()))
    }

    fn map_io_error(&self, err: io::Error) -> SessionError {
        match err.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => SessionError::SessionTimeout(self.timeout),
            ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
                SessionError::Disconnected
            }
            _ => SessionError::Io(err),
        }
    }

    fn map_decode_error(&self, err: rmp_serde::decode::Error) -> SessionError {
        match err {
            rmp_serde::decode::Error::InvalidMarkerRead(e)
            | rmp_serde::decode::Error::InvalidDataRead(e) => self.map_io_error(e),
            other => SessionError::Decode(other.to_string()),
        }
    }
}

/// A msgpack value read off the socket.
///
/// Everything maps onto JSON except binary data: Vim Blobs arrive as `bin`
/// and become an array of byte values, and ext types (buffer, window and
/// tabpage handles) become `[type, [bytes...]]`. Non-string map keys are
/// rendered as JSON text.
struct WireValue(Value);

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WireValueVisitor).map(WireValue)
    }
}

struct WireValueVisitor;

impl<'de> Visitor<'de> for WireValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a msgpack value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Array(v.iter().map(|b| Value::from(*b)).collect()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        self.visit_bytes(&v)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        WireValue::deserialize(deserializer).map(|w| w.0)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Value, D::Error> {
        WireValue::deserialize(deserializer).map(|w| w.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(WireValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Map::new();
        while let Some((WireValue(key), WireValue(value))) = map.next_entry()? {
            let key = match key {
                Value::String(key) => key,
                other => other.to_string(),
            };
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

/// Neovim reports errors as `[type, message]`
fn remote_message(error: &Value) -> String {
    match error {
        Value::Array(parts) => parts
            .iter()
            .find_map(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

impl EditorSession for NvimSession {
    fn get_current_buffer(&mut self) -> Result<BufferHandle, SessionError> {
        let raw: RawBuffer = self.call_as("nvim_eval", vec![json!(BUFFER_EXPR)])?;
        Ok(BufferHandle {
            number: raw.number,
            name: raw.name,
            line_count: raw.line_count,
            modified: raw.modified != 0,
        })
    }

    fn get_windows(&mut self) -> Result<Vec<WindowHandle>, SessionError> {
        self.call_as("nvim_eval", vec![json!(WINDOWS_EXPR)])
    }

    fn run_editor_command(&mut self, command_text: &str) -> Result<(), SessionError> {
        self.call("nvim_command", vec![json!(command_text)])?;
        Ok(())
    }

    fn set_variable(&mut self, name: &str, value: Value) -> Result<(), SessionError> {
        self.call("nvim_set_var", vec![json!(name), value])?;
        Ok(())
    }

    fn get_variable(&mut self, name: &str) -> Result<Value, SessionError> {
        self.call("nvim_get_var", vec![json!(name)])
    }

    fn eval(&mut self, expression: &str) -> Result<Value, SessionError> {
        self.call("nvim_eval", vec![json!(expression)])
    }

    fn working_directory(&mut self) -> Result<String, SessionError> {
        self.call_as("nvim_eval", vec![json!("getcwd()")])
    }
}
