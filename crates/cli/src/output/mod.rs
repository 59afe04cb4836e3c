//! Structured output envelope for CLI commands.
//!
//! One-shot commands print a single result envelope on stdout:
//!
//! ```json
//! { "ok": true, "command": "load", "data": { "loadType": "search", "data": [ ... ] }, "timings": { "durationMs": 84 } }
//! ```
//!
//! `data` is `null` when the server answered without a result (for example a
//! 404 or a 204). Failures carry an `error` object instead. `listen` prints one
//! [`event_json`] line per socket event.


use std::io::{self, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tidelink::SocketEvent;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Pretty-printed JSON (default)
	#[default]
	Json,
	/// One compact JSON document per line
	Ndjson,
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Json => write!(f, "json"),
			OutputFormat::Ndjson => write!(f, "ndjson"),
		}
	}
}

/// The result envelope printed by one-shot commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	/// Present on success; `null` when the server returned no result.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<Option<T>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
}

impl<T: Serialize> CommandResult<T> {
	pub fn success(command: &str, data: Option<T>, elapsed: Duration) -> Self {
		Self {
			ok: true,
			command: command.to_string(),
			data: Some(data),
			error: None,
			timings: Some(Timings {
				duration_ms: elapsed.as_millis() as u64,
			}),
		}
	}

	pub fn failure(command: &str, error: CommandError) -> Self {
		Self {
			ok: false,
			command: command.to_string(),
			data: None,
			error: Some(error),
			timings: None,
		}
	}
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

/// Error information for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Options missing or unusable
	ConfigError,
	/// A session-scoped call was made before the server announced a session
	SessionError,
	/// The server answered 200 with a malformed body
	ParseError,
	/// HTTP or socket transport failure
	TransportError,
	/// Request timed out in the transport
	Timeout,
	/// The dialect does not offer the requested operation
	Unsupported,
	/// Invalid input provided
	InvalidInput,
	/// File I/O error
	IoError,
}

/// Serializes one document in `format`.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> String {
	let rendered = match format {
		OutputFormat::Json => serde_json::to_string_pretty(value),
		OutputFormat::Ndjson => serde_json::to_string(value),
	};
	rendered.unwrap_or_else(|e| json!({"ok": false, "error": {"code": "PARSE_ERROR", "message": e.to_string()}}).to_string())
}

pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	println!("{}", render(result, format));
}

/// Prints one NDJSON line and flushes, so consumers see events as they happen.
pub fn print_line(value: &Value) -> io::Result<()> {
	let mut stdout = io::stdout().lock();
	writeln!(stdout, "{value}")?;
	stdout.flush()
}

pub fn print_error_stderr(error: &CommandError) {
	eprintln!("error[{}]: {}", render(&error.code, OutputFormat::Ndjson).trim_matches('"'), error.message);
}

/// JSON form of a socket event.
pub fn event_json(event: &SocketEvent) -> Value {
	match event {
		SocketEvent::Open => json!({"event": "open"}),
		SocketEvent::Message(data) => json!({"event": "message", "data": data}),
		SocketEvent::Error(message) => json!({"event": "error", "message": message}),
		SocketEvent::Close { code, reason } => json!({"event": "close", "code": code, "reason": reason}),
	}
}
