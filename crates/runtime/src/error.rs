//! Error types for driver operations.
//!
//! Only hard failures are errors. A REST call answered with a non-200 status
//! is a soft failure: it is logged and surfaces as an absent (`None`) result.

use thiserror::Error;

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a node server.
#[derive(Debug, Error)]
pub enum Error {
	/// An operation was invoked before the driver was configured with `initial()`.
	#[error("Driver {driver} not registered by using initial()")]
	NotRegistered {
		/// Dialect id of the driver (e.g. `"nodelink@2"`)
		driver: &'static str,
	},

	/// A session-scoped request was made before any session id was known.
	#[error("Session id not initialized for driver {driver}. Wait for the node to connect.")]
	SessionNotInitialized { driver: &'static str },

	/// Options could not be turned into a valid URL or header.
	#[error("Invalid driver configuration: {0}")]
	InvalidConfig(String),

	/// The server answered 200 with a body that is not the expected JSON.
	#[error("Malformed response body: {0}")]
	Parse(#[from] serde_json::Error),

	/// The HTTP transport failed before any status was received.
	#[error("HTTP transport error: {0}")]
	Http(#[from] reqwest::Error),

	/// The socket request could not be built or sent.
	#[error("WebSocket error: {0}")]
	WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

	/// A socket was opened outside of a Tokio runtime.
	#[error("No async runtime available: {0}")]
	Runtime(String),

	/// The dialect does not expose the named capability.
	#[error("Driver {driver} does not support capability '{name}'")]
	UnsupportedCapability { driver: &'static str, name: String },
}

impl Error {
	/// Returns true for caller bugs: using a driver before configuring it, or
	/// configuring it with unusable options.
	pub fn is_configuration(&self) -> bool {
		matches!(self, Error::NotRegistered { .. } | Error::InvalidConfig(_))
	}

	/// Returns true if a session was required but none existed.
	pub fn is_session(&self) -> bool {
		matches!(self, Error::SessionNotInitialized { .. })
	}

	/// Returns true if a 200 response carried a malformed body.
	pub fn is_parse(&self) -> bool {
		matches!(self, Error::Parse(_))
	}

	/// Returns true if the HTTP request timed out in the transport layer.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Http(err) => err.is_timeout(),
			_ => false,
		}
	}
}
