use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("track could not be decoded: {0}")]
	UndecodableTrack(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Driver(#[from] tidelink::Error),
}

impl CliError {
	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::Config(_) => ErrorCode::ConfigError,
			CliError::UndecodableTrack(_) => ErrorCode::InvalidInput,
			CliError::Io(_) => ErrorCode::IoError,
			CliError::Json(_) => ErrorCode::ParseError,
			CliError::Driver(err) => driver_code(err),
		}
	}

	/// Converts to the structured error carried by the output envelope.
	pub fn to_command_error(&self) -> CommandError {
		CommandError {
			code: self.code(),
			message: self.to_string(),
		}
	}
}

fn driver_code(err: &tidelink::Error) -> ErrorCode {
	if err.is_configuration() {
		ErrorCode::ConfigError
	} else if err.is_session() {
		ErrorCode::SessionError
	} else if err.is_parse() {
		ErrorCode::ParseError
	} else if err.is_timeout() {
		ErrorCode::Timeout
	} else if matches!(err, tidelink::Error::UnsupportedCapability { .. }) {
		ErrorCode::Unsupported
	} else {
		ErrorCode::TransportError
	}
}
