//! Session resume payloads.

use serde::{Deserialize, Serialize};

/// Body of a session update, echoed back by the server on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
	/// Whether the server keeps session state alive after the socket drops.
	pub resuming: bool,
	/// Seconds the server waits for a resuming client.
	pub timeout: u64,
}
