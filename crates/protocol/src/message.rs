//! Socket messages that callers above the connection layer commonly inspect.
//!
//! The connection forwards every inbound frame as raw JSON; these helpers let
//! the owning node pick out the messages it cares about.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opcode field present on every socket message.
pub const OP_FIELD: &str = "op";

/// `op: "ready"` message sent once the server has accepted the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyMessage {
	/// True when the server reattached a previous session.
	#[serde(default)]
	pub resumed: bool,
	pub session_id: String,
}

impl ReadyMessage {
	/// Extracts a ready message from a raw socket payload.
	pub fn from_message(value: &Value) -> Option<Self> {
		if value.get(OP_FIELD).and_then(Value::as_str) != Some("ready") {
			return None;
		}
		serde_json::from_value(value.clone()).ok()
	}
}

/// Returns the opcode of a raw socket payload.
pub fn op_of(value: &Value) -> Option<&str> {
	value.get(OP_FIELD).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn ready_message_extracted() {
		let ready = ReadyMessage::from_message(&json!({"op": "ready", "resumed": false, "sessionId": "abc"})).unwrap();
		assert_eq!(ready.session_id, "abc");
		assert!(!ready.resumed);
	}

	#[test]
	fn other_ops_are_not_ready() {
		let stats = json!({"op": "stats", "players": 1});
		assert!(ReadyMessage::from_message(&stats).is_none());
		assert_eq!(op_of(&stats), Some("stats"));
	}
}
