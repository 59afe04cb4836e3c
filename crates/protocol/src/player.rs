//! Player state and player update payloads.
//!
//! Filters are carried as opaque JSON: their audio semantics belong to the
//! player layer, not to the wire contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::track::RawTrack;

/// Player state as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LavalinkPlayer {
	pub guild_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub track: Option<RawTrack>,
	pub volume: u16,
	pub paused: bool,
	pub voice: PlayerVoice,
	#[serde(default)]
	pub filters: Value,
}

/// Voice connection state of a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerVoice {
	pub token: String,
	pub endpoint: String,
	pub session_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub connected: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ping: Option<i64>,
}

/// Voice credentials sent when updating a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceOptions {
	pub token: String,
	pub endpoint: String,
	pub session_id: String,
}

impl From<PlayerVoice> for VoiceOptions {
	fn from(voice: PlayerVoice) -> Self {
		Self {
			token: voice.token,
			endpoint: voice.endpoint,
			session_id: voice.session_id,
		}
	}
}

/// Track selection in a player update.
///
/// `encoded: Some(None)` serializes as `null` and stops the current track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerTrack {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub encoded: Option<Option<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identifier: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_data: Option<Value>,
}

/// Partial player update; absent fields are left unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerOptions {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub track: Option<UpdatePlayerTrack>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identifier: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end_time: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub volume: Option<u16>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub paused: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub filters: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub voice: Option<VoiceOptions>,
}

/// A player update addressed to one guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerInfo {
	pub guild_id: String,
	pub player_options: UpdatePlayerOptions,
	/// When true the server keeps an already-playing track.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub no_replace: Option<bool>,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn update_options_skip_absent_fields() {
		let options = UpdatePlayerOptions {
			volume: Some(80),
			paused: Some(false),
			..Default::default()
		};

		assert_eq!(serde_json::to_value(&options).unwrap(), json!({"volume": 80, "paused": false}));
	}

	#[test]
	fn stop_track_serializes_null_encoded() {
		let options = UpdatePlayerOptions {
			track: Some(UpdatePlayerTrack {
				encoded: Some(None),
				..Default::default()
			}),
			..Default::default()
		};

		assert_eq!(serde_json::to_value(&options).unwrap(), json!({"track": {"encoded": null}}));
	}

	#[test]
	fn player_parses_without_track() {
		let player: LavalinkPlayer = serde_json::from_value(json!({
			"guildId": "1234",
			"volume": 100,
			"paused": false,
			"voice": {"token": "t", "endpoint": "e", "sessionId": "s", "connected": true, "ping": 12},
			"filters": {}
		}))
		.unwrap();

		assert!(player.track.is_none());
		assert_eq!(player.voice.ping, Some(12));
		assert_eq!(VoiceOptions::from(player.voice).session_id, "s");
	}
}
