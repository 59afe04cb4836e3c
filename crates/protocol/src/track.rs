//! Media records and the payloads that group them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single media record as returned by a node server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrack {
	/// Opaque server-encoded identifier, used to play or decode the track.
	pub encoded: String,
	pub info: TrackInfo,
	/// Plugin metadata, passed through untouched.
	#[serde(default)]
	pub plugin_info: Value,
	/// Caller-attached data echoed back by v4 servers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_data: Option<Value>,
}

/// Descriptive attributes of a media record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
	pub identifier: String,
	pub is_seekable: bool,
	pub author: String,
	/// Duration in milliseconds.
	pub length: u64,
	pub is_stream: bool,
	/// Playback position in milliseconds.
	pub position: u64,
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub uri: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub artwork_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub isrc: Option<String>,
	pub source_name: String,
}

/// A named collection of media records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
	/// Present on nodelink playlists only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub encoded: Option<String>,
	pub info: PlaylistInfo,
	#[serde(default)]
	pub plugin_info: Value,
	#[serde(default)]
	pub tracks: Vec<RawTrack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistInfo {
	pub name: String,
	/// Index of the selected track, `-1` when none is selected.
	#[serde(default = "no_selection")]
	pub selected_track: i32,
}

fn no_selection() -> i32 {
	-1
}

impl PlaylistInfo {
	/// Returns the selected track index, if any.
	pub fn selected(&self) -> Option<usize> {
		usize::try_from(self.selected_track).ok()
	}
}

/// How bad a load failure is, as classified by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	/// The cause is known and expected (e.g. unavailable in region).
	Common,
	/// The cause might not be exactly known, but is possibly caused by outside factors.
	Suspicious,
	/// The probable cause is an issue with the server or a bug.
	Fault,
}

/// Structured failure description carried by error results and exception events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
	#[serde(default)]
	pub message: Option<String>,
	pub severity: Severity,
	pub cause: String,
}
