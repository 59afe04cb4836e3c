//! Synchronized lyrics payload returned by nodelink's `/loadlyrics` route.

use serde::{Deserialize, Serialize};

/// Lyrics response. `data` is `None` when the server found nothing (`{}` on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsResult {
	/// Load-type tag after dialect translation.
	#[serde(default)]
	pub load_type: String,
	#[serde(default, deserialize_with = "lyrics_or_empty")]
	pub data: Option<Lyrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lyrics {
	pub name: String,
	pub synced: bool,
	#[serde(default)]
	pub data: Vec<LyricLine>,
	/// Right-to-left script.
	#[serde(default)]
	pub rtl: bool,
}

/// One timed line; times are milliseconds from track start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
	pub start_time: u64,
	pub end_time: u64,
	pub text: String,
}

fn lyrics_or_empty<'de, D>(deserializer: D) -> Result<Option<Lyrics>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	match &value {
		serde_json::Value::Null => Ok(None),
		serde_json::Value::Object(map) if map.is_empty() => Ok(None),
		_ => serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom),
	}
}

impl Lyrics {
	/// Line active at `position_ms`, if any.
	pub fn line_at(&self, position_ms: u64) -> Option<&LyricLine> {
		self.data.iter().find(|line| line.start_time <= position_ms && position_ms < line.end_time)
	}
}
