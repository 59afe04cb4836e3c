//! Canonical load-result envelope.
//!
//! Every dialect's load response is translated into [`LoadResult`] before it
//! reaches the caller. On the wire the envelope is adjacently tagged:
//!
//! ```json
//! { "loadType": "playlist", "data": { "info": { ... }, "tracks": [ ... ] } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::load_type::{LOAD_TYPE_FIELD, LoadType};
use crate::track::{Exception, Playlist, RawTrack};

/// Result of loading an identifier or search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "loadType", content = "data", rename_all = "lowercase")]
pub enum LoadResult {
	Track(RawTrack),
	Playlist(Playlist),
	Search(Vec<RawTrack>),
	Empty(EmptyData),
	Error(Exception),
}

/// Payload of an empty result (`{}` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyData {}

impl LoadResult {
	/// Decodes an envelope that went through dialect translation.
	///
	/// Translation collapses unknown dialect tags to `track`, so a `track`
	/// envelope whose payload is not a single media record is classified by
	/// shape instead: an array is a search, `{}` or null is empty, an object
	/// with `severity` is an error, and an object with `tracks` is a playlist.
	pub fn from_translated(value: Value) -> serde_json::Result<Self> {
		let strict = match serde_json::from_value::<Self>(value.clone()) {
			Ok(result) => return Ok(result),
			Err(e) => e,
		};
		if value.get(LOAD_TYPE_FIELD).and_then(Value::as_str) != Some(LoadType::Track.as_str()) {
			return Err(strict);
		}

		let data = value.get("data").cloned().unwrap_or(Value::Null);
		match &data {
			Value::Null => Ok(LoadResult::Empty(EmptyData {})),
			Value::Object(map) if map.is_empty() => Ok(LoadResult::Empty(EmptyData {})),
			Value::Array(_) => serde_json::from_value(data).map(LoadResult::Search),
			Value::Object(map) if map.contains_key("severity") => serde_json::from_value(data).map(LoadResult::Error),
			Value::Object(map) if map.contains_key("tracks") => serde_json::from_value(data).map(LoadResult::Playlist),
			_ => Err(strict),
		}
	}

	/// Canonical tag of this result.
	pub fn load_type(&self) -> LoadType {
		match self {
			LoadResult::Track(_) => LoadType::Track,
			LoadResult::Playlist(_) => LoadType::Playlist,
			LoadResult::Search(_) => LoadType::Search,
			LoadResult::Empty(_) => LoadType::Empty,
			LoadResult::Error(_) => LoadType::Error,
		}
	}

	/// Media records carried by this result, in server order.
	pub fn tracks(&self) -> &[RawTrack] {
		match self {
			LoadResult::Track(track) => std::slice::from_ref(track),
			LoadResult::Playlist(playlist) => &playlist.tracks,
			LoadResult::Search(tracks) => tracks,
			LoadResult::Empty(_) | LoadResult::Error(_) => &[],
		}
	}

	/// Returns the failure description for error results.
	pub fn exception(&self) -> Option<&Exception> {
		match self {
			LoadResult::Error(exception) => Some(exception),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn track_json(id: &str) -> serde_json::Value {
		json!({
			"encoded": format!("enc-{id}"),
			"info": {
				"identifier": id,
				"isSeekable": true,
				"author": "author",
				"length": 1000,
				"isStream": false,
				"position": 0,
				"title": format!("title {id}"),
				"sourceName": "youtube"
			},
			"pluginInfo": {}
		})
	}

	#[test]
	fn parses_playlist_envelope() {
		let result: LoadResult = serde_json::from_value(json!({
			"loadType": "playlist",
			"data": {
				"info": {"name": "Album", "selectedTrack": 0},
				"pluginInfo": {},
				"tracks": [track_json("a"), track_json("b")]
			}
		}))
		.unwrap();

		assert_eq!(result.load_type(), LoadType::Playlist);
		let ids: Vec<_> = result.tracks().iter().map(|t| t.info.identifier.as_str()).collect();
		assert_eq!(ids, ["a", "b"]);
	}

	#[test]
	fn parses_search_and_track_envelopes() {
		let search: LoadResult = serde_json::from_value(json!({
			"loadType": "search",
			"data": [track_json("x"), track_json("y"), track_json("z")]
		}))
		.unwrap();
		assert_eq!(search.tracks().len(), 3);

		let track: LoadResult = serde_json::from_value(json!({"loadType": "track", "data": track_json("solo")})).unwrap();
		assert_eq!(track.tracks()[0].encoded, "enc-solo");
	}

	#[test]
	fn parses_empty_envelope() {
		let result: LoadResult = serde_json::from_value(json!({"loadType": "empty", "data": {}})).unwrap();
		assert_eq!(result, LoadResult::Empty(EmptyData {}));
		assert!(result.tracks().is_empty());
		assert_eq!(serde_json::to_value(&result).unwrap(), json!({"loadType": "empty", "data": {}}));
	}

	#[test]
	fn parses_error_envelope() {
		let result: LoadResult = serde_json::from_value(json!({
			"loadType": "error",
			"data": {"message": "boom", "severity": "fault", "cause": "java.lang.RuntimeException"}
		}))
		.unwrap();

		let exception = result.exception().unwrap();
		assert_eq!(exception.cause, "java.lang.RuntimeException");
		assert!(result.tracks().is_empty());
	}

	#[test]
	fn collapsed_track_tag_is_classified_by_shape() {
		let empty = LoadResult::from_translated(json!({"loadType": "track", "data": {}})).unwrap();
		assert_eq!(empty, LoadResult::Empty(EmptyData {}));

		let search = LoadResult::from_translated(json!({"loadType": "track", "data": [track_json("a"), track_json("b")]})).unwrap();
		assert_eq!(search.load_type(), LoadType::Search);
		assert_eq!(search.tracks().len(), 2);

		let error = LoadResult::from_translated(json!({
			"loadType": "track",
			"data": {"message": "no such video", "severity": "common", "cause": "NotFound"}
		}))
		.unwrap();
		assert_eq!(error.exception().unwrap().cause, "NotFound");

		let single = LoadResult::from_translated(json!({"loadType": "track", "data": track_json("solo")})).unwrap();
		assert_eq!(single.load_type(), LoadType::Track);
	}

	#[test]
	fn shape_recovery_keeps_real_failures() {
		assert!(LoadResult::from_translated(json!({"loadType": "track", "data": {"encoded": 3}})).is_err());
		assert!(LoadResult::from_translated(json!({"loadType": "album", "data": {}})).is_err());
	}

	#[test]
	fn rejects_dialect_tags() {
		let err = serde_json::from_value::<LoadResult>(json!({"loadType": "album", "data": {}}));
		assert!(err.is_err());
	}
}
