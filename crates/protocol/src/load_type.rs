//! Load-type vocabularies and their translation.
//!
//! Every response that describes loaded media carries a `loadType` tag. The
//! canonical taxonomy has five values ([`LoadType`]); the nodelink dialect
//! extends it with media-kind tags ([`NodelinkLoadType`]) that collapse onto
//! the canonical set through [`translate_load_type`].
//!
//! The mapping is lossy and one-directional. Tags outside the nodelink table
//! fall back to [`LoadType::Track`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON field carrying the load-type tag.
pub const LOAD_TYPE_FIELD: &str = "loadType";

/// Canonical load-type taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadType {
	/// A single media record.
	Track,
	/// A named, ordered collection of media records.
	Playlist,
	/// An unordered list of search matches.
	Search,
	/// Nothing matched.
	Empty,
	/// Loading failed; payload is an [`Exception`](crate::Exception).
	Error,
}

impl LoadType {
	/// Wire tag for this load type.
	pub fn as_str(self) -> &'static str {
		match self {
			LoadType::Track => "track",
			LoadType::Playlist => "playlist",
			LoadType::Search => "search",
			LoadType::Empty => "empty",
			LoadType::Error => "error",
		}
	}
}

impl fmt::Display for LoadType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Extended load-type vocabulary spoken by nodelink servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodelinkLoadType {
	Shorts,
	Album,
	Artist,
	Show,
	Episode,
	Station,
	Podcast,
}

impl NodelinkLoadType {
	/// Parses a nodelink tag, returning `None` for anything outside the vocabulary.
	pub fn parse(tag: &str) -> Option<Self> {
		match tag {
			"shorts" => Some(Self::Shorts),
			"album" => Some(Self::Album),
			"artist" => Some(Self::Artist),
			"show" => Some(Self::Show),
			"episode" => Some(Self::Episode),
			"station" => Some(Self::Station),
			"podcast" => Some(Self::Podcast),
			_ => None,
		}
	}

	/// Canonical tag this nodelink tag collapses onto.
	pub fn canonical(self) -> LoadType {
		match self {
			Self::Shorts => LoadType::Track,
			Self::Artist => LoadType::Search,
			Self::Album | Self::Episode | Self::Station | Self::Podcast | Self::Show => LoadType::Playlist,
		}
	}
}

/// Maps a nodelink load-type tag onto the canonical taxonomy.
///
/// Unrecognized tags map to [`LoadType::Track`].
pub fn translate_load_type(tag: &str) -> LoadType {
	NodelinkLoadType::parse(tag).map(NodelinkLoadType::canonical).unwrap_or(LoadType::Track)
}

/// Rewrites the `loadType` field of a nodelink response to its canonical tag.
///
/// Values without a `loadType` field are returned unchanged. A non-string tag
/// is treated as unrecognized. All other fields are left untouched.
pub fn translate_response(mut value: Value) -> Value {
	if let Some(tag) = value.get_mut(LOAD_TYPE_FIELD) {
		let canonical = translate_load_type(tag.as_str().unwrap_or_default());
		*tag = Value::String(canonical.as_str().to_string());
	}
	value
}

/// Identity translation for dialects that already speak the canonical taxonomy.
pub fn passthrough_response(value: Value) -> Value {
	value
}
