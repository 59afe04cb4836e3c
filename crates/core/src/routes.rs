//! Typed REST routes.
//!
//! Descriptor builders for the routes both dialects share, plus typed
//! wrappers on [`Driver`]. Paths are relative to the dialect's base URL, so
//! the same builder serves `/v4` and `/v3` servers.

use serde_json::Value;
use tidelink_protocol::{LavalinkPlayer, LoadResult, RawTrack, SessionUpdate, UpdatePlayerInfo};
use tidelink_runtime::{RequestDescriptor, Result};

use crate::driver::Driver;

/// `GET /loadtracks?identifier=…`
pub fn load_tracks(identifier: &str) -> RequestDescriptor {
	RequestDescriptor::get("/loadtracks").param("identifier", identifier)
}

/// `GET /info`
pub fn info() -> RequestDescriptor {
	RequestDescriptor::get("/info")
}

/// `GET /decodetrack?encodedTrack=…`
pub fn decode_track(encoded: &str) -> RequestDescriptor {
	RequestDescriptor::get("/decodetrack").param("encodedTrack", encoded)
}

/// `PATCH /sessions/{session}/players/{guild}?noReplace=…`
pub fn update_player(session_id: &str, update: &UpdatePlayerInfo) -> Result<RequestDescriptor> {
	let data = serde_json::to_value(&update.player_options)?;
	Ok(RequestDescriptor::patch(format!("/sessions/{session_id}/players/{}", update.guild_id))
		.param("noReplace", update.no_replace.unwrap_or(false).to_string())
		.data(data)
		.with_session_id())
}

/// `DELETE /sessions/{session}/players/{guild}`
pub fn destroy_player(session_id: &str, guild_id: &str) -> RequestDescriptor {
	RequestDescriptor::delete(format!("/sessions/{session_id}/players/{guild_id}")).with_session_id()
}

/// `PATCH /sessions/{session}` with the resume settings.
pub fn update_session(session_id: &str, update: SessionUpdate) -> Result<RequestDescriptor> {
	Ok(RequestDescriptor::patch(format!("/sessions/{session_id}")).data(serde_json::to_value(update)?))
}

/// `GET /loadlyrics?encodedTrack=…&language=…` (nodelink only).
pub fn load_lyrics(encoded: &str, language: &str) -> RequestDescriptor {
	RequestDescriptor::get("/loadlyrics")
		.param("encodedTrack", encoded)
		.param("language", language)
		.header("Content-Type", "application/json")
}

impl Driver {
	/// Resolves an identifier or search query into canonical results.
	///
	/// Envelopes whose tag translation collapsed to `track` are classified by
	/// payload shape (see [`LoadResult::from_translated`]).
	pub async fn load_tracks(&self, identifier: &str) -> Result<Option<LoadResult>> {
		let value: Option<Value> = self.requester(&load_tracks(identifier)).await?;
		Ok(value.map(LoadResult::from_translated).transpose()?)
	}

	/// Server information, as returned by `/info`.
	pub async fn info(&self) -> Result<Option<Value>> {
		self.requester(&info()).await
	}

	pub async fn decode_track(&self, encoded: &str) -> Result<Option<RawTrack>> {
		self.requester(&decode_track(encoded)).await
	}

	/// Creates or updates the player of `update.guild_id` in the current session.
	pub async fn update_player(&self, update: &UpdatePlayerInfo) -> Result<Option<LavalinkPlayer>> {
		let session_id = self.core().require_session()?;
		self.requester(&update_player(&session_id, update)?).await
	}

	/// Destroys the player of `guild_id`. The server answers 204, so success is `Ok(())`.
	pub async fn destroy_player(&self, guild_id: &str) -> Result<()> {
		let session_id = self.core().require_session()?;
		self.requester::<Value>(&destroy_player(&session_id, guild_id)).await?;
		Ok(())
	}
}
