//! Nodelink v2 dialect.
//!
//! Nodelink serves its API under `/v3`, extends the load-type vocabulary, and
//! has no session resume. It additionally exposes synchronized lyrics as the
//! `getLyric` capability.

use reqwest::Client;
use tidelink_protocol::{LyricsResult, translate_response};
use tidelink_runtime::Result;
use tracing::{debug, warn};

use super::DriverCore;
use crate::capability::{CapabilityArgs, CapabilityFuture, CapabilityRegistry, PlayerContext};
use crate::routes;

/// Capability name of the lyrics lookup.
pub const GET_LYRIC: &str = "getLyric";

/// Driver for Nodelink v2 servers.
#[derive(Debug)]
pub struct NodelinkDriver {
	core: DriverCore,
	capabilities: CapabilityRegistry,
}

impl NodelinkDriver {
	pub const ID: &'static str = "nodelink@2";
	pub const API_VERSION: &'static str = "v3";

	pub fn new() -> Self {
		Self::with_client(Client::new())
	}

	pub fn with_client(client: Client) -> Self {
		let mut capabilities = CapabilityRegistry::new();
		capabilities.register(GET_LYRIC, get_lyric_capability);
		Self {
			core: DriverCore::new(Self::ID, Self::API_VERSION, translate_response, client),
			capabilities,
		}
	}

	pub fn core(&self) -> &DriverCore {
		&self.core
	}

	pub fn capabilities(&self) -> &CapabilityRegistry {
		&self.capabilities
	}

	/// Nodelink cannot resume sessions; this only logs a warning.
	pub async fn update_session(&self, session_id: &str, mode: bool, timeout: u64) -> Result<()> {
		self.core.registration()?;
		warn!(driver = Self::ID, session_id, mode, timeout, "Nodelink does not support resuming, session update ignored");
		Ok(())
	}

	/// Fetches lyrics for the player's current track.
	///
	/// Returns `Ok(None)` when nothing is playing or the server has no lyrics.
	pub async fn get_lyric(&self, player: &PlayerContext, language: &str) -> Result<Option<LyricsResult>> {
		fetch_lyrics(&self.core, player, language).await
	}
}

impl Default for NodelinkDriver {
	fn default() -> Self {
		Self::new()
	}
}

async fn fetch_lyrics(core: &DriverCore, player: &PlayerContext, language: &str) -> Result<Option<LyricsResult>> {
	core.registration()?;
	let Some(track) = &player.current else {
		debug!(driver = core.id(), guild_id = %player.guild_id, "No current track, skipping lyrics lookup");
		return Ok(None);
	};
	core.requester(&routes::load_lyrics(&track.encoded, language)).await
}

fn get_lyric_capability<'a>(core: &'a DriverCore, player: &'a PlayerContext, args: CapabilityArgs) -> CapabilityFuture<'a> {
	Box::pin(async move {
		let language = args.str("language").unwrap_or_default().to_string();
		let lyrics = fetch_lyrics(core, player, &language).await?;
		Ok(lyrics.map(serde_json::to_value).transpose()?)
	})
}
