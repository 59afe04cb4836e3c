//! Lavalink v4 dialect.

use reqwest::Client;
use tidelink_protocol::{SessionUpdate, passthrough_response};
use tidelink_runtime::{Result, SessionToken};
use tracing::{info, warn};

use super::DriverCore;
use crate::capability::CapabilityRegistry;
use crate::routes;

/// Driver for Lavalink v4 servers: `/v4` paths, canonical load types, session resume.
#[derive(Debug)]
pub struct LavalinkDriver {
	core: DriverCore,
	capabilities: CapabilityRegistry,
}

impl LavalinkDriver {
	pub const ID: &'static str = "lavalink@4";
	pub const API_VERSION: &'static str = "v4";

	pub fn new() -> Self {
		Self::with_client(Client::new())
	}

	pub fn with_client(client: Client) -> Self {
		Self {
			core: DriverCore::new(Self::ID, Self::API_VERSION, passthrough_response, client),
			capabilities: CapabilityRegistry::new(),
		}
	}

	pub fn core(&self) -> &DriverCore {
		&self.core
	}

	pub fn capabilities(&self) -> &CapabilityRegistry {
		&self.capabilities
	}

	/// Updates resume settings of `session_id` with `PATCH /sessions/{id}`.
	///
	/// The token is stored only when the server confirms the update. Subsequent
	/// `connect()` calls then carry the id when resume is enabled.
	pub async fn update_session(&self, session_id: &str, mode: bool, timeout: u64) -> Result<()> {
		let update = SessionUpdate { resuming: mode, timeout };
		let descriptor = routes::update_session(session_id, update)?;

		match self.core.requester::<SessionUpdate>(&descriptor).await? {
			Some(confirmed) => {
				info!(driver = Self::ID, session_id, resuming = confirmed.resuming, timeout = confirmed.timeout, "Session updated");
				self.core.session().update(SessionToken {
					id: session_id.to_string(),
					resumable: confirmed.resuming,
					timeout: confirmed.timeout,
				});
			}
			None => warn!(driver = Self::ID, session_id, "Session update was not confirmed, keeping previous session"),
		}
		Ok(())
	}
}

impl Default for LavalinkDriver {
	fn default() -> Self {
		Self::new()
	}
}
