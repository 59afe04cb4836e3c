//! Driver configuration.
//!
//! [`NodeOptions`] describes one server endpoint and [`ManagerOptions`] the
//! orchestrator talking to it. `initial()` combines both into an immutable
//! [`DriverConfig`] with the derived socket and REST base URLs.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Client signature sent with every socket handshake.
pub const CLIENT_NAME: &str = concat!(
	env!("CARGO_PKG_NAME"),
	"/",
	env!("CARGO_PKG_VERSION"),
	" (",
	env!("CARGO_PKG_REPOSITORY"),
	")"
);

/// Wire dialect spoken by a node server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
	/// Lavalink v4 REST + WebSocket protocol.
	#[default]
	Lavalink,
	/// Nodelink v2 protocol (v3 paths, extended load types, no resume).
	Nodelink,
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Dialect::Lavalink => f.write_str("lavalink"),
			Dialect::Nodelink => f.write_str("nodelink"),
		}
	}
}

impl std::str::FromStr for Dialect {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"lavalink" | "lavalink4" | "v4" => Ok(Dialect::Lavalink),
			"nodelink" | "nodelink2" | "v2" => Ok(Dialect::Nodelink),
			_ => Err(format!("unknown dialect: {s}")),
		}
	}
}

/// One managed server endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOptions {
	/// Display name used in logs.
	#[serde(default = "default_name")]
	pub name: String,
	pub host: String,
	pub port: u16,
	/// Use `wss`/`https` instead of `ws`/`http`.
	#[serde(default)]
	pub secure: bool,
	/// Value of the `Authorization` header.
	pub auth: String,
	#[serde(default)]
	pub dialect: Dialect,
}

fn default_name() -> String {
	"default".to_string()
}

impl Default for NodeOptions {
	fn default() -> Self {
		Self {
			name: default_name(),
			host: "localhost".to_string(),
			port: 2333,
			secure: false,
			auth: "youshallnotpass".to_string(),
			dialect: Dialect::default(),
		}
	}
}

/// Orchestrator-wide options shared by every driver it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerOptions {
	/// Client user id sent as the `User-Id` header.
	pub client_id: String,
	#[serde(default = "default_user_agent")]
	pub user_agent: String,
	/// Whether session resume is enabled at all.
	#[serde(default)]
	pub resume: bool,
	/// Resume timeout in seconds.
	#[serde(default = "default_resume_timeout")]
	pub resume_timeout: u64,
}

fn default_user_agent() -> String {
	CLIENT_NAME.to_string()
}

fn default_resume_timeout() -> u64 {
	60
}

impl Default for ManagerOptions {
	fn default() -> Self {
		Self {
			client_id: String::new(),
			user_agent: default_user_agent(),
			resume: false,
			resume_timeout: default_resume_timeout(),
		}
	}
}

/// Immutable configuration of a registered driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
	pub manager: ManagerOptions,
	pub node: NodeOptions,
	/// Socket URL, e.g. `ws://localhost:2333/v4/websocket`.
	pub ws_url: String,
	/// REST base URL, e.g. `http://localhost:2333/v4`.
	pub http_url: String,
}

impl DriverConfig {
	/// Derives both base URLs for the given API version segment.
	///
	/// Fails with [`Error::InvalidConfig`] when the host is empty or the
	/// resulting URLs do not parse.
	pub fn new(manager: ManagerOptions, node: NodeOptions, api_version: &str) -> Result<Self> {
		if node.host.trim().is_empty() {
			return Err(Error::InvalidConfig(format!("node '{}' has an empty host", node.name)));
		}

		let (ws_scheme, http_scheme) = if node.secure { ("wss", "https") } else { ("ws", "http") };
		let ws_url = format!("{ws_scheme}://{}:{}/{api_version}/websocket", node.host, node.port);
		let http_url = format!("{http_scheme}://{}:{}/{api_version}", node.host, node.port);

		for candidate in [&ws_url, &http_url] {
			Url::parse(candidate).map_err(|e| Error::InvalidConfig(format!("{candidate}: {e}")))?;
		}

		Ok(Self {
			manager,
			node,
			ws_url,
			http_url,
		})
	}
}
