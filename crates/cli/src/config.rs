//! Configuration resolution: config file first, then command-line flags.
//!
//! The config file is JSON with optional `node` and `manager` sections using
//! the driver's own option shapes:
//!
//! ```json
//! {
//!   "node": { "name": "main", "host": "localhost", "port": 2333, "auth": "youshallnotpass", "dialect": "lavalink" },
//!   "manager": { "clientId": "1234", "resume": true, "resumeTimeout": 60 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tidelink::{ManagerOptions, NodeOptions};
use tracing::debug;

use crate::cli::NodeArgs;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
	#[serde(default)]
	pub node: NodeOptions,
	#[serde(default)]
	pub manager: ManagerOptions,
}

impl CliConfig {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
		serde_json::from_str(&raw).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
	}

	/// Loads the file named by `args` (if any) and applies flag overrides.
	pub fn resolve(args: &NodeArgs) -> Result<Self> {
		let mut config = match &args.config {
			Some(path) => Self::load(path)?,
			None => Self::default(),
		};
		config.apply(args);
		debug!(host = %config.node.host, port = config.node.port, dialect = %config.node.dialect, "Resolved node configuration");
		Ok(config)
	}

	fn apply(&mut self, args: &NodeArgs) {
		if let Some(host) = &args.host {
			self.node.host = host.clone();
		}
		if let Some(port) = args.port {
			self.node.port = port;
		}
		if args.secure {
			self.node.secure = true;
		}
		if let Some(auth) = &args.auth {
			self.node.auth = auth.clone();
		}
		if let Some(dialect) = args.dialect {
			self.node.dialect = dialect;
		}
		if let Some(client_id) = &args.client_id {
			self.manager.client_id = client_id.clone();
		}
	}
}
