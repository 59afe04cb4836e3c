//! The driver contract and its dialect implementations.
//!
//! A [`Driver`] adapts one node server dialect to a common surface:
//! `initial`, `connect`, `requester`, `ws_close`, `update_session`. The set
//! of dialects is closed, so dispatch is a plain `match` over the enum.
//!
//! Every dialect embeds a [`DriverCore`], which owns the state the contract
//! needs: the registration, the session token, and the current socket.

mod lavalink;
mod nodelink;


use std::sync::Arc;

pub use lavalink::LavalinkDriver;
pub use nodelink::{GET_LYRIC, NodelinkDriver};
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tidelink_runtime::{
	CLIENT_NAME, Connection, Dialect, DriverConfig, Error, ManagerOptions, NodeOptions, NodeSink, RequestDescriptor, Requester, Result,
	SessionManager, SessionToken, SocketHandle, Translator, build_request,
};
use tracing::{debug, info};

use crate::capability::{CapabilityArgs, CapabilityRegistry, PlayerContext};

/// Close code sent when the driver closes its own socket.
pub const SELF_CLOSE_CODE: u16 = 1000;

/// Close reason sent when the driver closes its own socket.
pub const SELF_CLOSE_REASON: &str = "Self closed";

/// Everything `initial()` establishes.
#[derive(Debug)]
pub struct Registration {
	pub config: DriverConfig,
	pub node: NodeSink,
	pub requester: Requester,
}

/// State and behavior shared by every dialect.
pub struct DriverCore {
	id: &'static str,
	api_version: &'static str,
	translator: Translator,
	client: Client,
	registration: RwLock<Option<Arc<Registration>>>,
	session: SessionManager,
	socket: Mutex<Option<SocketHandle>>,
}

impl DriverCore {
	pub(crate) fn new(id: &'static str, api_version: &'static str, translator: Translator, client: Client) -> Self {
		Self {
			id,
			api_version,
			translator,
			client,
			registration: RwLock::new(None),
			session: SessionManager::new(),
			socket: Mutex::new(None),
		}
	}

	pub fn id(&self) -> &'static str {
		self.id
	}

	/// Stores the configuration and node inbox, deriving both base URLs.
	///
	/// Performs no I/O. Re-registering replaces the previous configuration and
	/// drops any session token.
	pub fn initial(&self, manager: ManagerOptions, options: NodeOptions, node: NodeSink) -> Result<()> {
		let config = DriverConfig::new(manager, options, self.api_version)?;
		let requester = Requester::new(self.id, self.client.clone(), &config, self.translator);
		info!(driver = self.id, node = %config.node.name, ws_url = %config.ws_url, "Driver registered");

		*self.registration.write() = Some(Arc::new(Registration { config, node, requester }));
		self.session.clear();
		Ok(())
	}

	pub fn is_registered(&self) -> bool {
		self.registration.read().is_some()
	}

	/// Current registration, or [`Error::NotRegistered`].
	pub fn registration(&self) -> Result<Arc<Registration>> {
		self.registration.read().clone().ok_or(Error::NotRegistered { driver: self.id })
	}

	pub fn ws_url(&self) -> Option<String> {
		self.registration.read().as_ref().map(|r| r.config.ws_url.clone())
	}

	pub fn http_url(&self) -> Option<String> {
		self.registration.read().as_ref().map(|r| r.config.http_url.clone())
	}

	pub fn session(&self) -> &SessionManager {
		&self.session
	}

	/// Session id for session-scoped routes.
	///
	/// Fails with [`Error::NotRegistered`] before `initial()`, then with
	/// [`Error::SessionNotInitialized`] while no session is known.
	pub fn require_session(&self) -> Result<String> {
		self.registration()?;
		self.session.session_id().ok_or(Error::SessionNotInitialized { driver: self.id })
	}

	/// Records the session id the server announced, without enabling resume.
	///
	/// A resumable token for the same id is kept as is.
	pub fn attach_session(&self, session_id: &str) {
		if self.session.session_id().as_deref() == Some(session_id) {
			return;
		}
		debug!(driver = self.id, session_id, "Session attached");
		self.session.update(SessionToken {
			id: session_id.to_string(),
			resumable: false,
			timeout: 0,
		});
	}

	/// Handshake headers for the next socket.
	pub fn connect_headers(&self) -> Result<Vec<(&'static str, String)>> {
		let registration = self.registration()?;
		let config = &registration.config;
		Ok(vec![
			("Authorization", config.node.auth.clone()),
			("User-Id", config.manager.client_id.clone()),
			("Client-Name", CLIENT_NAME.to_string()),
			("Session-Id", self.session.header_value(config.manager.resume)),
			("User-Agent", config.manager.user_agent.clone()),
		])
	}

	/// Opens a socket to the server, replacing any previous one.
	///
	/// The replaced socket is closed silently, so the node never sees its
	/// close after the new socket's events. Returns as soon as the socket task
	/// is spawned; the node learns the outcome through its [`NodeSink`].
	pub fn connect(&self) -> Result<SocketHandle> {
		let registration = self.registration()?;
		let headers = self.connect_headers()?;
		let request = build_request(&registration.config.ws_url, &headers)?;

		let mut socket = self.socket.lock();
		if let Some(previous) = socket.take() {
			debug!(driver = self.id, url = %previous.url(), "Replacing socket");
			previous.discard(SELF_CLOSE_CODE, SELF_CLOSE_REASON);
		}
		let handle = Connection::open(request, registration.node.clone())?;
		info!(driver = self.id, url = %handle.url(), resuming = self.session.is_resumable(), "Connecting");
		*socket = Some(handle.clone());
		Ok(handle)
	}

	/// Sends a REST request through the registered requester.
	pub async fn requester<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<Option<T>> {
		let registration = self.registration()?;
		if descriptor.use_session_id && !self.session.has_session() {
			return Err(Error::SessionNotInitialized { driver: self.id });
		}
		registration.requester.send(descriptor).await
	}

	/// Closes the current socket, if any.
	pub fn ws_close(&self) {
		if let Some(handle) = self.socket.lock().take() {
			debug!(driver = self.id, "Closing socket");
			handle.close(SELF_CLOSE_CODE, SELF_CLOSE_REASON);
		}
	}

	/// Handle of the current socket, if one was opened and not closed by the driver.
	pub fn socket(&self) -> Option<SocketHandle> {
		self.socket.lock().clone()
	}
}

impl std::fmt::Debug for DriverCore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DriverCore")
			.field("id", &self.id)
			.field("registered", &self.is_registered())
			.field("session", &self.session.current())
			.finish_non_exhaustive()
	}
}

/// A node server driver, one variant per supported dialect.
#[derive(Debug)]
pub enum Driver {
	Lavalink(LavalinkDriver),
	Nodelink(NodelinkDriver),
}

impl Driver {
	pub fn new(dialect: Dialect) -> Self {
		Self::with_client(dialect, Client::new())
	}

	/// Creates a driver that issues REST calls through `client`.
	pub fn with_client(dialect: Dialect, client: Client) -> Self {
		match dialect {
			Dialect::Lavalink => Driver::Lavalink(LavalinkDriver::with_client(client)),
			Dialect::Nodelink => Driver::Nodelink(NodelinkDriver::with_client(client)),
		}
	}

	/// Creates the driver matching `options.dialect`.
	pub fn for_node(options: &NodeOptions) -> Self {
		Self::new(options.dialect)
	}

	pub fn dialect(&self) -> Dialect {
		match self {
			Driver::Lavalink(_) => Dialect::Lavalink,
			Driver::Nodelink(_) => Dialect::Nodelink,
		}
	}

	pub fn core(&self) -> &DriverCore {
		match self {
			Driver::Lavalink(driver) => driver.core(),
			Driver::Nodelink(driver) => driver.core(),
		}
	}

	/// Dialect id, e.g. `"lavalink@4"`.
	pub fn id(&self) -> &'static str {
		self.core().id()
	}

	pub fn initial(&self, manager: ManagerOptions, options: NodeOptions, node: NodeSink) -> Result<()> {
		self.core().initial(manager, options, node)
	}

	pub fn is_registered(&self) -> bool {
		self.core().is_registered()
	}

	pub fn connect(&self) -> Result<SocketHandle> {
		self.core().connect()
	}

	pub async fn requester<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<Option<T>> {
		self.core().requester(descriptor).await
	}

	pub fn ws_close(&self) {
		self.core().ws_close()
	}

	/// Asks the server to keep (or stop keeping) the session alive across disconnects.
	///
	/// Dialects without resume support log a warning and do nothing.
	pub async fn update_session(&self, session_id: &str, mode: bool, timeout: u64) -> Result<()> {
		match self {
			Driver::Lavalink(driver) => driver.update_session(session_id, mode, timeout).await,
			Driver::Nodelink(driver) => driver.update_session(session_id, mode, timeout).await,
		}
	}

	pub fn attach_session(&self, session_id: &str) {
		self.core().attach_session(session_id)
	}

	pub fn session_id(&self) -> Option<String> {
		self.core().session().session_id()
	}

	pub fn ws_url(&self) -> Option<String> {
		self.core().ws_url()
	}

	pub fn http_url(&self) -> Option<String> {
		self.core().http_url()
	}

	pub fn capabilities(&self) -> &CapabilityRegistry {
		match self {
			Driver::Lavalink(driver) => driver.capabilities(),
			Driver::Nodelink(driver) => driver.capabilities(),
		}
	}

	/// Runs the capability registered under `name`.
	pub async fn call_capability(&self, name: &str, player: &PlayerContext, args: CapabilityArgs) -> Result<Option<Value>> {
		self.core().registration()?;
		let handler = self.capabilities().get(name).ok_or_else(|| Error::UnsupportedCapability {
			driver: self.id(),
			name: name.to_string(),
		})?;
		handler(self.core(), player, args).await
	}
}
