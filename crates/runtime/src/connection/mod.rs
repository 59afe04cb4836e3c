//! Event-stream connection to a node server.
//!
//! A [`Connection`] owns exactly one WebSocket. Its task delivers lifecycle
//! events to the owning node through a [`NodeSink`] in occurrence order:
//!
//! 1. [`SocketEvent::Open`] once the handshake completes
//! 2. Any interleaving of [`SocketEvent::Message`] and [`SocketEvent::Error`]
//! 3. Exactly one [`SocketEvent::Close`], after which nothing else is delivered
//!
//! A socket closed with [`SocketHandle::discard`] skips the final close.
//!
//! Payloads are parsed as JSON but never interpreted here. The connection
//! never retries or reconnects; the orchestrator decides that.

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Close code reported when the socket dropped without a close frame.
pub const ABNORMAL_CLOSE: u16 = 1006;

/// Close code reported when the peer sent a close frame without a status.
pub const NO_STATUS_CLOSE: u16 = 1005;

static NEXT_SOCKET_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle event of one socket.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
	Open,
	/// One inbound frame, parsed as JSON.
	Message(Value),
	/// A transport error or an unparseable frame. The socket stays open.
	Error(String),
	Close { code: u16, reason: String },
}

/// Inbox of the node that owns a connection.
#[derive(Debug, Clone)]
pub struct NodeSink {
	tx: mpsc::UnboundedSender<SocketEvent>,
}

impl NodeSink {
	/// Creates a sink and the receiver the node consumes events from.
	pub fn channel() -> (Self, mpsc::UnboundedReceiver<SocketEvent>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}

	pub fn from_sender(tx: mpsc::UnboundedSender<SocketEvent>) -> Self {
		Self { tx }
	}

	/// Returns true once the node has dropped its receiver.
	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	fn send(&self, event: SocketEvent) {
		if self.tx.send(event).is_err() {
			debug!("node sink dropped, socket event discarded");
		}
	}
}

/// Builds the handshake request for `url` with the given headers attached.
pub fn build_request(url: &str, headers: &[(&str, String)]) -> Result<Request> {
	let mut request = url.into_client_request()?;
	for (name, value) in headers {
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidConfig(format!("header name '{name}': {e}")))?;
		let value = HeaderValue::from_str(value).map_err(|e| Error::InvalidConfig(format!("header '{name}': {e}")))?;
		request.headers_mut().insert(name, value);
	}
	Ok(request)
}

struct CloseCommand {
	code: u16,
	reason: String,
}

/// Delivery flags shared by the socket task and its handles.
struct SocketState {
	id: u64,
	detached: AtomicBool,
	/// Set when the socket was replaced; its final close is not delivered.
	silenced: AtomicBool,
}

/// The socket task's view: shared flags plus the node inbox it alone owns.
struct Delivery {
	state: Arc<SocketState>,
	sink: NodeSink,
	close_sent: bool,
}

impl Delivery {
	fn emit(&self, event: SocketEvent) {
		if !self.state.detached.load(Ordering::SeqCst) {
			self.sink.send(event);
		}
	}

	fn forward(&self, payload: &[u8]) {
		match serde_json::from_slice::<Value>(payload) {
			Ok(value) => self.emit(SocketEvent::Message(value)),
			Err(e) => {
				warn!(socket = self.state.id, error = %e, "Dropping malformed socket message");
				self.emit(SocketEvent::Error(format!("malformed socket message: {e}")));
			}
		}
	}

	/// Delivers the final close event and detaches the node.
	fn finish(&mut self, code: u16, reason: String) {
		if !self.close_sent {
			self.close_sent = true;
			debug!(socket = self.state.id, code, %reason, "Socket closed");
			if !self.state.silenced.load(Ordering::SeqCst) {
				self.sink.send(SocketEvent::Close { code, reason });
			}
		}
		self.state.detached.store(true, Ordering::SeqCst);
	}
}

/// Handle to a live socket, used to close it.
#[derive(Clone)]
pub struct SocketHandle {
	state: Arc<SocketState>,
	close_tx: mpsc::UnboundedSender<CloseCommand>,
	url: Arc<str>,
}

impl SocketHandle {
	/// Closes the socket with `code` and `reason`.
	///
	/// Delivery to the node stops immediately; the node still receives the
	/// final [`SocketEvent::Close`]. Closing an already closed socket is a no-op.
	pub fn close(&self, code: u16, reason: &str) {
		if self.state.detached.swap(true, Ordering::SeqCst) {
			return;
		}
		let command = CloseCommand {
			code,
			reason: reason.to_string(),
		};
		if self.close_tx.send(command).is_err() {
			debug!(socket = self.state.id, "Socket task already finished");
		}
	}

	/// Closes the socket without telling the node.
	///
	/// Used when a newer socket takes over the same [`NodeSink`]: the node
	/// receives nothing further from this socket, not even its close.
	pub fn discard(&self, code: u16, reason: &str) {
		self.state.silenced.store(true, Ordering::SeqCst);
		self.close(code, reason);
	}

	/// Returns true once the socket has closed or is closing.
	pub fn is_closed(&self) -> bool {
		self.state.detached.load(Ordering::SeqCst)
	}

	pub fn url(&self) -> &str {
		&self.url
	}
}

impl std::fmt::Debug for SocketHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SocketHandle")
			.field("id", &self.state.id)
			.field("url", &self.url)
			.field("closed", &self.is_closed())
			.finish()
	}
}

/// Spawns socket tasks.
pub struct Connection;

impl Connection {
	/// Opens a socket for `request` and forwards its events to `sink`.
	///
	/// Returns immediately; the handshake happens on the spawned task and its
	/// outcome arrives as [`SocketEvent::Open`] or as an error followed by a
	/// close. Must be called from within a Tokio runtime.
	pub fn open(request: Request, sink: NodeSink) -> Result<SocketHandle> {
		let runtime = tokio::runtime::Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;

		let url: Arc<str> = Arc::from(request.uri().to_string());
		let state = Arc::new(SocketState {
			id: NEXT_SOCKET_ID.fetch_add(1, Ordering::SeqCst),
			detached: AtomicBool::new(false),
			silenced: AtomicBool::new(false),
		});
		let (close_tx, close_rx) = mpsc::unbounded_channel();

		debug!(socket = state.id, url = %url, "Opening socket");
		let delivery = Delivery {
			state: Arc::clone(&state),
			sink,
			close_sent: false,
		};
		runtime.spawn(run_socket(request, delivery, close_rx));

		Ok(SocketHandle { state, close_tx, url })
	}
}

async fn run_socket(request: Request, mut delivery: Delivery, mut close_rx: mpsc::UnboundedReceiver<CloseCommand>) {
	let id = delivery.state.id;
	let stream = tokio::select! {
		result = connect_async(request) => match result {
			Ok((stream, _response)) => stream,
			Err(e) => {
				warn!(socket = id, error = %e, "Socket handshake failed");
				delivery.emit(SocketEvent::Error(e.to_string()));
				delivery.finish(ABNORMAL_CLOSE, e.to_string());
				return;
			}
		},
		Some(command) = close_rx.recv() => {
			delivery.finish(command.code, command.reason);
			return;
		}
	};

	debug!(socket = id, "Socket open");
	delivery.emit(SocketEvent::Open);

	let (mut write, mut read) = stream.split();
	loop {
		tokio::select! {
			Some(command) = close_rx.recv() => {
				let frame = CloseFrame {
					code: CloseCode::from(command.code),
					reason: command.reason.clone().into(),
				};
				if let Err(e) = write.send(Message::Close(Some(frame))).await {
					debug!(socket = id, error = %e, "Failed to send close frame");
				}
				let _ = write.close().await;
				delivery.finish(command.code, command.reason);
				return;
			}
			frame = read.next() => match frame {
				Some(Ok(Message::Text(text))) => delivery.forward(text.as_bytes()),
				Some(Ok(Message::Binary(bytes))) => delivery.forward(&bytes),
				Some(Ok(Message::Close(frame))) => {
					let (code, reason) = frame
						.map(|f| (u16::from(f.code), f.reason.into_owned()))
						.unwrap_or((NO_STATUS_CLOSE, String::new()));
					delivery.finish(code, reason);
					return;
				}
				Some(Ok(_)) => {}
				Some(Err(e)) => {
					warn!(socket = id, error = %e, "Socket error");
					let recoverable = matches!(e, WsError::Utf8 | WsError::Capacity(_));
					delivery.emit(SocketEvent::Error(e.to_string()));
					if !recoverable {
						delivery.finish(ABNORMAL_CLOSE, e.to_string());
						return;
					}
				}
				None => {
					delivery.finish(ABNORMAL_CLOSE, String::new());
					return;
				}
			}
		}
	}
}
