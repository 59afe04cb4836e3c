//! tidelink: dialect drivers for Lavalink-compatible audio node servers
//!
//! A [`Driver`] hides which wire dialect a node server speaks. Callers
//! configure it once with [`Driver::initial`], open the event socket with
//! [`Driver::connect`], and issue REST calls through [`Driver::requester`] or
//! the typed routes in [`routes`]. Every load response is translated into the
//! canonical [`LoadResult`] taxonomy regardless of dialect.
//!
//! # Example
//!
//! ```ignore
//! use tidelink::{Dialect, Driver, ManagerOptions, NodeOptions, NodeSink, SocketEvent};
//!
//! #[tokio::main]
//! async fn main() -> tidelink::Result<()> {
//!     let driver = Driver::new(Dialect::Lavalink);
//!     let (sink, mut events) = NodeSink::channel();
//!     driver.initial(ManagerOptions::default(), NodeOptions::default(), sink)?;
//!
//!     driver.connect()?;
//!     while let Some(event) = events.recv().await {
//!         if let SocketEvent::Message(message) = &event {
//!             if let Some(ready) = tidelink::ReadyMessage::from_message(message) {
//!                 driver.attach_session(&ready.session_id);
//!                 break;
//!             }
//!         }
//!     }
//!
//!     let result = driver.load_tracks("ytsearch:daft punk").await?;
//!     println!("{:?}", result.map(|r| r.load_type()));
//!     driver.ws_close();
//!     Ok(())
//! }
//! ```

pub mod capability;
pub mod driver;
pub mod routes;

pub use capability::{CapabilityArgs, CapabilityFn, CapabilityFuture, CapabilityRegistry, PlayerContext};
pub use driver::{Driver, DriverCore, GET_LYRIC, LavalinkDriver, NodelinkDriver, Registration, SELF_CLOSE_CODE, SELF_CLOSE_REASON};
pub use tidelink_protocol::*;
pub use tidelink_runtime::{
	ABNORMAL_CLOSE, CLIENT_NAME, Dialect, DriverConfig, Error, ManagerOptions, Method, NodeOptions, NodeSink, RequestDescriptor, Result,
	SessionManager, SessionToken, SocketEvent, SocketHandle,
};
