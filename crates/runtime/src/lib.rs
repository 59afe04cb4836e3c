//! Tidelink runtime - socket connection, REST requester, and session state
//!
//! This crate provides the transport layer shared by every node dialect:
//!
//! - **Config**: Node and manager options, derived socket/REST URLs
//! - **Connection**: One WebSocket per node, lifecycle events forwarded to the node
//! - **Requester**: Descriptor-driven REST calls with response translation
//! - **Session**: The resume session token held by a driver
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ tidelink-rs  │  Dialect drivers (Lavalink, Nodelink)
//! └──────┬───────┘
//!        │ builds requests, owns sessions
//! ┌──────▼───────┐
//! │   runtime    │  This crate
//! │  ┌────────┐  │
//! │  │ Conn   │  │  WebSocket events -> NodeSink
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Req    │  │  REST + response translation
//! │  └────────┘  │
//! └──────────────┘
//! ```
//!
//! Nothing here interprets socket payloads or knows about dialect paths. A
//! dialect plugs its behavior in through the translator given to [`Requester`]
//! and the URLs in [`DriverConfig`].

pub mod config;
pub mod connection;
pub mod error;
pub mod requester;
pub mod session;

pub use config::{CLIENT_NAME, Dialect, DriverConfig, ManagerOptions, NodeOptions};
pub use connection::{ABNORMAL_CLOSE, Connection, NO_STATUS_CLOSE, NodeSink, SocketEvent, SocketHandle, build_request};
pub use error::{Error, Result};
pub use requester::{Method, RequestDescriptor, Requester, Translator};
pub use session::{SessionManager, SessionToken};
