//! Wire types for audio node servers.
//!
//! This crate contains the serde-serializable shapes exchanged with a node
//! server over REST and over its event socket, plus the pure load-type
//! translation that folds each dialect's vocabulary onto one canonical
//! taxonomy.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization and tag translation
//! - **Canonical**: [`LoadResult`] is the single schema every dialect is translated into
//! - **Lenient on read**: Optional server fields default instead of failing
//!
//! Driver logic (sockets, HTTP, sessions) lives in `tidelink-runtime` and `tidelink`.

pub mod load_result;
pub mod load_type;
pub mod lyrics;
pub mod message;
pub mod player;
pub mod session;
pub mod track;

pub use load_result::*;
pub use load_type::*;
pub use lyrics::*;
pub use message::*;
pub use player::*;
pub use session::*;
pub use track::*;
