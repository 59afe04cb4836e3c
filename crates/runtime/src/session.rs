//! Resume session state.
//!
//! A driver starts with no session. `update_session` on a dialect with resume
//! support stores a [`SessionToken`]; re-registering the driver clears it.
//! The token is a single scalar: writers replace it wholesale and the most
//! recent write wins.

use parking_lot::RwLock;

/// Session id plus the resume settings it was registered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
	pub id: String,
	/// Whether the server was asked to keep this session alive across disconnects.
	pub resumable: bool,
	/// Resume timeout in seconds.
	pub timeout: u64,
}

/// Holds the driver's current session token.
#[derive(Debug, Default)]
pub struct SessionManager {
	token: RwLock<Option<SessionToken>>,
}

impl SessionManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the current token.
	pub fn update(&self, token: SessionToken) {
		*self.token.write() = Some(token);
	}

	/// Drops the current token, returning to the no-session state.
	pub fn clear(&self) {
		*self.token.write() = None;
	}

	/// Snapshot of the current token.
	pub fn current(&self) -> Option<SessionToken> {
		self.token.read().clone()
	}

	pub fn session_id(&self) -> Option<String> {
		self.token.read().as_ref().map(|token| token.id.clone())
	}

	pub fn has_session(&self) -> bool {
		self.token.read().is_some()
	}

	/// True while a resumable token is held.
	pub fn is_resumable(&self) -> bool {
		self.token.read().as_ref().is_some_and(|token| token.resumable)
	}

	/// Value for the `Session-Id` handshake header.
	///
	/// Empty unless resume is enabled by configuration and a resumable token is held.
	pub fn header_value(&self, resume_enabled: bool) -> String {
		match self.token.read().as_ref() {
			Some(token) if resume_enabled && token.resumable => token.id.clone(),
			_ => String::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;

	fn token(id: &str, resumable: bool) -> SessionToken {
		SessionToken {
			id: id.to_string(),
			resumable,
			timeout: 60,
		}
	}

	#[test]
	fn starts_without_session() {
		let session = SessionManager::new();
		assert!(!session.has_session());
		assert_eq!(session.header_value(true), "");
	}

	#[test]
	fn header_requires_resume_enabled_and_resumable_token() {
		let session = SessionManager::new();
		session.update(token("abc", true));
		assert_eq!(session.header_value(true), "abc");
		assert_eq!(session.header_value(false), "");

		session.update(token("abc", false));
		assert_eq!(session.header_value(true), "");
		assert_eq!(session.session_id().as_deref(), Some("abc"));
	}

	#[test]
	fn clear_returns_to_no_session() {
		let session = SessionManager::new();
		session.update(token("abc", true));
		session.clear();
		assert!(session.current().is_none());
		assert!(!session.is_resumable());
	}

	#[test]
	fn concurrent_writers_leave_one_complete_token() {
		let session = Arc::new(SessionManager::new());
		let handles: Vec<_> = (0..8)
			.map(|i| {
				let session = Arc::clone(&session);
				std::thread::spawn(move || session.update(token(&format!("s{i}"), true)))
			})
			.collect();
		for handle in handles {
			handle.join().unwrap();
		}

		let current = session.current().unwrap();
		assert!(current.id.starts_with('s'));
		assert!(current.resumable);
	}
}
