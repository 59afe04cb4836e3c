//! `listen`: stream socket events until closed.

use tidelink::{ReadyMessage, SocketEvent};
use tracing::{debug, info, warn};

use super::Session;
use crate::cli::ListenArgs;
use crate::error::Result;
use crate::output;

pub async fn run(session: &mut Session, args: &ListenArgs) -> Result<()> {
	let resume_timeout = args.resume_timeout.unwrap_or(session.config.manager.resume_timeout);
	let mut messages = 0usize;
	let mut closing = false;

	session.driver.connect()?;

	loop {
		let event = tokio::select! {
			event = session.events.recv() => event,
			_ = tokio::signal::ctrl_c(), if !closing => {
				info!("Interrupted, closing socket");
				closing = true;
				session.driver.ws_close();
				continue;
			}
		};
		let Some(event) = event else {
			break;
		};

		output::print_line(&output::event_json(&event))?;

		match &event {
			SocketEvent::Message(message) => {
				messages += 1;
				if let Some(ready) = ReadyMessage::from_message(message) {
					on_ready(session, &ready, args.resume, resume_timeout).await?;
				}
				if !closing && args.count.is_some_and(|limit| messages >= limit) {
					debug!(messages, "Message limit reached");
					closing = true;
					session.driver.ws_close();
				}
			}
			SocketEvent::Close { code, reason } => {
				info!(code, %reason, "Socket closed");
				break;
			}
			SocketEvent::Open | SocketEvent::Error(_) => {}
		}
	}

	session.driver.ws_close();
	Ok(())
}

async fn on_ready(session: &Session, ready: &ReadyMessage, resume: bool, timeout: u64) -> Result<()> {
	info!(session_id = %ready.session_id, resumed = ready.resumed, "Session ready");
	session.driver.attach_session(&ready.session_id);
	if resume {
		session.driver.update_session(&ready.session_id, true, timeout).await?;
		if !session.driver.core().session().is_resumable() {
			warn!(session_id = %ready.session_id, "Session is not resumable");
		}
	}
	Ok(())
}
