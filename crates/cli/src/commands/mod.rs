//! Subcommand implementations.

mod listen;

use std::time::Instant;

use serde::Serialize;
use tidelink::{CapabilityArgs, Dialect, Driver, GET_LYRIC, NodeSink, PlayerContext, SocketEvent};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::{Cli, Commands, LyricsArgs};
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::{self, CommandResult, OutputFormat};

/// A registered driver plus the receiving end of its node inbox.
pub struct Session {
	pub driver: Driver,
	pub events: mpsc::UnboundedReceiver<SocketEvent>,
	pub config: CliConfig,
}

impl Session {
	/// Builds and registers the driver for `config`.
	pub fn open(config: CliConfig) -> Result<Self> {
		let driver = Driver::for_node(&config.node);
		let (sink, events) = NodeSink::channel();
		driver.initial(config.manager.clone(), config.node.clone(), sink)?;
		info!(driver = driver.id(), url = ?driver.http_url(), "Driver ready");
		Ok(Self { driver, events, config })
	}
}

pub async fn dispatch(cli: Cli) -> Result<()> {
	let format = cli.format;
	let config = CliConfig::resolve(&cli.node)?;
	let command = cli.command.name();
	let mut session = Session::open(config)?;
	let started = Instant::now();

	match cli.command {
		Commands::Info => {
			let info = session.driver.info().await?;
			emit(command, info, started, format);
		}
		Commands::Load { identifier } => {
			let result = session.driver.load_tracks(&identifier).await?;
			emit(command, result, started, format);
		}
		Commands::Decode { encoded } => {
			let track = session.driver.decode_track(&encoded).await?;
			emit(command, track, started, format);
		}
		Commands::Lyrics(args) => {
			let lyrics = lyrics(&session.driver, &args).await?;
			emit(command, lyrics, started, format);
		}
		Commands::Listen(args) => listen::run(&mut session, &args).await?,
	}
	Ok(())
}

fn emit<T: Serialize>(command: &str, data: Option<T>, started: Instant, format: OutputFormat) {
	output::print_result(&CommandResult::success(command, data, started.elapsed()), format);
}

/// Decodes the track, then runs the dialect's lyrics capability with it as the current track.
async fn lyrics(driver: &Driver, args: &LyricsArgs) -> Result<Option<serde_json::Value>> {
	if driver.dialect() != Dialect::Nodelink {
		return Err(tidelink::Error::UnsupportedCapability {
			driver: driver.id(),
			name: GET_LYRIC.to_string(),
		}
		.into());
	}

	let track = driver
		.decode_track(&args.encoded)
		.await?
		.ok_or_else(|| CliError::UndecodableTrack(args.encoded.clone()))?;
	let player = PlayerContext::new("cli").with_current(track);
	let capability_args = CapabilityArgs::new().with("language", args.language.as_str());
	Ok(driver.call_capability(GET_LYRIC, &player, capability_args).await?)
}
