
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tidelink::Dialect;

use crate::output::OutputFormat;

/// Root CLI for tidelink.
#[derive(Parser, Debug)]
#[command(name = "tidelink")]
#[command(about = "Talk to Lavalink and Nodelink audio node servers")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: json (default) or ndjson
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	#[command(flatten)]
	pub node: NodeArgs,

	#[command(subcommand)]
	pub command: Commands,
}

/// Node connection settings. Flags override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct NodeArgs {
	/// JSON file with `node` and `manager` sections
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Node server host
	#[arg(long, global = true)]
	pub host: Option<String>,

	/// Node server port
	#[arg(long, global = true)]
	pub port: Option<u16>,

	/// Use wss/https
	#[arg(long, global = true)]
	pub secure: bool,

	/// Authorization password
	#[arg(long, global = true)]
	pub auth: Option<String>,

	/// Server dialect: lavalink (v4) or nodelink (v2)
	#[arg(long, global = true)]
	pub dialect: Option<Dialect>,

	/// Client user id sent as `User-Id`
	#[arg(long, global = true)]
	pub client_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Show server information.
	Info,
	/// Load tracks for an identifier or search query (e.g. `ytsearch:daft punk`).
	Load {
		#[arg(value_name = "IDENTIFIER")]
		identifier: String,
	},
	/// Decode an encoded track.
	Decode {
		#[arg(value_name = "ENCODED")]
		encoded: String,
	},
	/// Fetch synchronized lyrics for an encoded track (nodelink only).
	Lyrics(LyricsArgs),
	/// Connect to the event socket and print events as NDJSON.
	Listen(ListenArgs),
}

impl Commands {
	/// Name used in output envelopes.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Info => "info",
			Commands::Load { .. } => "load",
			Commands::Decode { .. } => "decode",
			Commands::Lyrics(_) => "lyrics",
			Commands::Listen(_) => "listen",
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct LyricsArgs {
	#[arg(value_name = "ENCODED")]
	pub encoded: String,

	/// Lyrics language code
	#[arg(short, long, default_value = "en")]
	pub language: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
	/// Ask the server to keep the session resumable
	#[arg(long)]
	pub resume: bool,

	/// Resume timeout in seconds
	#[arg(long, value_name = "SECS", requires = "resume")]
	pub resume_timeout: Option<u64>,

	/// Stop after this many messages
	#[arg(short = 'n', long, value_name = "N")]
	pub count: Option<usize>,
}
