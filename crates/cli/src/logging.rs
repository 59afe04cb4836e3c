use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Installs the stderr subscriber. `RUST_LOG` overrides the verbosity default.
pub fn init_logging(verbosity: u8) {
	// 0 = driver warnings only (soft REST failures, ignored resume requests)
	// 1 (-v) = info, including connection lifecycle
	// 2+ (-vv) = debug for everything, including per-request traces
	let filter = match verbosity {
		0 => "warn,tidelink_runtime::connection=error",
		1 => "info",
		_ => "debug",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(verbosity > 1)
		.with_level(true)
		.compact()
		.init();
}
