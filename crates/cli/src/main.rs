use clap::Parser;
use tidelink_cli::cli::Cli;
use tidelink_cli::error::CliError;
use tidelink_cli::output::{self, OutputFormat};
use tidelink_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli).await {
		handle_error(command, err, format);
		std::process::exit(1);
	}
}

fn handle_error(command: &'static str, err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	// Humans read stderr; scripts read the envelope on stdout.
	output::print_error_stderr(&cmd_error);
	output::print_result(&output::CommandResult::<()>::failure(command, cmd_error), format);
}
