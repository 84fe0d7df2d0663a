use std::process::ExitCode;

use clap::Parser;

use zkapp_cli::builder::NodeIntentBuilder;
use zkapp_cli::cli::{Cli, Command};
use zkapp_cli::commands;
use zkapp_cli::commands::deploy::{DeployOutcome, BUILD_GLOB};
use zkapp_cli::prompt::TerminalPrompter;

/// The one place where the typed pipeline result becomes a process exit
/// status: 0 on a submitted transaction, non-zero on any fatal or aborted
/// path. An operator abort is reported plainly, not as an error.
#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	match &cli.command {
		Command::Deploy { alias, yes } => {
			let result = commands::deploy::run(
				alias,
				*yes,
				&cli.config,
				BUILD_GLOB,
				&NodeIntentBuilder,
				&TerminalPrompter,
			)
			.await;

			match result {
				Ok(DeployOutcome::Submitted { .. }) => ExitCode::SUCCESS,
				Ok(DeployOutcome::Aborted) => {
					println!("Deploy aborted; nothing was sent.");
					ExitCode::FAILURE
				}
				Err(e) => {
					eprintln!("Error: {e}");
					ExitCode::FAILURE
				}
			}
		}
		Command::Networks => match commands::networks::run(&cli.config) {
			Ok(()) => ExitCode::SUCCESS,
			Err(e) => {
				eprintln!("Error: {e}");
				ExitCode::FAILURE
			}
		},
	}
}
