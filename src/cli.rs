use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
	name = "zkapp",
	about = "Deploy zkApp smart contracts to a configured network.",
	version
)]
pub struct Cli {
	/// Path to the project's deploy configuration.
	#[arg(long, default_value = "config.json", global = true)]
	pub config: PathBuf,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Deploy the project's smart contract to a network alias.
	Deploy {
		/// Network alias to deploy to (as configured in config.json).
		alias: String,

		/// Skip the confirmation prompt.
		#[arg(long, short = 'y')]
		yes: bool,
	},

	/// List the configured network aliases.
	Networks,
}
