use std::path::PathBuf;

use thiserror::Error;

/// Everything that can end a deploy invocation unsuccessfully.
///
/// The pipeline never calls `process::exit` itself; the binary entry point
/// translates these (and the aborted outcome) into an exit status.
#[derive(Debug, Error)]
pub enum DeployError {
	#[error("no deploy configuration found at {0}")]
	ConfigMissing(PathBuf),

	#[error("could not parse {path}: {reason}")]
	ConfigInvalid { path: PathBuf, reason: String },

	#[error("could not write {path}: {reason}")]
	ConfigWrite { path: PathBuf, reason: String },

	#[error("network alias '{0}' is not configured")]
	UnknownAlias(String),

	#[error("network alias '{0}' has no url configured")]
	MissingUrl(String),

	#[error("could not scan the build output: {0}")]
	Artifact(String),

	#[error("no smart contract classes found in the build output")]
	NoContractsFound,

	#[error("contract selection cancelled")]
	SelectionCancelled,

	#[error("could not read key file {path}: {reason}")]
	KeyFile { path: PathBuf, reason: String },

	#[error("building the deploy transaction failed: {0}")]
	Build(String),

	#[error("prompt failed: {0}")]
	Prompt(String),

	#[error(transparent)]
	Submit(#[from] SubmitError),
}

/// Classified outcome of talking to the network endpoint.
///
/// None of these are retried; the invocation reports and ends.
#[derive(Debug, Error)]
pub enum SubmitError {
	/// The endpoint answered with a non-success HTTP status.
	#[error("HTTP {status} {status_text}: {message}")]
	Http {
		status: u16,
		status_text: String,
		message: String,
	},

	/// Timeout, DNS failure, connection refused, and friends.
	#[error("network error: {0}")]
	Transport(String),

	/// The endpoint answered 200 but the payload marks a failure.
	#[error("rejected by the network: {0}")]
	Rejected(String),
}
