use std::path::PathBuf;

use crate::error::DeployError;

/// Base class that marks a compiled class as a deployable contract.
const CONTRACT_BASE: &str = "SmartContract";

/// A contract class declaration found in the compiled build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredContract {
	pub name: String,
	/// File the declaration was found in; the transaction builder imports it.
	pub file: PathBuf,
}

/// Scan the compiled output matched by `pattern` for declarations of the
/// form `class <Name> extends SmartContract`.
///
/// Read-only. Order follows the glob's file order, then declaration order
/// within each file. Duplicate names across files are kept as-is; picking
/// between them is the resolver's problem. An empty result is not an error
/// here either — the resolver decides what absence means.
pub fn scan(pattern: &str) -> Result<Vec<DiscoveredContract>, DeployError> {
	let paths = glob::glob(pattern).map_err(|e| DeployError::Artifact(e.to_string()))?;

	let mut found = Vec::new();
	for entry in paths {
		let path = entry.map_err(|e| DeployError::Artifact(e.to_string()))?;
		if !path.is_file() {
			continue;
		}
		let source = std::fs::read_to_string(&path)
			.map_err(|e| DeployError::Artifact(format!("{}: {e}", path.display())))?;
		for name in contract_names(&source) {
			found.push(DiscoveredContract {
				name,
				file: path.clone(),
			});
		}
	}
	Ok(found)
}

/// Lexical scan of one source file for contract class declarations.
///
/// The declaration grammar is four identifier tokens in a row:
/// `class`, the name, `extends`, then the base contract type. Tokenizing on
/// identifier characters keeps this robust against whitespace, braces, and
/// minified output without reaching for a general regex.
pub fn contract_names(source: &str) -> Vec<String> {
	let tokens: Vec<&str> = source
		.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
		.filter(|t| !t.is_empty())
		.collect();

	let mut names = Vec::new();
	for window in tokens.windows(4) {
		if window[0] == "class" && window[2] == "extends" && window[3] == CONTRACT_BASE {
			names.push(window[1].to_owned());
		}
	}
	names
}
