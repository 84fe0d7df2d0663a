use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DeployError;

/// The project's deploy configuration: a map from network-alias name to the
/// endpoint, fee, and key material used when deploying to it.
///
/// Written by the (external) alias wizard; this crate only ever adds the
/// resolved `smartContract` to an alias, the first time one is chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	/// Alias map. Older config files call this key `deployAliases`.
	#[serde(rename = "networks", alias = "deployAliases")]
	pub networks: BTreeMap<String, NetworkAlias>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAlias {
	/// GraphQL endpoint of the network.
	pub url: String,
	/// Transaction fee in MINA, as the operator entered it (decimal string).
	pub fee: String,
	/// Path to the fee-payer key file, relative to the config file.
	pub key_path: String,
	/// Contract chosen on a previous deploy of this alias, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub smart_contract: Option<String>,
}

impl Config {
	/// Load the config file. A missing or unparseable file is fatal; the
	/// alias wizard owns creating it.
	pub fn load(path: &Path) -> Result<Self, DeployError> {
		if !path.exists() {
			return Err(DeployError::ConfigMissing(path.to_owned()));
		}
		let content = std::fs::read_to_string(path).map_err(|e| DeployError::ConfigInvalid {
			path: path.to_owned(),
			reason: e.to_string(),
		})?;
		serde_json::from_str(&content).map_err(|e| DeployError::ConfigInvalid {
			path: path.to_owned(),
			reason: e.to_string(),
		})
	}

	/// Persist the config back to disk.
	///
	/// There is no cross-invocation locking; two concurrent deploys writing
	/// the same alias race with last-write-wins.
	pub fn save(&self, path: &Path) -> Result<(), DeployError> {
		let pretty = serde_json::to_string_pretty(self).map_err(|e| DeployError::ConfigWrite {
			path: path.to_owned(),
			reason: e.to_string(),
		})?;
		std::fs::write(path, pretty).map_err(|e| DeployError::ConfigWrite {
			path: path.to_owned(),
			reason: e.to_string(),
		})
	}

	/// Look up an alias by name. Alias names are unique case-insensitively
	/// by convention, so an exact match is preferred and a case-insensitive
	/// match accepted. Returns the canonical name alongside the entry.
	pub fn alias(&self, name: &str) -> Option<(&str, &NetworkAlias)> {
		if let Some((k, v)) = self.networks.get_key_value(name) {
			return Some((k.as_str(), v));
		}
		self.networks
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(name))
			.map(|(k, v)| (k.as_str(), v))
	}

	/// Record the contract chosen for an alias. The caller saves.
	pub fn set_contract(&mut self, alias: &str, contract: &str) {
		if let Some(entry) = self.networks.get_mut(alias) {
			entry.smart_contract = Some(contract.to_owned());
		}
	}
}
