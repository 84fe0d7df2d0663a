use std::path::{Path, PathBuf};

use crate::artifact;
use crate::builder::IntentBuilder;
use crate::config::Config;
use crate::error::DeployError;
use crate::graphql::GraphQlClient;
use crate::keys::KeyMaterial;
use crate::prompt::{Confirmation, DeploySummary, Prompter};
use crate::resolver;
use crate::signer;

/// Where the compiled contract classes live, relative to the project root.
pub const BUILD_GLOB: &str = "build/**/*.js";

/// How a deploy invocation ended, short of an error. The binary entry point
/// turns this into an exit status; nothing in here touches the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
	Submitted { hash: String, id: Option<String> },
	Aborted,
}

/// The deploy pipeline: discover → resolve → build → nonce → sign →
/// confirm → submit, strictly sequential.
///
/// The builder and prompter come in as seams so the pipeline runs under test
/// without a toolchain or a terminal. The only network traffic is the nonce
/// query and the submission, both bounded by [`crate::graphql::REQUEST_TIMEOUT`].
pub async fn run(
	alias_name: &str,
	auto_confirm: bool,
	config_path: &Path,
	build_glob: &str,
	builder: &dyn IntentBuilder,
	prompter: &dyn Prompter,
) -> Result<DeployOutcome, DeployError> {
	let mut config = Config::load(config_path)?;

	let (alias, url, fee, key_path) = {
		let (name, entry) = config
			.alias(alias_name)
			.ok_or_else(|| DeployError::UnknownAlias(alias_name.to_owned()))?;
		if entry.url.trim().is_empty() {
			return Err(DeployError::MissingUrl(name.to_owned()));
		}
		(
			name.to_owned(),
			entry.url.clone(),
			entry.fee.clone(),
			entry.key_path.clone(),
		)
	};

	let discovered = artifact::scan(build_glob)?;
	let resolution = resolver::resolve_contract(&mut config, &alias, &discovered, prompter)?;
	if resolution.newly_chosen {
		config.save(config_path)?;
		println!("Using {} for '{alias}' (saved to config).", resolution.contract);
	}

	// A configured choice is taken on faith at resolve time; it still has to
	// exist in the build output for the builder to import it.
	let contract = discovered
		.iter()
		.find(|c| c.name == resolution.contract)
		.cloned()
		.ok_or_else(|| {
			DeployError::Build(format!(
				"contract '{}' is not present in the build output",
				resolution.contract
			))
		})?;

	let keys = KeyMaterial::load(&key_path_for(config_path, &key_path))?;
	let fee_payer = keys.public_key();

	println!("Compiling {}... this can take a while.", contract.name);
	let intent = builder.build(&contract, &fee_payer).await?;

	let client = GraphQlClient::new(&url);
	let nonce = match client.account_nonce(&fee_payer).await {
		Ok(Some(nonce)) => nonce,
		// Unknown account or a failed probe both degrade to the prompt.
		Ok(None) | Err(_) => prompter.ask_nonce(&fee_payer)?,
	};

	let tx = signer::sign(intent, nonce, &fee, &keys)?;

	let confirmation = if auto_confirm {
		Confirmation::Confirmed
	} else {
		prompter.confirm(&DeploySummary {
			alias: &alias,
			url: &url,
			contract: &contract.name,
		})?
	};
	if confirmation == Confirmation::Aborted {
		// Hard boundary: the signed transaction is discarded, nothing sent.
		return Ok(DeployOutcome::Aborted);
	}

	let receipt = client.send_transaction(&tx).await?;
	println!("Transaction sent.");
	println!("  Hash: {}", receipt.hash);
	if let Some(id) = &receipt.id {
		println!("  ID:   {id}");
	}

	Ok(DeployOutcome::Submitted {
		hash: receipt.hash,
		id: receipt.id,
	})
}

/// Key paths in the config are relative to the config file itself.
fn key_path_for(config_path: &Path, key_path: &str) -> PathBuf {
	config_path
		.parent()
		.unwrap_or_else(|| Path::new("."))
		.join(key_path)
}
