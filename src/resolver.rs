use crate::artifact::DiscoveredContract;
use crate::config::Config;
use crate::error::DeployError;
use crate::prompt::Prompter;

/// The resolver's answer: which contract to deploy, and whether the choice
/// was made just now (and therefore needs to be persisted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
	pub contract: String,
	pub newly_chosen: bool,
}

/// Decide which contract to deploy for `alias`.
///
/// Policy, in order:
/// 1. a `smartContract` already recorded for the alias wins unconditionally,
///    with no re-validation against the artifact;
/// 2. a single discovered contract is used as-is;
/// 3. two or more discovered contracts require an interactive selection.
///
/// Zero discovered contracts with no recorded choice is fatal — prompting
/// against an empty list helps nobody. A fresh choice is written into
/// `config`; cancelling the selection leaves it untouched. The caller saves,
/// so a repeat deploy of the same alias never prompts again.
pub fn resolve_contract(
	config: &mut Config,
	alias: &str,
	discovered: &[DiscoveredContract],
	prompter: &dyn Prompter,
) -> Result<Resolution, DeployError> {
	if let Some((_, entry)) = config.alias(alias) {
		if let Some(configured) = &entry.smart_contract {
			return Ok(Resolution {
				contract: configured.clone(),
				newly_chosen: false,
			});
		}
	}

	let contract = match discovered {
		[] => return Err(DeployError::NoContractsFound),
		[only] => only.name.clone(),
		many => {
			let names: Vec<String> = many.iter().map(|c| c.name.clone()).collect();
			let picked = prompter.select_contract(&names)?;
			names[picked].clone()
		}
	};

	config.set_contract(alias, &contract);
	Ok(Resolution {
		contract,
		newly_chosen: true,
	})
}
