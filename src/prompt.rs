use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::error::DeployError;

/// Outcome of the confirmation gate: `Pending -> {Confirmed, Aborted}`.
/// Once `Aborted`, nothing is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
	Confirmed,
	Aborted,
}

/// Pure transition rule for the confirmation gate. Only an exact
/// case-insensitive "yes" or "y" confirms; anything else (including empty
/// input) aborts.
pub fn confirm_from_input(input: &str) -> Confirmation {
	let answer = input.trim();
	if answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y") {
		Confirmation::Confirmed
	} else {
		Confirmation::Aborted
	}
}

/// Pure validation rule for the interactive nonce fallback. Returns the
/// rejection message to show before re-prompting.
pub fn validate_nonce(input: &str) -> Result<u32, String> {
	let value = input.trim();
	if value.is_empty() {
		return Err("A nonce is required.".into());
	}
	value
		.parse()
		.map_err(|_| format!("'{value}' is not a valid nonce; enter a non-negative number."))
}

/// What the operator is shown before being asked to confirm.
pub struct DeploySummary<'a> {
	pub alias: &'a str,
	pub url: &'a str,
	pub contract: &'a str,
}

/// Every interactive boundary of the pipeline, decoupled from rendering so
/// the pipeline can be driven by a test double.
pub trait Prompter {
	/// Pick one contract from the discovered names. `SelectionCancelled`
	/// if the operator backs out.
	fn select_contract(&self, choices: &[String]) -> Result<usize, DeployError>;

	/// Ask for the fee-payer nonce when the network could not provide one.
	/// Re-prompts until the input validates; cancellation is an error.
	fn ask_nonce(&self, public_key: &str) -> Result<u32, DeployError>;

	/// Show the summary and run the confirmation gate.
	fn confirm(&self, summary: &DeploySummary<'_>) -> Result<Confirmation, DeployError>;
}

/// Dialoguer-backed prompter used by the real CLI.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
	fn select_contract(&self, choices: &[String]) -> Result<usize, DeployError> {
		let picked = Select::with_theme(&ColorfulTheme::default())
			.with_prompt("Choose the smart contract to deploy")
			.items(choices)
			.default(0)
			.interact_opt()
			.map_err(|e| DeployError::Prompt(e.to_string()))?;
		picked.ok_or(DeployError::SelectionCancelled)
	}

	fn ask_nonce(&self, public_key: &str) -> Result<u32, DeployError> {
		println!("Could not fetch the nonce for {public_key} from the network.");
		loop {
			let input: String = Input::with_theme(&ColorfulTheme::default())
				.with_prompt("Account nonce")
				.allow_empty(true)
				.interact_text()
				.map_err(|e| DeployError::Prompt(e.to_string()))?;
			match validate_nonce(&input) {
				Ok(nonce) => return Ok(nonce),
				Err(msg) => println!("{msg}"),
			}
		}
	}

	fn confirm(&self, summary: &DeploySummary<'_>) -> Result<Confirmation, DeployError> {
		println!("About to deploy:");
		println!("  Network:  {}", summary.alias);
		println!("  URL:      {}", summary.url);
		println!("  Contract: {}", summary.contract);
		let input: String = Input::with_theme(&ColorfulTheme::default())
			.with_prompt("Type 'yes' to send the transaction")
			.allow_empty(true)
			.interact_text()
			.map_err(|e| DeployError::Prompt(e.to_string()))?;
		Ok(confirm_from_input(&input))
	}
}
