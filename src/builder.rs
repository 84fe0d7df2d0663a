use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;

use crate::artifact::DiscoveredContract;
use crate::error::DeployError;

/// The unsigned output of the transaction builder: the contract's verification
/// key plus the parties payload describing the deploy. Consumed exactly once
/// by the signer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIntent {
	pub verification_key: Value,
	pub parties_payload: Value,
}

/// Seam for producing the unsigned intent. The real implementation shells out
/// to the project's toolchain; tests substitute a stub so the pipeline runs
/// without one.
#[async_trait]
pub trait IntentBuilder: Send + Sync {
	async fn build(
		&self,
		contract: &DiscoveredContract,
		fee_payer: &str,
	) -> Result<TransactionIntent, DeployError>;
}

/// Inline script run by `node`. Circuit compilation lives with the compiled
/// artifact's own runtime, so the builder imports the artifact there, compiles
/// the verification key, constructs the deploy transaction, and prints a
/// single JSON object on stdout.
const BUILD_SCRIPT: &str = r#"
const { pathToFileURL } = await import('node:url');
const file = process.env.ZKAPP_FILE;
const name = process.env.ZKAPP_CONTRACT;
const feePayer = process.env.ZKAPP_FEE_PAYER;
const mod = await import(pathToFileURL(file).href);
const Contract = mod[name];
if (!Contract) throw new Error(`${name} is not exported from ${file}`);
const { verificationKey } = await Contract.compile();
const partiesPayload = await Contract.deployTransaction({ feePayer, verificationKey });
process.stdout.write(JSON.stringify({ verificationKey, partiesPayload }));
"#;

/// Builds the intent by invoking `node` on the compiled artifact.
///
/// This step compiles the contract's circuit and can take minutes; the
/// pipeline suspends until it finishes.
pub struct NodeIntentBuilder;

#[async_trait]
impl IntentBuilder for NodeIntentBuilder {
	async fn build(
		&self,
		contract: &DiscoveredContract,
		fee_payer: &str,
	) -> Result<TransactionIntent, DeployError> {
		let output = Command::new("node")
			.arg("--input-type=module")
			.arg("-e")
			.arg(BUILD_SCRIPT)
			.env("ZKAPP_FILE", &contract.file)
			.env("ZKAPP_CONTRACT", &contract.name)
			.env("ZKAPP_FEE_PAYER", fee_payer)
			.output()
			.await
			.map_err(|e| DeployError::Build(format!("could not run node: {e}")))?;

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr);
			return Err(DeployError::Build(stderr.trim().to_owned()));
		}
		parse_intent(&output.stdout)
	}
}

/// Decode the builder's stdout into an intent.
pub fn parse_intent(stdout: &[u8]) -> Result<TransactionIntent, DeployError> {
	serde_json::from_slice(stdout)
		.map_err(|e| DeployError::Build(format!("malformed builder output: {e}")))
}
