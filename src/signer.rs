use serde::Serialize;
use serde_json::{json, Value};

use crate::builder::TransactionIntent;
use crate::error::DeployError;
use crate::keys::KeyMaterial;

/// Memo is always empty for deploys.
pub const MEMO: &str = "";

/// Scale a human-entered MINA fee to nanomina by appending nine zero digits.
///
/// This is string concatenation on purpose: the fee must survive byte-for-byte
/// with no floating-point rounding.
pub fn scale_fee(fee_mina: &str) -> String {
	format!("{fee_mina}000000000")
}

/// A deploy transaction ready for submission. Immutable once produced and
/// submitted at most once per invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
	pub fee_payer: String,
	pub nonce: u32,
	/// Nanomina, textual-scaled from the configured MINA fee.
	pub fee: String,
	pub memo: String,
	pub parties_payload: Value,
	/// Hex signature over the canonical signing payload.
	pub signature: String,
}

impl SignedTransaction {
	/// Shape of the `sendZkapp` mutation's input object.
	pub fn graphql_input(&self) -> Value {
		json!({
			"parties": self.parties_payload,
			"feePayer": {
				"publicKey": self.fee_payer,
				"nonce": self.nonce.to_string(),
				"fee": self.fee,
				"memo": self.memo,
			},
			"signature": self.signature,
		})
	}
}

/// Pure, local, deterministic signing step.
///
/// Takes the intent by value: it is consumed exactly once. No network access;
/// the only cryptography is the deterministic signature itself.
pub fn sign(
	intent: TransactionIntent,
	nonce: u32,
	fee_mina: &str,
	keys: &KeyMaterial,
) -> Result<SignedTransaction, DeployError> {
	let fee_payer = keys.public_key();
	let fee = scale_fee(fee_mina);

	// Canonical signing payload: the full transaction minus the signature,
	// serialized with serde_json's stable key ordering.
	let unsigned = json!({
		"feePayer": fee_payer,
		"nonce": nonce,
		"fee": fee,
		"memo": MEMO,
		"parties": intent.parties_payload,
	});
	let message = serde_json::to_vec(&unsigned)
		.map_err(|e| DeployError::Build(format!("could not encode signing payload: {e}")))?;
	let signature = keys.sign(&message);

	Ok(SignedTransaction {
		fee_payer,
		nonce,
		fee,
		memo: MEMO.to_owned(),
		parties_payload: unsigned["parties"].clone(),
		signature,
	})
}
