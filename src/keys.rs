use std::path::Path;

use k256::ecdsa::signature::DigestSigner;
use k256::ecdsa::{Signature, SigningKey};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::DeployError;

/// On-disk key file shape. Only `privateKey` is consumed; the public key is
/// re-derived from the secret rather than trusted from the file.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyFile {
	private_key: String,
	#[allow(dead_code)]
	public_key: Option<String>,
}

/// The fee-payer's secret key, read once per invocation.
///
/// Deliberately no `Debug`/`Display` and no accessor for the secret itself;
/// the key leaves this type only as signatures and the derived public key.
pub struct KeyMaterial {
	signing: SigningKey,
}

impl KeyMaterial {
	/// Read and decode the key file at `path`.
	pub fn load(path: &Path) -> Result<Self, DeployError> {
		let key_file = |reason: String| DeployError::KeyFile {
			path: path.to_owned(),
			reason,
		};

		let content = std::fs::read_to_string(path).map_err(|e| key_file(e.to_string()))?;
		let parsed: KeyFile =
			serde_json::from_str(&content).map_err(|e| key_file(e.to_string()))?;

		let raw = hex::decode(parsed.private_key.trim_start_matches("0x"))
			.map_err(|e| key_file(format!("privateKey is not valid hex: {e}")))?;
		let signing = SigningKey::from_slice(&raw)
			.map_err(|e| key_file(format!("privateKey is not a valid scalar: {e}")))?;

		Ok(Self { signing })
	}

	/// Hex-encoded compressed public key; doubles as the fee-payer address.
	pub fn public_key(&self) -> String {
		hex::encode(self.signing.verifying_key().to_sec1_bytes())
	}

	/// Sign a message (SHA-256 digest, deterministic ECDSA) and return the
	/// signature hex-encoded.
	pub fn sign(&self, message: &[u8]) -> String {
		let digest = Sha256::new_with_prefix(message);
		let signature: Signature = self.signing.sign_digest(digest);
		hex::encode(signature.to_bytes())
	}
}
