use std::time::Duration;

use serde_json::{json, Value};

use crate::error::SubmitError;
use crate::signer::SignedTransaction;

/// Hard bound on each network call. On expiry the request resolves as a
/// classified transport error, never a hang.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const ACCOUNT_QUERY: &str =
	"query($publicKey: PublicKey!) { account(publicKey: $publicKey) { nonce } }";

const SEND_ZKAPP_MUTATION: &str =
	"mutation($input: SendZkappInput!) { sendZkapp(input: $input) { zkapp { hash id kind } } }";

/// What a successful submission hands back to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
	pub hash: String,
	pub id: Option<String>,
}

/// Thin wrapper around the network's GraphQL endpoint. Raw JSON bodies over
/// reqwest; the two operations this pipeline consumes are an account-nonce
/// query and the transaction-submission mutation.
pub struct GraphQlClient {
	url: String,
	http: reqwest::Client,
}

impl GraphQlClient {
	pub fn new(url: &str) -> Self {
		Self {
			url: url.to_owned(),
			http: reqwest::Client::new(),
		}
	}

	/// Fetch the account's current nonce. `Ok(None)` means the endpoint
	/// answered but does not know the account; the caller falls back to an
	/// interactive prompt for that and for `Err` alike.
	pub async fn account_nonce(&self, public_key: &str) -> Result<Option<u32>, SubmitError> {
		let body = json!({
			"query": ACCOUNT_QUERY,
			"variables": { "publicKey": public_key },
		});
		let resp = self.post(&body).await?;
		Ok(extract_nonce(&resp))
	}

	/// Submit the signed transaction. One attempt, no retry at any
	/// classification.
	pub async fn send_transaction(
		&self,
		tx: &SignedTransaction,
	) -> Result<SubmitReceipt, SubmitError> {
		let body = json!({
			"query": SEND_ZKAPP_MUTATION,
			"variables": { "input": tx.graphql_input() },
		});
		let resp = self.post(&body).await?;
		parse_send_response(&resp)
	}

	async fn post(&self, body: &Value) -> Result<Value, SubmitError> {
		let resp = self
			.http
			.post(&self.url)
			.timeout(REQUEST_TIMEOUT)
			.json(body)
			.send()
			.await
			.map_err(|e| SubmitError::Transport(e.to_string()))?;

		let status = resp.status();
		if !status.is_success() {
			let text = resp.text().await.unwrap_or_default();
			return Err(SubmitError::Http {
				status: status.as_u16(),
				status_text: status.canonical_reason().unwrap_or("").to_owned(),
				message: server_errors(&text),
			});
		}

		resp.json()
			.await
			.map_err(|e| SubmitError::Rejected(format!("unparseable response body: {e}")))
	}
}

/// Pull the nonce out of an account query response. Accepts both the string
/// and numeric encodings nodes are seen to use.
pub fn extract_nonce(resp: &Value) -> Option<u32> {
	let nonce = resp.pointer("/data/account/nonce")?;
	match nonce {
		Value::String(s) => s.parse().ok(),
		Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
		_ => None,
	}
}

/// Classify a 200-status submission response.
pub fn parse_send_response(resp: &Value) -> Result<SubmitReceipt, SubmitError> {
	// Conventional top-level GraphQL errors.
	if let Some(errors) = resp.get("errors").and_then(Value::as_array) {
		if !errors.is_empty() {
			return Err(SubmitError::Rejected(join_error_messages(errors)));
		}
	}

	let zkapp = resp
		.pointer("/data/sendZkapp/zkapp")
		.ok_or_else(|| SubmitError::Rejected("response carries no zkapp object".into()))?;

	if zkapp.get("kind").and_then(Value::as_str) == Some("error") {
		return Err(SubmitError::Rejected(zkapp.to_string()));
	}

	let hash = zkapp
		.get("hash")
		.and_then(Value::as_str)
		.ok_or_else(|| SubmitError::Rejected("response carries no transaction hash".into()))?;

	Ok(SubmitReceipt {
		hash: hash.to_owned(),
		id: zkapp.get("id").and_then(Value::as_str).map(str::to_owned),
	})
}

/// Extract the server-provided error messages from an HTTP error body,
/// falling back to the raw text.
fn server_errors(body: &str) -> String {
	if let Ok(parsed) = serde_json::from_str::<Value>(body) {
		if let Some(errors) = parsed.get("errors").and_then(Value::as_array) {
			if !errors.is_empty() {
				return join_error_messages(errors);
			}
		}
	}
	body.trim().to_owned()
}

fn join_error_messages(errors: &[Value]) -> String {
	errors
		.iter()
		.map(|e| {
			e.get("message")
				.and_then(Value::as_str)
				.map(str::to_owned)
				.unwrap_or_else(|| e.to_string())
		})
		.collect::<Vec<_>>()
		.join("; ")
}
