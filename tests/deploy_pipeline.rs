//! End-to-end tests for the deploy pipeline against a mock GraphQL endpoint.
//!
//! The toolchain and terminal seams are replaced with stubs; the network is a
//! wiremock server, so everything here runs offline. The one real-time
//! timeout test is `#[ignore]`d because it has to sit through the full
//! 20-second bound:
//!
//!   cargo test --test deploy_pipeline -- --ignored

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zkapp_cli::artifact::DiscoveredContract;
use zkapp_cli::builder::{IntentBuilder, TransactionIntent};
use zkapp_cli::commands::deploy::{run, DeployOutcome};
use zkapp_cli::error::{DeployError, SubmitError};
use zkapp_cli::prompt::{Confirmation, DeploySummary, Prompter};

const TEST_KEY: &str = "a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3";

// -- Fixtures --

/// A throwaway zkApp project: config.json, a key file, and compiled output.
struct Project {
	dir: TempDir,
}

impl Project {
	fn new(url: &str, contracts: &[&str]) -> Self {
		let dir = tempfile::tempdir().unwrap();

		let config = json!({
			"networks": {
				"testnet": {
					"url": url,
					"fee": "0.05",
					"keyPath": "keys/testnet.json",
				}
			}
		});
		std::fs::write(
			dir.path().join("config.json"),
			serde_json::to_string_pretty(&config).unwrap(),
		)
		.unwrap();

		std::fs::create_dir_all(dir.path().join("keys")).unwrap();
		std::fs::write(
			dir.path().join("keys/testnet.json"),
			format!(r#"{{"privateKey":"{TEST_KEY}","publicKey":"derived"}}"#),
		)
		.unwrap();

		let build = dir.path().join("build");
		std::fs::create_dir_all(&build).unwrap();
		for (i, name) in contracts.iter().enumerate() {
			std::fs::write(
				build.join(format!("{i}_{name}.js")),
				format!("export class {name} extends SmartContract {{}}"),
			)
			.unwrap();
		}

		Self { dir }
	}

	fn config_path(&self) -> PathBuf {
		self.dir.path().join("config.json")
	}

	fn build_glob(&self) -> String {
		format!("{}/build/**/*.js", self.dir.path().display())
	}

	fn config_json(&self) -> Value {
		let content = std::fs::read_to_string(self.config_path()).unwrap();
		serde_json::from_str(&content).unwrap()
	}
}

/// Builder stub: hands back a fixed intent without touching a toolchain.
struct StubBuilder;

#[async_trait]
impl IntentBuilder for StubBuilder {
	async fn build(
		&self,
		contract: &DiscoveredContract,
		fee_payer: &str,
	) -> Result<TransactionIntent, DeployError> {
		Ok(TransactionIntent {
			verification_key: json!({"data": "vk", "hash": "vkhash"}),
			parties_payload: json!({
				"contract": contract.name,
				"feePayer": fee_payer,
				"parties": [{"update": "deploy"}],
			}),
		})
	}
}

enum SelectAction {
	/// Calling the selector at all fails the test.
	Deny,
	Cancel,
	Pick(usize),
}

/// Scripted prompter; any interaction the script does not cover panics.
struct StubPrompter {
	select: SelectAction,
	nonce: Option<u32>,
	confirm: Option<Confirmation>,
	asked_nonce: AtomicBool,
}

impl StubPrompter {
	fn new(select: SelectAction, nonce: Option<u32>, confirm: Option<Confirmation>) -> Self {
		Self {
			select,
			nonce,
			confirm,
			asked_nonce: AtomicBool::new(false),
		}
	}
}

impl Prompter for StubPrompter {
	fn select_contract(&self, choices: &[String]) -> Result<usize, DeployError> {
		match self.select {
			SelectAction::Deny => panic!("unexpected contract selection prompt"),
			SelectAction::Cancel => Err(DeployError::SelectionCancelled),
			SelectAction::Pick(i) => {
				assert!(i < choices.len());
				Ok(i)
			}
		}
	}

	fn ask_nonce(&self, _public_key: &str) -> Result<u32, DeployError> {
		self.asked_nonce.store(true, Ordering::SeqCst);
		match self.nonce {
			Some(n) => Ok(n),
			None => panic!("unexpected nonce prompt"),
		}
	}

	fn confirm(&self, _summary: &DeploySummary<'_>) -> Result<Confirmation, DeployError> {
		match self.confirm {
			Some(c) => Ok(c),
			None => panic!("unexpected confirmation prompt"),
		}
	}
}

async fn mock_nonce(server: &MockServer, account: Value) {
	Mock::given(method("POST"))
		.and(path("/graphql"))
		.and(body_string_contains("account("))
		.respond_with(
			ResponseTemplate::new(200).set_body_json(json!({"data": {"account": account}})),
		)
		.mount(server)
		.await;
}

async fn mock_send(server: &MockServer, template: ResponseTemplate) {
	Mock::given(method("POST"))
		.and(path("/graphql"))
		.and(body_string_contains("sendZkapp("))
		.respond_with(template)
		.mount(server)
		.await;
}

/// The bodies of every sendZkapp request the server saw.
async fn send_requests(server: &MockServer) -> Vec<Value> {
	server
		.received_requests()
		.await
		.unwrap()
		.iter()
		.filter_map(|r| {
			let body: Value = serde_json::from_slice(&r.body).ok()?;
			let is_send = body
				.get("query")
				.and_then(Value::as_str)
				.is_some_and(|q| q.contains("sendZkapp("));
			is_send.then_some(body)
		})
		.collect()
}

// -- Tests --

#[tokio::test]
async fn unknown_alias_aborts_before_any_network_call() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo"]);

	let err = run(
		"mainnet",
		true,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&StubPrompter::new(SelectAction::Deny, None, None),
	)
	.await
	.unwrap_err();

	assert!(matches!(err, DeployError::UnknownAlias(_)));
	assert!(server.received_requests().await.unwrap().is_empty());
}

/// The full happy path from the project fixture to the reported hash: a
/// single discovered contract is picked without prompting, the network
/// supplies nonce 3, and the sent transaction carries the textual-scaled fee.
#[tokio::test]
async fn single_contract_deploy_end_to_end() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo"]);

	mock_nonce(&server, json!({"nonce": "3"})).await;
	mock_send(
		&server,
		ResponseTemplate::new(200)
			.set_body_json(json!({"data": {"sendZkapp": {"zkapp": {"hash": "0xabc"}}}})),
	)
	.await;

	let prompter = StubPrompter::new(SelectAction::Deny, None, Some(Confirmation::Confirmed));
	let outcome = run(
		"testnet",
		false,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&prompter,
	)
	.await
	.unwrap();

	assert_eq!(
		outcome,
		DeployOutcome::Submitted {
			hash: "0xabc".into(),
			id: None
		}
	);
	assert!(!prompter.asked_nonce.load(Ordering::SeqCst));

	// The choice was persisted for the next deploy.
	let config = project.config_json();
	assert_eq!(config["networks"]["testnet"]["smartContract"], "Foo");

	// The submitted fee payer section is exactly what the signer produced.
	let sends = send_requests(&server).await;
	assert_eq!(sends.len(), 1);
	let fee_payer = &sends[0]["variables"]["input"]["feePayer"];
	assert_eq!(fee_payer["nonce"], "3");
	assert_eq!(fee_payer["fee"], "0.05000000000");
	assert_eq!(fee_payer["memo"], "");
}

#[tokio::test]
async fn second_deploy_never_reprompts() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo", "Bar"]);

	mock_nonce(&server, json!({"nonce": "3"})).await;
	mock_send(
		&server,
		ResponseTemplate::new(200)
			.set_body_json(json!({"data": {"sendZkapp": {"zkapp": {"hash": "0xabc"}}}})),
	)
	.await;

	// First deploy: two contracts, so one selection happens.
	let first = StubPrompter::new(SelectAction::Pick(1), None, Some(Confirmation::Confirmed));
	run(
		"testnet",
		false,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&first,
	)
	.await
	.unwrap();
	assert_eq!(project.config_json()["networks"]["testnet"]["smartContract"], "Bar");

	// Second deploy: still ambiguous on disk, but the recorded choice wins
	// and a prompter that forbids selection proves it.
	let second = StubPrompter::new(SelectAction::Deny, None, Some(Confirmation::Confirmed));
	let outcome = run(
		"testnet",
		false,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&second,
	)
	.await
	.unwrap();
	assert!(matches!(outcome, DeployOutcome::Submitted { .. }));
}

#[tokio::test]
async fn cancelled_selection_aborts_with_no_config_mutation() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo", "Bar"]);

	let err = run(
		"testnet",
		true,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&StubPrompter::new(SelectAction::Cancel, None, None),
	)
	.await
	.unwrap_err();

	assert!(matches!(err, DeployError::SelectionCancelled));
	assert!(project.config_json()["networks"]["testnet"]
		.get("smartContract")
		.is_none());
	assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_build_output_is_fatal() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &[]);

	let err = run(
		"testnet",
		true,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&StubPrompter::new(SelectAction::Deny, None, None),
	)
	.await
	.unwrap_err();

	assert!(matches!(err, DeployError::NoContractsFound));
}

#[tokio::test]
async fn unknown_account_falls_back_to_nonce_prompt() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo"]);

	// The endpoint answers but has never seen the account.
	mock_nonce(&server, Value::Null).await;
	mock_send(
		&server,
		ResponseTemplate::new(200)
			.set_body_json(json!({"data": {"sendZkapp": {"zkapp": {"hash": "0xdef"}}}})),
	)
	.await;

	let prompter = StubPrompter::new(SelectAction::Deny, Some(7), Some(Confirmation::Confirmed));
	run(
		"testnet",
		false,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&prompter,
	)
	.await
	.unwrap();

	assert!(prompter.asked_nonce.load(Ordering::SeqCst));
	let sends = send_requests(&server).await;
	assert_eq!(sends[0]["variables"]["input"]["feePayer"]["nonce"], "7");
}

#[tokio::test]
async fn aborted_confirmation_sends_nothing() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo"]);

	mock_nonce(&server, json!({"nonce": "3"})).await;

	let outcome = run(
		"testnet",
		false,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&StubPrompter::new(SelectAction::Deny, None, Some(Confirmation::Aborted)),
	)
	.await
	.unwrap();

	assert_eq!(outcome, DeployOutcome::Aborted);
	assert!(send_requests(&server).await.is_empty());
}

#[tokio::test]
async fn http_failure_is_classified_with_server_errors() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo"]);

	mock_nonce(&server, json!({"nonce": "3"})).await;
	mock_send(
		&server,
		ResponseTemplate::new(500)
			.set_body_json(json!({"errors": [{"message": "internal error"}]})),
	)
	.await;

	let err = run(
		"testnet",
		true,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&StubPrompter::new(SelectAction::Deny, None, None),
	)
	.await
	.unwrap_err();

	match err {
		DeployError::Submit(SubmitError::Http {
			status, message, ..
		}) => {
			assert_eq!(status, 500);
			assert_eq!(message, "internal error");
		}
		other => panic!("expected http classification, got {other:?}"),
	}
}

#[tokio::test]
async fn payload_level_failure_is_rejected_not_retried() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo"]);

	mock_nonce(&server, json!({"nonce": "3"})).await;
	mock_send(
		&server,
		ResponseTemplate::new(200).set_body_json(
			json!({"data": {"sendZkapp": {"zkapp": {"kind": "error", "message": "Invalid_proof"}}}}),
		),
	)
	.await;

	let err = run(
		"testnet",
		true,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&StubPrompter::new(SelectAction::Deny, None, None),
	)
	.await
	.unwrap_err();

	assert!(matches!(
		err,
		DeployError::Submit(SubmitError::Rejected(_))
	));
	// Exactly one attempt.
	assert_eq!(send_requests(&server).await.len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
	// Nothing listens here; the nonce probe degrades to the prompt and the
	// submission fails with a transport classification.
	let project = Project::new("http://127.0.0.1:1/graphql", &["Foo"]);

	let prompter = StubPrompter::new(SelectAction::Deny, Some(0), None);
	let err = run(
		"testnet",
		true,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&prompter,
	)
	.await
	.unwrap_err();

	assert!(prompter.asked_nonce.load(Ordering::SeqCst));
	assert!(matches!(
		err,
		DeployError::Submit(SubmitError::Transport(_))
	));
}

/// Sits through the full 20-second request bound, so it only runs with
/// `-- --ignored`.
#[tokio::test]
#[ignore]
async fn submission_past_the_timeout_is_a_transport_error() {
	let server = MockServer::start().await;
	let project = Project::new(&format!("{}/graphql", server.uri()), &["Foo"]);

	mock_nonce(&server, json!({"nonce": "3"})).await;
	mock_send(
		&server,
		ResponseTemplate::new(200)
			.set_body_json(json!({"data": {"sendZkapp": {"zkapp": {"hash": "0xabc"}}}}))
			.set_delay(std::time::Duration::from_secs(25)),
	)
	.await;

	let err = run(
		"testnet",
		true,
		&project.config_path(),
		&project.build_glob(),
		&StubBuilder,
		&StubPrompter::new(SelectAction::Deny, None, None),
	)
	.await
	.unwrap_err();

	assert!(matches!(
		err,
		DeployError::Submit(SubmitError::Transport(_))
	));
}
