use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::json;

use recall_providers::{Error, VaultBody, vault};
use recall_testkit::{StubReply, StubVault};

#[test]
fn builds_bearer_auth_header() {
	let headers =
		recall_providers::auth_headers(Some("secret")).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn omits_auth_header_without_key() {
	let headers = recall_providers::auth_headers(None).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn encodes_note_paths() {
	let cfg = recall_testkit::vault_config("https://127.0.0.1:27124/", None);
	let url = recall_providers::endpoint_url(&cfg, ["vault", "Notes", "deep work.md"])
		.expect("Failed to build URL.");

	assert_eq!(url.as_str(), "https://127.0.0.1:27124/vault/Notes/deep%20work.md");
}

#[test]
fn keeps_base_path_prefix() {
	let cfg = recall_testkit::vault_config("http://localhost/obsidian", None);
	let url =
		recall_providers::endpoint_url(&cfg, ["vault", ""]).expect("Failed to build URL.");

	assert_eq!(url.as_str(), "http://localhost/obsidian/vault/");
}

#[test]
fn unconfigured_endpoint_is_an_error() {
	let mut cfg = recall_testkit::vault_config("http://localhost", None);

	cfg.base_url = None;

	let err = recall_providers::endpoint_url(&cfg, ["vault", ""]).expect_err("Expected error.");

	assert!(matches!(err, Error::Unconfigured));
}

#[test]
fn keeps_unparsable_bodies_as_text() {
	assert_eq!(
		VaultBody::from_text("<html>nope</html>".to_string()),
		VaultBody::Text("<html>nope</html>".to_string())
	);
	assert_eq!(VaultBody::from_text("[]".to_string()), VaultBody::Json(json!([])));
}

#[tokio::test]
async fn search_posts_query_and_bearer_token() {
	let stub = StubVault::new()
		.with_search(StubReply::Json(json!([{ "filename": "a.md", "content": "x" }])))
		.start()
		.await
		.expect("Failed to start stub vault.");
	let cfg = recall_testkit::vault_config(stub.base_url(), Some("secret"));
	let body = vault::search(&cfg, "deep work", 100).await.expect("Search failed.");

	assert_eq!(body, VaultBody::Json(json!([{ "filename": "a.md", "content": "x" }])));

	let requests = stub.requests();

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].path, "/search/simple/");
	assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));
	assert_eq!(requests[0].body, Some(json!({ "query": "deep work", "contextLength": 100 })));
}

#[tokio::test]
async fn requests_without_key_send_no_authorization() {
	let stub = StubVault::new()
		.with_files(&["a.md"])
		.start()
		.await
		.expect("Failed to start stub vault.");
	let cfg = recall_testkit::vault_config(stub.base_url(), None);

	vault::list_files(&cfg).await.expect("Listing failed.");

	assert_eq!(stub.requests()[0].authorization, None);
}

#[tokio::test]
async fn garbled_search_body_is_returned_raw() {
	let stub = StubVault::new()
		.with_search(StubReply::Text("not json".to_string()))
		.start()
		.await
		.expect("Failed to start stub vault.");
	let cfg = recall_testkit::vault_config(stub.base_url(), None);
	let body = vault::search(&cfg, "q", 100).await.expect("Search failed.");

	assert_eq!(body, VaultBody::Text("not json".to_string()));
}

#[tokio::test]
async fn non_success_status_is_reported() {
	let stub = StubVault::new().start().await.expect("Failed to start stub vault.");
	let cfg = recall_testkit::vault_config(stub.base_url(), None);
	let err = vault::search(&cfg, "q", 100).await.expect_err("Expected status error.");

	assert!(matches!(err, Error::UpstreamStatus { code: 404 }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn slow_vault_times_out() {
	let stub = StubVault::new()
		.with_listing(StubReply::delayed(
			Duration::from_secs(5),
			StubReply::Json(json!({ "files": [] })),
		))
		.start()
		.await
		.expect("Failed to start stub vault.");
	let mut cfg = recall_testkit::vault_config(stub.base_url(), None);

	cfg.timeout_ms = 100;

	let err = vault::list_files(&cfg).await.expect_err("Expected timeout.");

	assert!(matches!(err, Error::Timeout), "unexpected error: {err:?}");
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
	let cfg = recall_testkit::vault_config("http://127.0.0.1:1", None);
	let err = vault::list_files(&cfg).await.expect_err("Expected connection error.");

	assert!(matches!(err, Error::Unreachable { .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn fetches_note_content_by_encoded_path() {
	let stub = StubVault::new()
		.with_note("Notes/deep work.md", "# Deep Work\nFocus.")
		.start()
		.await
		.expect("Failed to start stub vault.");
	let cfg = recall_testkit::vault_config(stub.base_url(), None);
	let content =
		vault::fetch_content(&cfg, "Notes/deep work.md").await.expect("Fetch failed.");

	assert_eq!(content, "# Deep Work\nFocus.");
	assert_eq!(stub.request_count("/vault/Notes/deep work.md"), 1);
}

#[tokio::test]
async fn self_signed_vault_is_reached_when_trust_is_relaxed() {
	let stub = StubVault::new()
		.with_files(&["Daily.md"])
		.start_tls()
		.await
		.expect("Failed to start TLS stub vault.");
	let cfg = recall_testkit::vault_config(stub.base_url(), Some("secret"));

	assert!(cfg.accept_invalid_certs);

	let body = vault::list_files(&cfg).await.expect("Listing failed.");

	assert_eq!(body, VaultBody::Json(json!({ "files": ["Daily.md"] })));
	assert_eq!(stub.requests()[0].authorization.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn self_signed_vault_is_rejected_when_certificates_are_checked() {
	let stub = StubVault::new()
		.with_files(&["Daily.md"])
		.start_tls()
		.await
		.expect("Failed to start TLS stub vault.");
	let mut cfg = recall_testkit::vault_config(stub.base_url(), None);

	cfg.accept_invalid_certs = false;

	let err = vault::list_files(&cfg).await.expect_err("Expected certificate error.");

	assert!(matches!(err, Error::Unreachable { .. }), "unexpected error: {err:?}");
	assert_eq!(stub.request_count("/vault/"), 0);
}
