use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode, header::ACCESS_CONTROL_ALLOW_ORIGIN},
	response::Response,
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use recall_api::{routes, state::AppState};
use recall_config::Config;
use recall_testkit::{RunningStub, StubReply, StubVault};

fn app(config: Config) -> Router {
	let state = AppState::new(config).expect("Failed to initialize app state.");

	routes::router(state)
}

fn app_for(stub: &RunningStub) -> Router {
	app(Config { vault: recall_testkit::vault_config(stub.base_url(), None), ..Config::default() })
}

fn post_webhook(uri: &str, body: impl Into<Body>) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(body.into())
		.expect("Failed to build request.")
}

async fn json_body(response: Response) -> Value {
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&body).expect("Failed to parse response.")
}

#[tokio::test]
async fn health_ok() {
	let response = app(Config::default())
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Bad request."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["status"], "healthy");
	assert_eq!(json["service"], "recall");
}

#[tokio::test]
async fn info_lists_trigger_phrases() {
	let response = app(Config::default())
		.oneshot(Request::builder().uri("/").body(Body::empty()).expect("Bad request."))
		.await
		.expect("Failed to call /.");
	let json = json_body(response).await;

	assert_eq!(json["trigger_phrases"][0], "Hey Omi, find my notes about [topic]");
	assert!(json["endpoints"]["/webhook"].is_string());
}

#[tokio::test]
async fn webhook_returns_search_notification() {
	let stub = StubVault::new()
		.with_search(StubReply::Json(json!([
			{ "filename": "Work/Roadmap.md", "content": "# Roadmap\nQ3 plan" }
		])))
		.start()
		.await
		.expect("Failed to start stub vault.");
	let payload = json!({ "text": "Hey Omi, find my notes about project roadmap" });
	let response = app_for(&stub)
		.oneshot(post_webhook("/webhook", payload.to_string()))
		.await
		.expect("Failed to call /webhook.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).map(|value| value.as_bytes()),
		Some(&b"*"[..])
	);

	let json = json_body(response).await;

	assert_eq!(json["status"], "success");
	assert_eq!(json["notification_type"], "success");

	let message = json["notification"].as_str().expect("Missing notification.");

	assert!(message.starts_with("Found 1 note about \"project roadmap\":"), "{message}");
	assert!(message.contains("**Roadmap**"));
}

#[tokio::test]
async fn api_prefixed_webhook_path_is_served() {
	let payload = json!({ "text": "hey omi, recall taxes" });
	let response = app(Config::default())
		.oneshot(post_webhook("/api/webhook", payload.to_string()))
		.await
		.expect("Failed to call /api/webhook.");
	let json = json_body(response).await;

	assert_eq!(json["status"], "success");
	assert_eq!(json["notification_type"], "error");
	assert!(json["notification"].as_str().unwrap_or_default().contains("not configured"));
}

#[tokio::test]
async fn non_trigger_transcript_is_ignored() {
	for payload in [
		json!({ "text": "hey omi tell me a joke" }),
		json!({ "text": "" }),
		json!({ "session_id": "abc" }),
		json!({ "text": null }),
	] {
		let response = app(Config::default())
			.oneshot(post_webhook("/webhook?uid=user-1", payload.to_string()))
			.await
			.expect("Failed to call /webhook.");

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(json_body(response).await, json!({ "status": "ignored" }));
	}
}

#[tokio::test]
async fn malformed_payload_is_a_server_error() {
	for body in ["{not json", "[1, 2]", r#"{ "text": 42 }"#] {
		let response = app(Config::default())
			.oneshot(post_webhook("/webhook", body))
			.await
			.expect("Failed to call /webhook.");

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "body: {body}");
		assert!(json_body(response).await["error"].is_string());
	}
}

#[tokio::test]
async fn preflight_returns_cors_headers() {
	let response = app(Config::default())
		.oneshot(
			Request::builder()
				.method("OPTIONS")
				.uri("/webhook")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call OPTIONS /webhook.");

	assert_eq!(response.status(), StatusCode::OK);

	let headers = response.headers();

	assert_eq!(headers["access-control-allow-origin"], "*");
	assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
	assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn other_methods_are_rejected() {
	let response = app(Config::default())
		.oneshot(
			Request::builder()
				.method("GET")
				.uri("/webhook")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call GET /webhook.");

	assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(json_body(response).await, json!({ "error": "Method not allowed" }));
}
