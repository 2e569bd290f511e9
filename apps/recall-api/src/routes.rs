use axum::{
	Json, Router,
	body::Bytes,
	extract::State,
	http::{
		HeaderValue, StatusCode,
		header::{
			ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
			ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW,
		},
	},
	response::{IntoResponse, Response},
	routing::{MethodRouter, get, post},
};
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use recall_domain::Status;

use crate::state::AppState;

const SERVICE_NAME: &str = "recall";
const WEBHOOK_METHODS: &str = "POST, OPTIONS";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(info))
		.route("/health", get(health))
		.route("/webhook", webhook_route())
		.route("/api/webhook", webhook_route())
		.with_state(state)
}

fn webhook_route() -> MethodRouter<AppState> {
	post(webhook).options(preflight).fallback(method_not_allowed)
}

#[derive(Debug, Serialize)]
struct IgnoredBody {
	status: Status,
}

async fn webhook(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
	let request_id = Uuid::new_v4();
	let span = tracing::info_span!("webhook", %request_id);
	let transcript = parse_transcript(&body).inspect_err(|err| {
		tracing::warn!(parent: &span, error = %err.message, "Rejected webhook payload.");
	})?;
	let reply = state.service.handle(&transcript).instrument(span).await;

	Ok(match reply {
		Some(payload) => with_cors(StatusCode::OK, Json(payload)),
		None => with_cors(StatusCode::OK, Json(IgnoredBody { status: Status::Ignored })),
	})
}

async fn preflight() -> Response {
	(
		StatusCode::OK,
		[
			(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
			(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(WEBHOOK_METHODS)),
			(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")),
		],
	)
		.into_response()
}

async fn method_not_allowed() -> Response {
	let mut response = ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
		.into_response();

	response.headers_mut().insert(ALLOW, HeaderValue::from_static(WEBHOOK_METHODS));

	response
}

async fn health() -> Response {
	with_cors(
		StatusCode::OK,
		Json(serde_json::json!({
			"status": "healthy",
			"service": SERVICE_NAME,
			"version": env!("CARGO_PKG_VERSION"),
		})),
	)
}

async fn info(State(state): State<AppState>) -> Response {
	with_cors(
		StatusCode::OK,
		Json(serde_json::json!({
			"name": SERVICE_NAME,
			"description": "Voice-activated note vault search.",
			"version": env!("CARGO_PKG_VERSION"),
			"endpoints": {
				"/webhook": "POST - Voice transcript webhook",
				"/health": "GET - Health check",
				"/": "GET - This info page",
			},
			"trigger_phrases": state.service.matcher.example_phrases(),
		})),
	)
}

/// Extracts the transcript text. A missing or null `text` is treated as an empty transcript,
/// which the service ignores.
fn parse_transcript(body: &[u8]) -> Result<String, ApiError> {
	let payload: Value = serde_json::from_slice(body)
		.map_err(|err| ApiError::internal(format!("Invalid JSON payload: {err}")))?;
	let Some(object) = payload.as_object() else {
		return Err(ApiError::internal("Webhook payload must be a JSON object."));
	};

	match object.get("text") {
		None | Some(Value::Null) => Ok(String::new()),
		Some(Value::String(text)) => Ok(text.clone()),
		Some(_) => Err(ApiError::internal("Webhook payload field text must be a string.")),
	}
}

fn with_cors(status: StatusCode, body: impl IntoResponse) -> Response {
	(status, [(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))], body).into_response()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}

	fn internal(message: impl Into<String>) -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		with_cors(self.status, Json(ErrorBody { error: self.message }))
	}
}
