mod error;

pub use error::{Error, Result};

use std::{
	collections::HashMap,
	future::IntoFuture,
	sync::{Arc, Mutex},
	time::Duration,
};

use axum::{
	Json, Router,
	body::Bytes,
	extract::{Path, State},
	http::{HeaderMap, Method, StatusCode, header::AUTHORIZATION},
	response::{IntoResponse, Response},
	routing,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use rustls::{
	ServerConfig,
	crypto::ring,
	pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer},
};
use serde_json::Value;
use tokio::{
	net::TcpListener,
	sync::{oneshot, oneshot::Sender},
};

/// A canned answer for one stub route.
#[derive(Debug, Clone)]
pub enum StubReply {
	Json(Value),
	Text(String),
	Status(u16),
	Delayed(Duration, Box<StubReply>),
}
impl StubReply {
	pub fn delayed(delay: Duration, reply: StubReply) -> Self {
		Self::Delayed(delay, Box::new(reply))
	}

	async fn render(self) -> Response {
		let mut reply = self;

		loop {
			match reply {
				Self::Delayed(delay, inner) => {
					tokio::time::sleep(delay).await;

					reply = *inner;
				},
				Self::Json(value) => return (StatusCode::OK, Json(value)).into_response(),
				Self::Text(text) => return (StatusCode::OK, text).into_response(),
				Self::Status(code) =>
					return StatusCode::from_u16(code)
						.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
						.into_response(),
			}
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
	pub method: Method,
	pub path: String,
	pub authorization: Option<String>,
	pub body: Option<Value>,
}

/// A stand-in for the vault's REST API. Routes without a configured reply answer 404, which is
/// what a vault without the search plugin does.
#[derive(Debug, Clone, Default)]
pub struct StubVault {
	search: Option<StubReply>,
	listing: Option<StubReply>,
	files: HashMap<String, StubReply>,
}
impl StubVault {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_search(mut self, reply: StubReply) -> Self {
		self.search = Some(reply);

		self
	}

	pub fn with_listing(mut self, reply: StubReply) -> Self {
		self.listing = Some(reply);

		self
	}

	/// Serves `paths` as the `{ "files": [...] }` listing.
	pub fn with_files(self, paths: &[&str]) -> Self {
		self.with_listing(StubReply::Json(serde_json::json!({ "files": paths })))
	}

	pub fn with_file(mut self, path: &str, reply: StubReply) -> Self {
		self.files.insert(path.to_string(), reply);

		self
	}

	pub fn with_note(self, path: &str, content: &str) -> Self {
		self.with_file(path, StubReply::Text(content.to_string()))
	}

	pub async fn start(self) -> Result<RunningStub> {
		let recorded = Arc::new(Mutex::new(Vec::new()));
		let app = self.router(recorded.clone());
		let listener = TcpListener::bind("127.0.0.1:0").await.map_err(Error::Bind)?;
		let addr = listener.local_addr()?;
		let (tx, rx) = oneshot::channel();
		let server = axum::serve(listener, app).with_graceful_shutdown(async move {
			let _ = rx.await;
		});

		tokio::spawn(async move {
			let _ = server.into_future().await;
		});

		Ok(RunningStub { base_url: format!("http://{addr}"), recorded, shutdown: Some(tx) })
	}

	/// Serves over HTTPS with a freshly generated self-signed certificate for `127.0.0.1`,
	/// the way a local vault plugin does.
	pub async fn start_tls(self) -> Result<RunningStub> {
		let recorded = Arc::new(Mutex::new(Vec::new()));
		let app = self.router(recorded.clone());
		let tls = RustlsConfig::from_config(Arc::new(self_signed_server_config()?));
		let listener = std::net::TcpListener::bind("127.0.0.1:0").map_err(Error::Bind)?;

		listener.set_nonblocking(true)?;

		let addr = listener.local_addr()?;
		let handle = Handle::new();
		let server = axum_server::from_tcp_rustls(listener, tls).handle(handle.clone());
		let (tx, rx) = oneshot::channel::<()>();

		tokio::spawn(async move {
			let _ = rx.await;

			handle.shutdown();
		});
		tokio::spawn(async move {
			let _ = server.serve(app.into_make_service()).await;
		});

		Ok(RunningStub { base_url: format!("https://{addr}"), recorded, shutdown: Some(tx) })
	}

	fn router(self, recorded: Arc<Mutex<Vec<RecordedRequest>>>) -> Router {
		let state = StubState { vault: Arc::new(self), recorded };

		Router::new()
			.route("/search/simple/", routing::post(search_handler))
			.route("/vault/", routing::get(listing_handler))
			.route("/vault/{*path}", routing::get(file_handler))
			.with_state(state)
	}
}

/// A started stub. The server shuts down when this is dropped.
pub struct RunningStub {
	base_url: String,
	recorded: Arc<Mutex<Vec<RecordedRequest>>>,
	shutdown: Option<Sender<()>>,
}
impl RunningStub {
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.recorded.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn request_count(&self, path: &str) -> usize {
		self.requests().iter().filter(|request| request.path == path).count()
	}
}
impl Drop for RunningStub {
	fn drop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

/// Vault config pointing at `base_url` with a short timeout suited to tests.
pub fn vault_config(base_url: &str, api_key: Option<&str>) -> recall_config::Vault {
	recall_config::Vault {
		base_url: Some(base_url.to_string()),
		api_key: api_key.map(str::to_string),
		timeout_ms: 500,
		accept_invalid_certs: true,
	}
}

fn self_signed_server_config() -> Result<ServerConfig> {
	let certified = rcgen::generate_simple_self_signed(vec![
		"127.0.0.1".to_string(),
		"localhost".to_string(),
	])?;
	let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));
	let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
		.with_safe_default_protocol_versions()?
		.with_no_client_auth()
		.with_single_cert(vec![certified.cert.der().clone()], key)?;

	Ok(config)
}

#[derive(Clone)]
struct StubState {
	vault: Arc<StubVault>,
	recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}
impl StubState {
	fn record(&self, method: Method, path: String, headers: &HeaderMap, body: Option<Value>) {
		let authorization =
			headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(str::to_string);
		let request = RecordedRequest { method, path, authorization, body };

		self.recorded.lock().unwrap_or_else(|err| err.into_inner()).push(request);
	}
}

async fn search_handler(
	State(state): State<StubState>,
	headers: HeaderMap,
	body: Bytes,
) -> Response {
	let body = serde_json::from_slice(&body).ok();

	state.record(Method::POST, "/search/simple/".to_string(), &headers, body);

	reply_or_not_found(state.vault.search.clone()).await
}

async fn listing_handler(State(state): State<StubState>, headers: HeaderMap) -> Response {
	state.record(Method::GET, "/vault/".to_string(), &headers, None);

	reply_or_not_found(state.vault.listing.clone()).await
}

async fn file_handler(
	State(state): State<StubState>,
	Path(path): Path<String>,
	headers: HeaderMap,
) -> Response {
	let reply = state.vault.files.get(&path).cloned();

	state.record(Method::GET, format!("/vault/{path}"), &headers, None);

	reply_or_not_found(reply).await
}

async fn reply_or_not_found(reply: Option<StubReply>) -> Response {
	match reply {
		Some(reply) => reply.render().await,
		None => StatusCode::NOT_FOUND.into_response(),
	}
}
