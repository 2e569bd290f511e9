pub mod vault;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client, Url,
	header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;

/// A vault response body. Bodies that should be JSON but fail to parse are kept as raw text so
/// callers can decide what to do with them.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultBody {
	Json(Value),
	Text(String),
}
impl VaultBody {
	pub fn from_text(raw: String) -> Self {
		match serde_json::from_str(&raw) {
			Ok(value) => Self::Json(value),
			Err(_) => Self::Text(raw),
		}
	}

	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			Self::Text(_) => None,
		}
	}
}

/// Bearer authorization when a key is configured, nothing otherwise.
pub fn auth_headers(api_key: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(key) = api_key {
		headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
	}

	Ok(headers)
}

pub fn client(cfg: &recall_config::Vault) -> Result<Client> {
	Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.danger_accept_invalid_certs(cfg.accept_invalid_certs)
		.default_headers(auth_headers(cfg.api_key.as_deref())?)
		.build()
		.map_err(Error::Client)
}

/// Joins `segments` onto the vault base URL, percent-encoding each one.
///
/// A trailing empty segment produces a trailing slash, which the listing and search routes
/// require.
pub fn endpoint_url<'a, I>(cfg: &recall_config::Vault, segments: I) -> Result<Url>
where
	I: IntoIterator<Item = &'a str>,
{
	let base = cfg.endpoint().ok_or(Error::Unconfigured)?;
	let mut url =
		Url::parse(base).map_err(|err| Error::InvalidUrl { message: err.to_string() })?;

	url.path_segments_mut()
		.map_err(|_| Error::InvalidUrl { message: format!("{base} cannot be a base URL.") })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}
