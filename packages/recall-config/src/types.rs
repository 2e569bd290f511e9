use serde::Deserialize;

pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_VAULT_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_WAKE_WORD: &str = "omi";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub vault: Vault,
	pub trigger: Trigger,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { http_bind: DEFAULT_HTTP_BIND.to_string(), log_level: DEFAULT_LOG_LEVEL.to_string() }
	}
}

/// Connection settings for the note vault's local REST API.
///
/// A missing `base_url` is a supported state: searches report that the vault is not configured
/// instead of failing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Vault {
	pub base_url: Option<String>,
	/// Sent as a bearer token when present.
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	/// The vault plugin serves a self-signed certificate on localhost. Turn this off when the
	/// vault sits behind a certificate the system trusts.
	pub accept_invalid_certs: bool,
}
impl Vault {
	/// Returns the base URL when one is set and non-blank.
	pub fn endpoint(&self) -> Option<&str> {
		self.base_url.as_deref().map(str::trim).filter(|url| !url.is_empty())
	}
}
impl Default for Vault {
	fn default() -> Self {
		Self {
			base_url: None,
			api_key: None,
			timeout_ms: DEFAULT_VAULT_TIMEOUT_MS,
			accept_invalid_certs: true,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Trigger {
	pub wake_word: String,
}
impl Default for Trigger {
	fn default() -> Self {
		Self { wake_word: DEFAULT_WAKE_WORD.to_string() }
	}
}
