mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DEFAULT_HTTP_BIND, DEFAULT_LOG_LEVEL, DEFAULT_VAULT_TIMEOUT_MS, DEFAULT_WAKE_WORD,
	Service, Trigger, Vault,
};

use std::{env, fs, path::Path};

pub const ENV_VAULT_BASE_URL: &str = "OBSIDIAN_BASE_URL";
pub const ENV_VAULT_API_KEY: &str = "OBSIDIAN_API_KEY";
pub const ENV_HTTP_BIND: &str = "RECALL_HTTP_BIND";
pub const ENV_LOG_LEVEL: &str = "RECALL_LOG_LEVEL";

/// Loads the config file when given, overlays the process environment, then normalizes and
/// validates the result.
pub fn load(path: Option<&Path>) -> Result<Config> {
	load_with_env(path, |key| env::var(key).ok())
}

pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let mut cfg = match path {
		Some(path) => {
			let raw = fs::read_to_string(path)
				.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

			toml::from_str(&raw)
				.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?
		},
		None => Config::default(),
	};

	apply_env(&mut cfg, lookup);
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_env<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(value) = lookup(ENV_VAULT_BASE_URL) {
		cfg.vault.base_url = Some(value);
	}
	if let Some(value) = lookup(ENV_VAULT_API_KEY) {
		cfg.vault.api_key = Some(value);
	}
	if let Some(value) = lookup(ENV_HTTP_BIND) {
		cfg.service.http_bind = value;
	}
	if let Some(value) = lookup(ENV_LOG_LEVEL) {
		cfg.service.log_level = value;
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.vault.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "vault.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if let Some(url) = cfg.vault.base_url.as_deref()
		&& !(url.starts_with("http://") || url.starts_with("https://"))
	{
		return Err(Error::Validation {
			message: "vault.base_url must start with http:// or https://.".to_string(),
		});
	}
	if !cfg.trigger.wake_word.chars().any(char::is_alphanumeric) {
		return Err(Error::Validation {
			message: "trigger.wake_word must contain at least one letter or digit.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.vault.base_url = cfg
		.vault
		.base_url
		.take()
		.map(|url| url.trim().trim_end_matches('/').to_string())
		.filter(|url| !url.is_empty());
	cfg.vault.api_key =
		cfg.vault.api_key.take().map(|key| key.trim().to_string()).filter(|key| !key.is_empty());
	cfg.trigger.wake_word = cfg.trigger.wake_word.trim().to_lowercase();
}
