use reqwest::Response;

use crate::{Error, Result, VaultBody};

/// Calls the vault's simple full-text search.
pub async fn search(
	cfg: &recall_config::Vault,
	query: &str,
	context_length: u32,
) -> Result<VaultBody> {
	let url = crate::endpoint_url(cfg, ["search", "simple", ""])?;
	let body = serde_json::json!({ "query": query, "contextLength": context_length });
	let res = crate::client(cfg)?.post(url).json(&body).send().await?;

	read_body(res).await
}

/// Lists every entry in the vault, in the vault's order.
pub async fn list_files(cfg: &recall_config::Vault) -> Result<VaultBody> {
	let url = crate::endpoint_url(cfg, ["vault", ""])?;
	let res = crate::client(cfg)?.get(url).send().await?;

	read_body(res).await
}

/// Fetches the raw text of one vault entry.
pub async fn fetch_content(cfg: &recall_config::Vault, path: &str) -> Result<String> {
	let segments = std::iter::once("vault").chain(path.trim_start_matches('/').split('/'));
	let url = crate::endpoint_url(cfg, segments)?;
	let res = crate::client(cfg)?.get(url).send().await?;

	read_text(res).await
}

async fn read_body(res: Response) -> Result<VaultBody> {
	Ok(VaultBody::from_text(read_text(res).await?))
}

async fn read_text(res: Response) -> Result<String> {
	let status = res.status();

	if !status.is_success() {
		tracing::debug!(%status, url = %res.url(), "Vault returned a non-success status.");

		return Err(Error::UpstreamStatus { code: status.as_u16() });
	}

	Ok(res.text().await?)
}
