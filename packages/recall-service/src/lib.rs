pub mod search;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use recall_config::{Config, Vault};
use recall_domain::{NotificationPayload, TriggerMatcher, notify};
use recall_providers::{VaultBody, vault};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The vault REST surface the search pipeline depends on.
pub trait VaultProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a Vault,
		query: &'a str,
		context_length: u32,
	) -> BoxFuture<'a, recall_providers::Result<VaultBody>>;

	fn list_files<'a>(
		&'a self,
		cfg: &'a Vault,
	) -> BoxFuture<'a, recall_providers::Result<VaultBody>>;

	fn fetch_content<'a>(
		&'a self,
		cfg: &'a Vault,
		path: &'a str,
	) -> BoxFuture<'a, recall_providers::Result<String>>;
}

pub struct RecallService {
	pub cfg: Config,
	pub matcher: TriggerMatcher,
	pub vault: Arc<dyn VaultProvider>,
}
impl RecallService {
	pub fn new(cfg: Config) -> Result<Self> {
		Self::with_vault(cfg, Arc::new(HttpVault))
	}

	pub fn with_vault(cfg: Config, vault: Arc<dyn VaultProvider>) -> Result<Self> {
		let matcher = TriggerMatcher::new(&cfg.trigger.wake_word)?;

		Ok(Self { cfg, matcher, vault })
	}

	/// Runs one transcript through the pipeline. `None` means the transcript is not a search
	/// request and should be ignored.
	pub async fn handle(&self, transcript: &str) -> Option<NotificationPayload> {
		let Some(query) = self.matcher.extract_query(transcript) else {
			tracing::debug!("Transcript matched no trigger.");

			return None;
		};

		tracing::debug!(query = %query, "Transcript matched a trigger.");

		let outcome = self.resolve(&query, Some(&self.cfg.vault)).await;
		let payload = notify::format(&outcome, &query);

		tracing::info!(kind = ?payload.kind, "Search finished.");

		Some(payload)
	}
}

struct HttpVault;

impl VaultProvider for HttpVault {
	fn search<'a>(
		&'a self,
		cfg: &'a Vault,
		query: &'a str,
		context_length: u32,
	) -> BoxFuture<'a, recall_providers::Result<VaultBody>> {
		Box::pin(vault::search(cfg, query, context_length))
	}

	fn list_files<'a>(
		&'a self,
		cfg: &'a Vault,
	) -> BoxFuture<'a, recall_providers::Result<VaultBody>> {
		Box::pin(vault::list_files(cfg))
	}

	fn fetch_content<'a>(
		&'a self,
		cfg: &'a Vault,
		path: &'a str,
	) -> BoxFuture<'a, recall_providers::Result<String>> {
		Box::pin(vault::fetch_content(cfg, path))
	}
}
