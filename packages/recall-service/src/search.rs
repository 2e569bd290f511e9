use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinSet;

use recall_config::Vault;
use recall_domain::{
	NoteMatch, Query, SearchOutcome,
	notify::MAX_MATCHES,
	preview::{self, Preview},
};
use recall_providers::VaultBody;

use crate::RecallService;

/// Characters of surrounding context requested per search hit.
pub const SEARCH_CONTEXT_LENGTH: u32 = 100;

const UNREADABLE_LISTING: &str = "The vault returned a file listing that could not be read.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
	pub filename: String,
	pub content: String,
}

impl RecallService {
	/// Resolves `query` against the vault.
	///
	/// The vault's search endpoint is tried first. Any failure there, including a vault that
	/// lacks the endpoint, falls back to listing files and filtering their paths. Only a failure
	/// of the listing itself is reported as an upstream error.
	pub async fn resolve(&self, query: &Query, cfg: Option<&Vault>) -> SearchOutcome {
		let Some(cfg) = cfg.filter(|cfg| cfg.endpoint().is_some()) else {
			return SearchOutcome::Unconfigured;
		};

		match self.vault.search(cfg, query.as_str(), SEARCH_CONTEXT_LENGTH).await {
			Ok(body) => match parse_search_hits(&body) {
				Some(hits) if hits.is_empty() => return SearchOutcome::NoMatches,
				Some(hits) => return SearchOutcome::Matches(hits_to_matches(hits)),
				None => tracing::warn!("Vault search body was unrecognized, using listing."),
			},
			Err(err) => tracing::warn!(error = %err, "Vault search failed, using listing."),
		}

		self.search_by_listing(query, cfg).await
	}

	async fn search_by_listing(&self, query: &Query, cfg: &Vault) -> SearchOutcome {
		let body = match self.vault.list_files(cfg).await {
			Ok(body) => body,
			Err(err) => {
				tracing::warn!(error = %err, "Vault listing failed.");

				return SearchOutcome::UpstreamError(err.to_string());
			},
		};
		let Some(paths) = parse_listing(&body) else {
			tracing::warn!("Vault listing returned an unrecognized body.");

			return SearchOutcome::UpstreamError(UNREADABLE_LISTING.to_string());
		};
		let candidates = paths
			.into_iter()
			.filter(|path| preview::is_note_match(path, query.as_str()))
			.take(MAX_MATCHES)
			.collect::<Vec<_>>();

		if candidates.is_empty() {
			return SearchOutcome::NoMatches;
		}

		let previews = self.fetch_previews(cfg, &candidates).await;
		let matches = candidates
			.iter()
			.zip(previews)
			.map(|(path, preview)| NoteMatch::new(path, preview))
			.collect();

		SearchOutcome::Matches(matches)
	}

	/// Fetches every preview concurrently. The result lines up with `paths` regardless of
	/// completion order; a failed fetch leaves its slot empty.
	async fn fetch_previews(&self, cfg: &Vault, paths: &[String]) -> Vec<Option<Preview>> {
		let cfg = Arc::new(cfg.clone());
		let mut tasks = JoinSet::new();

		for (index, path) in paths.iter().cloned().enumerate() {
			let vault = self.vault.clone();
			let cfg = cfg.clone();

			tasks.spawn(async move {
				let preview = match vault.fetch_content(&cfg, &path).await {
					Ok(content) => preview::fallback_preview(&content),
					Err(err) => {
						tracing::warn!(%path, error = %err, "Preview fetch failed.");

						None
					},
				};

				(index, preview)
			});
		}

		let mut previews = vec![None; paths.len()];

		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok((index, preview)) => previews[index] = preview,
				Err(err) => tracing::warn!(error = %err, "Preview task did not complete."),
			}
		}

		previews
	}
}

/// Reads search hits from either a bare array or a `{ "results": [...] }` object.
///
/// Returns `None` when the body is not a shape this client understands, so the caller can fall
/// back instead of reporting no matches.
pub fn parse_search_hits(body: &VaultBody) -> Option<Vec<SearchHit>> {
	let json = body.as_json()?;
	let items = json.as_array().or_else(|| json.get("results").and_then(Value::as_array))?;
	let hits = items.iter().filter_map(parse_hit).collect::<Vec<_>>();

	if hits.is_empty() && !items.is_empty() {
		return None;
	}

	Some(hits)
}

pub fn parse_listing(body: &VaultBody) -> Option<Vec<String>> {
	let files = body.as_json()?.get("files")?.as_array()?;

	Some(files.iter().filter_map(Value::as_str).map(str::to_string).collect())
}

fn parse_hit(item: &Value) -> Option<SearchHit> {
	let filename = item.get("filename").and_then(Value::as_str)?.to_string();
	let content = match item.get("content").and_then(Value::as_str) {
		Some(content) => content.to_string(),
		// The vault plugin returns match contexts instead of a content field.
		None => item
			.get("matches")
			.and_then(Value::as_array)
			.map(|matches| {
				matches
					.iter()
					.filter_map(|m| m.get("context").and_then(Value::as_str))
					.collect::<Vec<_>>()
					.join(" ")
			})
			.unwrap_or_default(),
	};

	Some(SearchHit { filename, content })
}

fn hits_to_matches(hits: Vec<SearchHit>) -> Vec<NoteMatch> {
	hits.into_iter()
		.take(MAX_MATCHES)
		.map(|hit| NoteMatch::new(&hit.filename, preview::search_preview(&hit.content)))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_results_object_shape() {
		let body = VaultBody::Json(serde_json::json!({
			"results": [{ "filename": "a.md", "content": "alpha" }]
		}));
		let hits = parse_search_hits(&body).expect("Hits must parse.");

		assert_eq!(
			hits,
			vec![SearchHit { filename: "a.md".to_string(), content: "alpha".to_string() }]
		);
	}

	#[test]
	fn joins_match_contexts_when_content_is_missing() {
		let body = VaultBody::Json(serde_json::json!([{
			"filename": "a.md",
			"score": 1.0,
			"matches": [{ "context": "one" }, { "context": "two" }]
		}]));
		let hits = parse_search_hits(&body).expect("Hits must parse.");

		assert_eq!(hits[0].content, "one two");
	}

	#[test]
	fn rejects_unknown_shapes() {
		assert_eq!(parse_search_hits(&VaultBody::Text("oops".to_string())), None);
		assert_eq!(parse_search_hits(&VaultBody::Json(serde_json::json!({ "error": 1 }))), None);
		assert_eq!(parse_search_hits(&VaultBody::Json(serde_json::json!([{ "x": 1 }]))), None);
	}

	#[test]
	fn empty_array_means_no_hits() {
		assert_eq!(parse_search_hits(&VaultBody::Json(serde_json::json!([]))), Some(Vec::new()));
	}

	#[test]
	fn listing_skips_non_string_entries() {
		let body = VaultBody::Json(serde_json::json!({ "files": ["a.md", 3, "dir/"] }));

		assert_eq!(parse_listing(&body), Some(vec!["a.md".to_string(), "dir/".to_string()]));
	}
}
