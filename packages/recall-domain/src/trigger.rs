use std::fmt;

use regex::{Regex, RegexBuilder};

/// Verb phrases that follow the wake phrase, in priority order. Each holds exactly one capture
/// group for the query span.
pub const TEMPLATES: [&str; 8] = [
	r"find my notes? about (.+)",
	r"what did i write about (.+)",
	r"search for (.+) in my notes?",
	r"show me my (.+) notes?",
	r"find (.+) in obsidian",
	r"obsidian search (.+)",
	r"look up (.+)",
	r"recall (.+)",
];

/// Example utterances for the info endpoint. `{wake}` is replaced by the wake word.
pub const EXAMPLE_PHRASES: [&str; 4] = [
	"Hey {wake}, find my notes about [topic]",
	"Hey {wake}, what did I write about [subject]",
	"Hey {wake}, search for [keyword] in my notes",
	"Hey {wake}, show me my [tag] notes",
];

/// A case-folded, trimmed search query taken from a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);
impl Query {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for Query {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, Clone)]
pub struct TriggerMatcher {
	wake_word: String,
	templates: Vec<Regex>,
}
impl TriggerMatcher {
	pub fn new(wake_word: &str) -> Result<Self, regex::Error> {
		// Transcripts are matched after normalization, so the wake word must be in the same form.
		let wake_word = normalize_transcript(wake_word);
		let prefix = format!(r"hey {},?\s*", regex::escape(&wake_word));
		let templates = TEMPLATES
			.iter()
			.map(|template| {
				RegexBuilder::new(&format!("{prefix}{template}")).case_insensitive(true).build()
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self { wake_word, templates })
	}

	pub fn wake_word(&self) -> &str {
		&self.wake_word
	}

	/// Returns the capture of the first template that matches, in registration order.
	///
	/// Later templates are never consulted once one matches, even if they would capture a
	/// cleaner query.
	pub fn extract_query(&self, transcript: &str) -> Option<Query> {
		let normalized = normalize_transcript(transcript);

		for template in &self.templates {
			let Some(captures) = template.captures(&normalized) else {
				continue;
			};
			let query = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();

			if query.is_empty() {
				return None;
			}

			return Some(Query(query.to_string()));
		}

		None
	}

	pub fn example_phrases(&self) -> Vec<String> {
		let wake = capitalize(&self.wake_word);

		EXAMPLE_PHRASES.iter().map(|phrase| phrase.replace("{wake}", &wake)).collect()
	}
}

/// Lowercases, trims, and collapses whitespace runs to single spaces.
pub fn normalize_transcript(transcript: &str) -> String {
	transcript.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();

	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
