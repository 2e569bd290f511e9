use std::fmt::Write as _;

use serde::Serialize;

use crate::{preview, trigger::Query};

/// Most matches a notification ever lists.
pub const MAX_MATCHES: usize = 5;
/// Bound on upstream error detail echoed back to the device.
pub const MAX_ERROR_DETAIL_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteMatch {
	pub display_name: String,
	/// `None` when the preview could not be fetched or the note had no readable text.
	pub preview: Option<String>,
	pub truncated: bool,
}
impl NoteMatch {
	pub fn new(path: &str, preview: Option<preview::Preview>) -> Self {
		let display_name = preview::display_name(path);

		match preview {
			Some(preview) => Self {
				display_name,
				preview: Some(preview.text),
				truncated: preview.truncated,
			},
			None => Self { display_name, preview: None, truncated: false },
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
	Matches(Vec<NoteMatch>),
	NoMatches,
	Unconfigured,
	UpstreamError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	Success,
	Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
	Success,
	Info,
	Warning,
	Error,
}

/// The device-facing result of one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
	pub status: Status,
	#[serde(rename = "notification")]
	pub message: String,
	#[serde(rename = "notification_type")]
	pub kind: NotificationKind,
}
impl NotificationPayload {
	fn new(kind: NotificationKind, message: String) -> Self {
		Self { status: Status::Success, message, kind }
	}
}

pub fn format(outcome: &SearchOutcome, query: &Query) -> NotificationPayload {
	match outcome {
		SearchOutcome::Matches(matches) if !matches.is_empty() =>
			NotificationPayload::new(NotificationKind::Success, format_matches(matches, query)),
		SearchOutcome::Matches(_) | SearchOutcome::NoMatches => NotificationPayload::new(
			NotificationKind::Info,
			format!("No notes found about \"{query}\". Try a different search term."),
		),
		SearchOutcome::Unconfigured => NotificationPayload::new(
			NotificationKind::Error,
			"The note vault endpoint is not configured. Set OBSIDIAN_BASE_URL to enable note search."
				.to_string(),
		),
		SearchOutcome::UpstreamError(detail) => {
			let (detail, truncated) =
				preview::truncate_chars(detail.trim(), MAX_ERROR_DETAIL_CHARS);
			let ellipsis = if truncated { "..." } else { "" };

			NotificationPayload::new(
				NotificationKind::Error,
				format!("Sorry, I couldn't search your notes: {detail}{ellipsis}"),
			)
		},
	}
}

fn format_matches(matches: &[NoteMatch], query: &Query) -> String {
	let shown = &matches[..matches.len().min(MAX_MATCHES)];
	let noun = if shown.len() == 1 { "note" } else { "notes" };
	let mut message = format!("Found {} {noun} about \"{query}\":", shown.len());

	for (i, note) in shown.iter().enumerate() {
		let _ = write!(message, "\n{}. **{}**", i + 1, note.display_name);

		if let Some(preview) = &note.preview {
			let ellipsis = if note.truncated { "..." } else { "" };
			let _ = write!(message, "\n   Preview: {preview}{ellipsis}");
		}
	}

	message.trim().to_string()
}
