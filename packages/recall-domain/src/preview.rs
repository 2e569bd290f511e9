/// Preview bound for content returned by the vault's search endpoint.
pub const SEARCH_PREVIEW_CHARS: usize = 150;
/// Preview bound for content fetched on the listing fallback path.
pub const FALLBACK_PREVIEW_CHARS: usize = 100;
/// Lines of a fetched note that feed its fallback preview.
pub const FALLBACK_PREVIEW_LINES: usize = 3;
pub const NOTE_EXTENSION: &str = ".md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
	pub text: String,
	pub truncated: bool,
}

/// Strips the leading path and the final extension: `Work/Roadmap.md` becomes `Roadmap`.
pub fn display_name(path: &str) -> String {
	let file = path.rsplit(['/', '\\']).next().unwrap_or(path);

	match file.rfind('.') {
		Some(dot) if dot > 0 => file[..dot].to_string(),
		_ => file.to_string(),
	}
}

/// Whether a listed path is a note whose path contains `query`, ignoring case.
///
/// The extension check is case-sensitive: `Deep Work.MD` is not a note.
pub fn is_note_match(path: &str, query: &str) -> bool {
	path.ends_with(NOTE_EXTENSION) && path.to_lowercase().contains(&query.to_lowercase())
}

/// Builds a preview from search-endpoint content.
pub fn search_preview(content: &str) -> Option<Preview> {
	clean_preview(content, SEARCH_PREVIEW_CHARS)
}

/// Builds a preview from the first lines of a fetched note.
pub fn fallback_preview(content: &str) -> Option<Preview> {
	let head = content.lines().take(FALLBACK_PREVIEW_LINES).collect::<Vec<_>>().join(" ");

	clean_preview(&head, FALLBACK_PREVIEW_CHARS)
}

/// Drops heading and bracket characters, collapses whitespace, and bounds the result to
/// `max_chars` characters. Returns `None` when nothing readable is left.
pub fn clean_preview(content: &str, max_chars: usize) -> Option<Preview> {
	let stripped: String =
		content.chars().filter(|ch| !matches!(ch, '#' | '[' | ']')).collect();
	let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

	if collapsed.is_empty() {
		return None;
	}

	let (text, truncated) = truncate_chars(&collapsed, max_chars);

	Some(Preview { text: text.trim_end().to_string(), truncated })
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
	match text.char_indices().nth(max_chars) {
		Some((byte_index, _)) => (&text[..byte_index], true),
		None => (text, false),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_on_char_boundary() {
		assert_eq!(truncate_chars("héllo", 2), ("hé", true));
		assert_eq!(truncate_chars("hi", 2), ("hi", false));
		assert_eq!(truncate_chars("", 0), ("", false));
	}

	#[test]
	fn keeps_dotfiles_whole() {
		assert_eq!(display_name("notes/.hidden"), ".hidden");
		assert_eq!(display_name("v1.2 plan.md"), "v1.2 plan");
	}
}
