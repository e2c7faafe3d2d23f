//! Rope-backed documents.
//!
//! [`DocumentSource`] is the read-only, line-indexed view the token cache
//! consumes. [`Document`] is the concrete rope-backed implementation that
//! also applies edit batches.

use std::borrow::Cow;

use ropey::Rope;

use crate::change::TextChange;
use crate::ids::DocumentId;
use crate::position::Position;
use crate::rope::{line_len_without_ending, line_text_without_ending};

/// Read-only line access to a document's live text.
pub trait DocumentSource {
	/// Language identifier used to resolve the document's grammar.
	fn language_id(&self) -> &str;

	/// Number of lines, including the empty line after a trailing newline.
	fn line_count(&self) -> usize;

	/// Content of line `line` without its line ending.
	fn line_text(&self, line: usize) -> Cow<'_, str>;

	/// Character length of line `line` without its line ending.
	fn line_length(&self, line: usize) -> usize {
		self.line_text(line).chars().count()
	}
}

/// An open text document.
#[derive(Debug, Clone)]
pub struct Document {
	id: DocumentId,
	language_id: String,
	text: Rope,
	version: u64,
}

impl Document {
	/// Creates a document at version 1.
	pub fn new(id: DocumentId, language_id: impl Into<String>, text: &str) -> Self {
		Self {
			id,
			language_id: language_id.into(),
			text: Rope::from_str(text),
			version: 1,
		}
	}

	pub fn id(&self) -> DocumentId {
		self.id
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	pub fn text(&self) -> &Rope {
		&self.text
	}

	/// Changes the language identifier (e.g. after a "change language mode").
	pub fn set_language_id(&mut self, language_id: impl Into<String>) {
		self.language_id = language_id.into();
	}

	/// Converts a position to a char index, clamping to the line and document.
	pub fn char_index(&self, pos: Position) -> usize {
		let slice = self.text.slice(..);
		if pos.line >= slice.len_lines() {
			return slice.len_chars();
		}
		let line_start = slice.line_to_char(pos.line);
		line_start + pos.character.min(line_len_without_ending(slice, pos.line))
	}

	/// Applies an edit batch and bumps the version.
	///
	/// Change ranges are expressed against the pre-edit text and must not
	/// overlap; they are applied back to front so earlier ranges stay valid.
	pub fn apply_changes(&mut self, changes: &[TextChange]) {
		let mut resolved: Vec<(usize, usize, &str)> = changes
			.iter()
			.map(|c| {
				let range = c.range.normalized();
				let start = self.char_index(range.start);
				let end = self.char_index(range.end).max(start);
				(start, end, c.text.as_str())
			})
			.collect();
		resolved.sort_by(|a, b| b.0.cmp(&a.0));

		for (start, end, text) in resolved {
			if end > start {
				self.text.remove(start..end);
			}
			if !text.is_empty() {
				self.text.insert(start, text);
			}
		}
		self.version += 1;
	}

	/// Replaces the whole text without reporting a change set.
	///
	/// Consumers holding caches detect this through staleness checks.
	pub fn replace_untracked(&mut self, text: &str) {
		self.text = Rope::from_str(text);
		self.version += 1;
	}
}

impl DocumentSource for Document {
	fn language_id(&self) -> &str {
		&self.language_id
	}

	fn line_count(&self) -> usize {
		self.text.len_lines()
	}

	fn line_text(&self, line: usize) -> Cow<'_, str> {
		line_text_without_ending(self.text.slice(..), line)
	}

	fn line_length(&self, line: usize) -> usize {
		line_len_without_ending(self.text.slice(..), line)
	}
}
