use crate::position::TextRange;

/// A single content change from the edit stream.
///
/// Replaces `range` (in pre-edit coordinates) with `text`. An empty `text`
/// is a deletion; an empty `range` is an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
	/// The replaced range, expressed against the document before the edit.
	pub range: TextRange,
	/// The text that replaced the range.
	pub text: String,
}

impl TextChange {
	/// Creates a new change.
	pub fn new(range: TextRange, text: impl Into<String>) -> Self {
		Self {
			range,
			text: text.into(),
		}
	}

	/// Number of line breaks introduced by the replacement text.
	#[inline]
	pub fn inserted_newlines(&self) -> usize {
		count_newlines(&self.text)
	}

	/// Net change in the document's line count caused by this change.
	pub fn line_delta(&self) -> isize {
		self.inserted_newlines() as isize - self.range.line_span() as isize
	}
}

/// Counts line breaks in `text`, treating `\r\n` as one break.
///
/// Recognizes the same break characters as ropey's line indexing, so the
/// result agrees with the document's line count after the change lands.
pub fn count_newlines(text: &str) -> usize {
	let mut count = 0;
	let mut chars = text.chars().peekable();
	while let Some(c) = chars.next() {
		match c {
			'\r' => {
				count += 1;
				if chars.peek() == Some(&'\n') {
					chars.next();
				}
			}
			c if is_line_break(c) => count += 1,
			_ => {}
		}
	}
	count
}

/// Returns true for the characters ropey treats as line breaks.
#[inline]
pub(crate) fn is_line_break(c: char) -> bool {
	matches!(c, '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Sorts changes by start position, ascending, after putting each range's
/// endpoints in order.
///
/// The sort is stable so changes sharing a start keep their delivery order.
pub fn sort_changes(changes: &mut [TextChange]) {
	for change in changes.iter_mut() {
		change.range = change.range.normalized();
	}
	changes.sort_by(|a, b| a.range.start.cmp(&b.range.start));
}
