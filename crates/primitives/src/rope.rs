//! Rope utilities and extensions.

use std::borrow::Cow;

use ropey::RopeSlice;

use crate::change::is_line_break;

/// Returns the number of lines, including the empty line after a trailing newline.
#[inline]
pub fn visible_line_count(text: RopeSlice) -> usize {
	text.len_lines()
}

/// Returns the character count of line `line`, excluding its line ending.
///
/// Out-of-range lines have length zero.
pub fn line_len_without_ending(text: RopeSlice, line: usize) -> usize {
	if line >= text.len_lines() {
		return 0;
	}
	let slice = text.line(line);
	slice.len_chars() - ending_len(slice)
}

/// Returns the content of line `line` without its line ending.
///
/// Borrows when the line lives in a single rope chunk.
pub fn line_text_without_ending(text: RopeSlice<'_>, line: usize) -> Cow<'_, str> {
	if line >= text.len_lines() {
		return Cow::Borrowed("");
	}
	let slice = text.line(line);
	let content = slice.slice(..slice.len_chars() - ending_len(slice));
	match content.as_str() {
		Some(s) => Cow::Borrowed(s),
		None => Cow::Owned(content.to_string()),
	}
}

/// Length in chars of the line ending terminating `line` (0, 1, or 2).
fn ending_len(line: RopeSlice) -> usize {
	let len = line.len_chars();
	if len == 0 {
		return 0;
	}
	let last = line.char(len - 1);
	if !is_line_break(last) {
		return 0;
	}
	if last == '\n' && len >= 2 && line.char(len - 2) == '\r' {
		2
	} else {
		1
	}
}
