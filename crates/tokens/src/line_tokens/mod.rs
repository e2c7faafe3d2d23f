//! The token partition of a single line.
//!
//! Tokens are stored as a flat `[end_0, meta_0, end_1, meta_1, ...]` buffer.
//! Token `i` covers `[end_{i-1}, end_i)` (with `end_{-1} = 0`), so the tokens
//! partition the line with no gaps or overlaps. Offsets are char offsets.

use std::ops::Range;

use scopeline_language::LanguageId;
use thiserror::Error;

use crate::classify::StandardTokenType;
use crate::metadata::TokenMetadata;

/// Violations of the token partition invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenArrayError {
	#[error("token buffer has odd length {0}")]
	OddLength(usize),

	#[error("token buffer is empty")]
	Empty,

	#[error("token {index} spans {start}..{end}, which is empty or reversed")]
	NonIncreasing { index: usize, start: u32, end: u32 },

	#[error("last token ends at {end} but the line has {len} chars")]
	EndMismatch { end: u32, len: u32 },

	#[error("line of {0} chars exceeds the token offset range")]
	TextTooLong(usize),
}

/// Immutable tokens of one line together with the line's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokenArray {
	tokens: Box<[u32]>,
	text: String,
	text_len: u32,
	line_metadata: u32,
	/// Bit `t` set when a token of `StandardTokenType` `t` is present.
	type_presence: u8,
}

impl LineTokenArray {
	/// Wraps an end-offset buffer, validating the partition invariant.
	///
	/// A non-empty line needs strictly increasing ends with the last equal to
	/// the line length; an empty line is a single token ending at 0.
	pub fn new(tokens: Vec<u32>, text: impl Into<String>) -> Result<Self, TokenArrayError> {
		let text = text.into();
		let char_len = text.chars().count();
		let text_len = u32::try_from(char_len).map_err(|_| TokenArrayError::TextTooLong(char_len))?;

		if tokens.len() % 2 != 0 {
			return Err(TokenArrayError::OddLength(tokens.len()));
		}
		if tokens.is_empty() {
			return Err(TokenArrayError::Empty);
		}

		let count = tokens.len() / 2;
		let mut start = 0u32;
		let mut line_metadata = 0u32;
		let mut type_presence = 0u8;
		for index in 0..count {
			let end = tokens[index * 2];
			let empty_line = count == 1 && text_len == 0;
			if end <= start && !(empty_line && end == 0) {
				return Err(TokenArrayError::NonIncreasing { index, start, end });
			}
			let metadata = TokenMetadata(tokens[index * 2 + 1]);
			line_metadata |= metadata.bits();
			type_presence |= 1 << metadata.token_type().bits();
			start = end;
		}
		if start != text_len {
			return Err(TokenArrayError::EndMismatch { end: start, len: text_len });
		}

		Ok(Self {
			tokens: tokens.into_boxed_slice(),
			text,
			text_len,
			line_metadata,
			type_presence,
		})
	}

	/// Wraps a start-offset buffer (`[start_0, meta_0, ...]`), converting it
	/// in place with [`to_end_offset_form`].
	pub fn from_start_offsets(mut tokens: Vec<u32>, text: impl Into<String>) -> Result<Self, TokenArrayError> {
		let text = text.into();
		let char_len = text.chars().count();
		let text_len = u32::try_from(char_len).map_err(|_| TokenArrayError::TextTooLong(char_len))?;
		if tokens.len() % 2 != 0 {
			return Err(TokenArrayError::OddLength(tokens.len()));
		}
		to_end_offset_form(&mut tokens, text_len);
		Self::new(tokens, text)
	}

	/// A single token covering the whole line.
	pub fn single(text: impl Into<String>, metadata: TokenMetadata) -> Result<Self, TokenArrayError> {
		let text = text.into();
		let char_len = text.chars().count();
		let text_len = u32::try_from(char_len).map_err(|_| TokenArrayError::TextTooLong(char_len))?;
		Self::new(vec![text_len, metadata.bits()], text)
	}

	/// Number of tokens.
	#[inline]
	pub fn count(&self) -> usize {
		self.tokens.len() / 2
	}

	/// The line content.
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Line length in chars.
	#[inline]
	pub fn text_len(&self) -> usize {
		self.text_len as usize
	}

	/// The raw packed buffer.
	#[inline]
	pub fn raw(&self) -> &[u32] {
		&self.tokens
	}

	/// Start offset of token `index`. Token 0 always starts at 0.
	#[inline]
	pub fn start_offset(&self, index: usize) -> usize {
		if index == 0 { 0 } else { self.end_offset(index - 1) }
	}

	/// End offset of token `index`. `end_offset(count())` is the line length.
	#[inline]
	pub fn end_offset(&self, index: usize) -> usize {
		debug_assert!(index <= self.count(), "token index {index} out of range for {} tokens", self.count());
		if index >= self.count() {
			return self.text_len();
		}
		self.tokens[index * 2] as usize
	}

	/// Metadata of token `index`.
	///
	/// `metadata(count())` is the end-of-line sentinel and yields the last
	/// token's metadata, as does any larger index in release builds.
	#[inline]
	pub fn metadata(&self, index: usize) -> TokenMetadata {
		debug_assert!(index <= self.count(), "token index {index} out of range for {} tokens", self.count());
		let index = index.min(self.count() - 1);
		TokenMetadata(self.tokens[index * 2 + 1])
	}

	#[inline]
	pub fn token_type(&self, index: usize) -> StandardTokenType {
		self.metadata(index).token_type()
	}

	#[inline]
	pub fn language_id(&self, index: usize) -> LanguageId {
		self.metadata(index).language_id()
	}

	/// Bitwise OR of every token's metadata.
	#[inline]
	pub fn line_metadata(&self) -> TokenMetadata {
		TokenMetadata(self.line_metadata)
	}

	/// Returns true if any token on the line has type `ty`.
	#[inline]
	pub fn has_token_type(&self, ty: StandardTokenType) -> bool {
		self.type_presence & (1 << ty.bits()) != 0
	}

	/// Index of the token containing `offset`.
	///
	/// An offset on a boundary between two tokens belongs to the following
	/// token; offsets at or past the line end resolve to the last token.
	pub fn index_of(&self, offset: usize) -> usize {
		let count = self.count();
		if offset >= self.text_len() {
			return count - 1;
		}

		let offset = offset as u32;
		let mut low = 0;
		let mut high = count - 1;
		while low < high {
			let mid = low + (high - low) / 2;
			if self.tokens[mid * 2] <= offset {
				low = mid + 1;
			} else {
				high = mid;
			}
		}
		low
	}

	/// Text of token `index`.
	pub fn token_text(&self, index: usize) -> &str {
		self.slice_chars(self.start_offset(index), self.end_offset(index))
	}

	/// Returns `text[start..end]` addressed in chars.
	pub fn slice_chars(&self, start: usize, end: usize) -> &str {
		let start = self.char_to_byte(start);
		let end = self.char_to_byte(end).max(start);
		&self.text[start..end]
	}

	/// Merges maximal runs of adjacent tokens of type `ty` into char ranges.
	pub fn find_ranges_of(&self, ty: StandardTokenType) -> Vec<Range<usize>> {
		let mut ranges: Vec<Range<usize>> = Vec::new();
		for (start, end, metadata) in self.iter() {
			if start == end || metadata.token_type() != ty {
				continue;
			}
			match ranges.last_mut() {
				Some(last) if last.end == start => last.end = end,
				_ => ranges.push(start..end),
			}
		}
		ranges
	}

	/// Compares `count` tokens starting at `from` with the same tokens of
	/// `other`, raw buffer and line text alike.
	pub fn equals_slice(&self, other: &LineTokenArray, from: usize, count: usize) -> bool {
		if self.text != other.text {
			return false;
		}
		let range = from * 2..(from + count) * 2;
		match (self.tokens.get(range.clone()), other.tokens.get(range)) {
			(Some(a), Some(b)) => a == b,
			_ => false,
		}
	}

	/// Iterates `(start, end, metadata)` for every token.
	pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, usize, TokenMetadata)> + '_ {
		(0..self.count()).map(|i| (self.start_offset(i), self.end_offset(i), self.metadata(i)))
	}

	fn char_to_byte(&self, char_idx: usize) -> usize {
		if self.text.len() == self.text_len() {
			return char_idx.min(self.text.len());
		}
		self.text
			.char_indices()
			.nth(char_idx)
			.map_or(self.text.len(), |(byte, _)| byte)
	}
}

/// Converts a start-offset buffer into end-offset form in place.
///
/// Every boundary moves one pair to the left and the final end slot receives
/// `text_len`. The leading start offset (always 0) is dropped.
pub fn to_end_offset_form(tokens: &mut [u32], text_len: u32) {
	let count = tokens.len() / 2;
	if count == 0 {
		return;
	}
	for i in 0..count - 1 {
		tokens[i * 2] = tokens[(i + 1) * 2];
	}
	tokens[(count - 1) * 2] = text_len;
}
