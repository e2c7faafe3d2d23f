//! Single-language views over a line.

use scopeline_language::LanguageId;

use crate::classify::StandardTokenType;
use crate::line_tokens::LineTokenArray;

/// The maximal run of tokens around an offset that share one language id.
///
/// Offsets taken and returned by this view are relative to the start of the
/// run, so callers can treat an embedded fragment as if it were a whole line.
#[derive(Debug, Clone, Copy)]
pub struct ScopedLineTokens<'a> {
	actual: &'a LineTokenArray,
	language_id: LanguageId,
	first_token_index: usize,
	last_token_index: usize,
	first_char_offset: usize,
	last_char_offset: usize,
}

impl<'a> ScopedLineTokens<'a> {
	/// Builds the run containing the token at `offset`.
	pub fn new(actual: &'a LineTokenArray, offset: usize) -> Self {
		let index = actual.index_of(offset);
		let language_id = actual.language_id(index);

		let mut first = index;
		while first > 0 && actual.language_id(first - 1) == language_id {
			first -= 1;
		}
		let mut last = index + 1;
		while last < actual.count() && actual.language_id(last) == language_id {
			last += 1;
		}

		Self {
			actual,
			language_id,
			first_token_index: first,
			last_token_index: last,
			first_char_offset: actual.start_offset(first),
			last_char_offset: actual.end_offset(last - 1),
		}
	}

	#[inline]
	pub fn language_id(&self) -> LanguageId {
		self.language_id
	}

	/// The underlying full line.
	#[inline]
	pub fn actual(&self) -> &'a LineTokenArray {
		self.actual
	}

	/// Index of the first token of the run within the full line.
	#[inline]
	pub fn first_token_index(&self) -> usize {
		self.first_token_index
	}

	/// Exclusive end index of the run within the full line.
	#[inline]
	pub fn last_token_index(&self) -> usize {
		self.last_token_index
	}

	/// Char offset where the run starts within the full line.
	#[inline]
	pub fn first_char_offset(&self) -> usize {
		self.first_char_offset
	}

	/// Char offset where the run ends within the full line.
	#[inline]
	pub fn last_char_offset(&self) -> usize {
		self.last_char_offset
	}

	/// Text covered by the run.
	pub fn line_content(&self) -> &'a str {
		self.actual.slice_chars(self.first_char_offset, self.last_char_offset)
	}

	#[inline]
	pub fn token_count(&self) -> usize {
		self.last_token_index - self.first_token_index
	}

	/// Run-local index of the token containing run-local `offset`.
	///
	/// Offsets past the run clamp to its last token.
	pub fn find_token_index_at_offset(&self, offset: usize) -> usize {
		let index = self.actual.index_of(offset + self.first_char_offset);
		index.clamp(self.first_token_index, self.last_token_index - 1) - self.first_token_index
	}

	/// Classification of run-local token `index`.
	pub fn standard_token_type(&self, index: usize) -> StandardTokenType {
		self.actual.token_type(index + self.first_token_index)
	}

	/// Run-local start offset of run-local token `index`.
	pub fn token_start_offset(&self, index: usize) -> usize {
		self.actual.start_offset(index + self.first_token_index) - self.first_char_offset
	}

	/// Run-local end offset of run-local token `index`.
	pub fn token_end_offset(&self, index: usize) -> usize {
		self.actual.end_offset(index + self.first_token_index) - self.first_char_offset
	}
}
