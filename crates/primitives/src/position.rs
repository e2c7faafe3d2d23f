use std::cmp::Ordering;

/// Position in line/character coordinates.
///
/// `character` counts Unicode scalar values from the start of the line, the
/// same unit token offsets use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
	/// Zero-based line index.
	pub line: usize,
	/// Zero-based character offset in the line.
	pub character: usize,
}

impl Position {
	/// Creates a new position.
	pub const fn new(line: usize, character: usize) -> Self {
		Self { line, character }
	}
}

impl Ord for Position {
	fn cmp(&self, other: &Self) -> Ordering {
		self.line
			.cmp(&other.line)
			.then(self.character.cmp(&other.character))
	}
}

impl PartialOrd for Position {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Half-open range between two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
	/// Start position (inclusive).
	pub start: Position,
	/// End position (exclusive).
	pub end: Position,
}

impl TextRange {
	/// Creates a new range.
	///
	/// The endpoints are reordered if `end` precedes `start`.
	pub fn new(start: Position, end: Position) -> Self {
		if end < start {
			Self { start: end, end: start }
		} else {
			Self { start, end }
		}
	}

	/// Returns the range with its endpoints in order.
	///
	/// Ranges built through the public fields may be reversed.
	pub fn normalized(self) -> Self {
		Self::new(self.start, self.end)
	}

	/// Creates a range covering `start..end` characters of a single line.
	pub fn on_line(line: usize, start: usize, end: usize) -> Self {
		Self::new(Position::new(line, start), Position::new(line, end))
	}

	/// Creates a range spanning whole lines `start_line..=end_line`.
	///
	/// The end position uses `usize::MAX` as its character, which consumers
	/// clamp to the line length.
	pub fn lines(start_line: usize, end_line: usize) -> Self {
		Self::new(Position::new(start_line, 0), Position::new(end_line, usize::MAX))
	}

	/// Creates a zero-length range at a position.
	pub const fn point(pos: Position) -> Self {
		Self { start: pos, end: pos }
	}

	/// Returns true if the range is empty.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Number of line breaks the range spans.
	pub fn line_span(&self) -> usize {
		self.end.line.abs_diff(self.start.line)
	}

	/// Returns true if `pos` lies within `[start, end)`.
	pub fn contains(&self, pos: Position) -> bool {
		pos >= self.start && pos < self.end
	}
}
