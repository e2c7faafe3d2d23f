//! Tokenization counters.

/// Cumulative work done by one document store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizeStats {
	/// Lines handed to the grammar engine.
	pub lines_tokenized: u64,
	/// Lines skipped for exceeding the length limit.
	pub lines_skipped: u64,
	/// Edits whose effect spilled past their own lines.
	pub cascades: u64,
	/// Full re-parses, including the initial one.
	pub refreshes: u64,
}

impl TokenizeStats {
	/// Work done since `earlier` was captured.
	pub fn since(&self, earlier: &TokenizeStats) -> TokenizeStats {
		TokenizeStats {
			lines_tokenized: self.lines_tokenized - earlier.lines_tokenized,
			lines_skipped: self.lines_skipped - earlier.lines_skipped,
			cascades: self.cascades - earlier.cascades,
			refreshes: self.refreshes - earlier.refreshes,
		}
	}
}
