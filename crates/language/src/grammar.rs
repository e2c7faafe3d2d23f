//! The scope-grammar engine contract.
//!
//! An engine tokenizes one line at a time. Each call receives the
//! continuation state produced for the previous line (or `None` for the
//! first line) and returns scope-tagged sub-ranges plus the state to feed
//! into the next line.

use std::fmt;

use thiserror::Error;

use crate::scope::{ScopeName, ScopeStack};

/// Errors raised by grammar engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
	/// The engine failed while tokenizing a line.
	#[error("grammar {scope} failed to tokenize line: {reason}")]
	TokenizeFailed { scope: ScopeName, reason: String },

	/// A grammar exists but could not be loaded.
	#[error("failed to load grammar {scope}: {reason}")]
	LoadFailed { scope: ScopeName, reason: String },
}

/// Continuation state carried from one line to the next.
///
/// Only equality matters to the token cache: an unchanged end state means
/// lines below an edit were tokenized against the right assumption.
pub trait LexerState: Clone + Eq + fmt::Debug {}

impl<T: Clone + Eq + fmt::Debug> LexerState for T {}

/// One scope-tagged range produced by an engine.
///
/// Offsets are char offsets into the line, half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
	pub start: usize,
	pub end: usize,
	pub scopes: ScopeStack,
}

impl RawToken {
	pub fn new(start: usize, end: usize, scopes: ScopeStack) -> Self {
		Self { start, end, scopes }
	}
}

/// Result of tokenizing a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokenization<S> {
	pub tokens: Vec<RawToken>,
	pub end_state: S,
}

/// A loaded scope grammar.
pub trait Grammar {
	/// Continuation state type produced by this engine.
	type State: LexerState;

	/// Root scope of the grammar (e.g. `source.rust`).
	fn scope_name(&self) -> &ScopeName;

	/// Tokenizes `line` (without its line ending) given the previous line's state.
	fn tokenize_line(&self, line: &str, previous: Option<&Self::State>) -> Result<LineTokenization<Self::State>, GrammarError>;
}
