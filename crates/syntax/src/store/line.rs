//! Per-line cache entries and the single-line tokenization step.

use scopeline_language::{Grammar, GrammarRegistry, LanguageId, LexerState, RawToken, ScopeStack};
use scopeline_tokens::{
	DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, FontStyle, LineTokenArray, StandardTokenType, TokenMetadata, classify,
};

use crate::error::Result;

/// Tokens of one line plus the scope stack of each token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineTokens {
	pub(crate) array: LineTokenArray,
	pub(crate) scopes: Vec<ScopeStack>,
}

impl LineTokens {
	/// A single whole-line token with no scopes.
	pub(crate) fn default_for(text: &str, language_id: LanguageId) -> Result<Self> {
		Ok(Self {
			array: LineTokenArray::single(text, TokenMetadata::default_for(language_id))?,
			scopes: vec![ScopeStack::default()],
		})
	}
}

#[derive(Debug, Clone)]
pub(crate) enum LineState<S> {
	/// Placeholder between an edit splice and re-tokenization.
	Unparsed,
	/// Tokenized by the grammar.
	Parsed { tokens: LineTokens, end_state: S },
	/// Longer than the length limit; the incoming state passes through.
	SkippedTooLong { tokens: LineTokens, end_state: Option<S> },
	/// Default tokens for a document without a grammar.
	Plain { tokens: LineTokens },
}

#[derive(Debug, Clone)]
pub(crate) struct LineEntry<S> {
	/// Line text the entry was computed from.
	pub(crate) text: String,
	pub(crate) state: LineState<S>,
}

impl<S: LexerState> LineEntry<S> {
	pub(crate) fn unparsed() -> Self {
		Self {
			text: String::new(),
			state: LineState::Unparsed,
		}
	}

	/// Continuation state to feed into the next line.
	pub(crate) fn end_state(&self) -> Option<&S> {
		match &self.state {
			LineState::Parsed { end_state, .. } => Some(end_state),
			LineState::SkippedTooLong { end_state, .. } => end_state.as_ref(),
			LineState::Unparsed | LineState::Plain { .. } => None,
		}
	}

	pub(crate) fn tokens(&self) -> Option<&LineTokens> {
		match &self.state {
			LineState::Parsed { tokens, .. } | LineState::SkippedTooLong { tokens, .. } | LineState::Plain { tokens } => {
				Some(tokens)
			}
			LineState::Unparsed => None,
		}
	}

	/// Returns true if the entry no longer describes `live`.
	pub(crate) fn is_stale(&self, live: &str) -> bool {
		matches!(self.state, LineState::Unparsed) || self.text != live
	}
}

/// Everything needed to tokenize one line in isolation.
pub(crate) struct LineTokenizer<'a, G: Grammar> {
	pub(crate) grammar: Option<&'a G>,
	pub(crate) registry: &'a GrammarRegistry<G>,
	pub(crate) language_id: LanguageId,
	pub(crate) max_line_length: usize,
}

impl<G: Grammar> LineTokenizer<'_, G> {
	pub(crate) fn tokenize(&self, text: &str, previous: Option<&G::State>) -> Result<LineState<G::State>> {
		let Some(grammar) = self.grammar else {
			return Ok(LineState::Plain {
				tokens: LineTokens::default_for(text, self.language_id)?,
			});
		};

		let len = text.chars().count();
		if len > self.max_line_length {
			tracing::debug!(len, limit = self.max_line_length, "tokens.line.skipped");
			return Ok(LineState::SkippedTooLong {
				tokens: LineTokens::default_for(text, self.language_id)?,
				end_state: previous.cloned(),
			});
		}

		let output = grammar.tokenize_line(text, previous)?;
		let tokens = self.build(grammar, text, len, output.tokens)?;
		Ok(LineState::Parsed {
			tokens,
			end_state: output.end_state,
		})
	}

	/// Normalizes raw engine output into a valid partition.
	///
	/// Tokens are ordered by start; the first is stretched to start at 0,
	/// zero-width tokens and repeated starts are dropped, and each token runs
	/// until the next one starts.
	fn build(&self, grammar: &G, text: &str, len: usize, mut raw: Vec<RawToken>) -> Result<LineTokens> {
		raw.sort_by_key(|token| token.start);

		let mut kept: Vec<(usize, ScopeStack)> = Vec::with_capacity(raw.len());
		for token in raw {
			if token.end <= token.start && len > 0 {
				continue;
			}
			let start = token.start.min(len);
			match kept.last() {
				None => kept.push((0, token.scopes)),
				Some((previous, _)) if start <= *previous || start >= len => {}
				Some(_) => kept.push((start, token.scopes)),
			}
		}
		if kept.is_empty() {
			kept.push((0, ScopeStack::new([grammar.scope_name().clone()])));
		}

		let mut buffer = Vec::with_capacity(kept.len() * 2);
		let mut scopes = Vec::with_capacity(kept.len());
		for (start, stack) in kept {
			buffer.push(start as u32);
			buffer.push(self.metadata_for(&stack).bits());
			scopes.push(stack);
		}

		let array = LineTokenArray::from_start_offsets(buffer, text)?;
		Ok(LineTokens { array, scopes })
	}

	fn metadata_for(&self, scopes: &ScopeStack) -> TokenMetadata {
		let language_id = self.registry.language_for_scopes(self.language_id, scopes);
		let token_type = classify(scopes.as_slice());
		TokenMetadata::pack(
			language_id,
			token_type,
			FontStyle::empty(),
			token_type == StandardTokenType::Other,
			DEFAULT_FOREGROUND,
			DEFAULT_BACKGROUND,
		)
	}
}
