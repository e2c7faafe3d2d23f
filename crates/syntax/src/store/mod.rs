//! Incremental per-document token cache.
//!
//! A [`DocumentTokenStore`] keeps one entry per document line: the text it
//! was computed from, the line's tokens, and the grammar's continuation
//! state after the line. Edits re-tokenize the lines they touch and only
//! cascade to the rest of the document when the line count or the
//! continuation state at the end of the edit changed.
//!
//! Queries validate the lines they read against the live document first, so
//! text mutated behind the store's back is picked up lazily. A line-count
//! mismatch cannot be reconciled line by line and triggers a full refresh.

use std::ops::Range;
use std::sync::Arc;

use scopeline_language::{Grammar, GrammarRegistry, LanguageId};
use scopeline_primitives::{DocumentSource, Position, TextChange, sort_changes};
use scopeline_tokens::{LineTokenArray, ScopedLineTokens, StandardTokenType};

use crate::config::TokenizerConfig;
use crate::error::Result;
use crate::info::TokenInfo;
use crate::stats::TokenizeStats;

mod line;

use line::{LineEntry, LineState, LineTokenizer};

/// Unsettled edit ranges kept before the log collapses into one range.
const MAX_PENDING_RANGES: usize = 32;

/// Token cache for one open document.
pub struct DocumentTokenStore<G: Grammar> {
	registry: Arc<GrammarRegistry<G>>,
	config: TokenizerConfig,
	language: String,
	language_id: LanguageId,
	grammar: Option<Arc<G>>,
	/// Set after a grammar failure; cleared by a successful refresh.
	degraded: bool,
	lines: Vec<LineEntry<G::State>>,
	/// Post-edit line ranges touched by edits not yet settled by a query.
	pending: Vec<Range<usize>>,
	stats: TokenizeStats,
}

impl<G: Grammar> std::fmt::Debug for DocumentTokenStore<G> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DocumentTokenStore")
			.field("language", &self.language)
			.field("language_id", &self.language_id)
			.field("has_grammar", &self.grammar.is_some())
			.field("degraded", &self.degraded)
			.field("lines", &self.lines.len())
			.field("pending", &self.pending)
			.field("stats", &self.stats)
			.finish()
	}
}

impl<G: Grammar> DocumentTokenStore<G> {
	/// Creates an empty store. Call [`open`](Self::open) before querying.
	pub fn new(registry: Arc<GrammarRegistry<G>>, config: TokenizerConfig) -> Self {
		Self {
			registry,
			config,
			language: String::new(),
			language_id: LanguageId::NONE,
			grammar: None,
			degraded: false,
			lines: Vec::new(),
			pending: Vec::new(),
			stats: TokenizeStats::default(),
		}
	}

	/// Resolves the document's grammar and tokenizes every line.
	///
	/// A document without a grammar gets default tokens and is not an error.
	pub fn open<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<()> {
		let result = self.reparse(doc);
		if result.is_ok() {
			tracing::debug!(
				language = %self.language,
				lines = self.lines.len(),
				has_grammar = self.grammar.is_some(),
				"tokens.document.opened"
			);
		}
		self.settle(doc, result)
	}

	/// Discards the cache, resolves the grammar again and re-parses the
	/// whole document.
	pub fn refresh<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<()> {
		tracing::debug!(language = %self.language, lines = doc.line_count(), "tokens.document.refresh");
		let result = self.reparse(doc);
		self.settle(doc, result)
	}

	/// Updates the cache after `changes` were applied to `doc`.
	///
	/// Change ranges are in pre-edit coordinates; `doc` holds the post-edit
	/// text.
	pub fn on_edit<D: DocumentSource + ?Sized>(&mut self, doc: &D, changes: &[TextChange]) -> Result<()> {
		let result = self.apply_edit(doc, changes);
		self.settle(doc, result)
	}

	/// Re-tokenizes line `line` if its cached text is stale.
	pub fn validate_line<D: DocumentSource + ?Sized>(&mut self, doc: &D, line: usize) -> Result<()> {
		self.validate_range(doc, line..line + 1)
	}

	/// Re-tokenizes stale lines in `lines` and in the pending-edit log, then
	/// clears the log.
	pub fn validate_range<D: DocumentSource + ?Sized>(&mut self, doc: &D, lines: Range<usize>) -> Result<()> {
		let result = self.heal(doc, lines);
		self.settle(doc, result)
	}

	/// Validates every line.
	pub fn validate_document<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<()> {
		self.validate_range(doc, 0..doc.line_count())
	}

	/// Returns the token at `position`.
	///
	/// Positions past the last line yield an empty token; positions past a
	/// line's end resolve to its last token.
	pub fn token_at<D: DocumentSource + ?Sized>(&mut self, doc: &D, position: Position) -> Result<TokenInfo> {
		self.validate_line(doc, position.line)?;
		let Some(tokens) = self.lines.get(position.line).and_then(LineEntry::tokens) else {
			return Ok(TokenInfo::empty_at(position, self.language_id));
		};
		let index = tokens.array.index_of(position.character);
		Ok(TokenInfo::from_line(position.line, &tokens.array, &tokens.scopes, index))
	}

	/// Returns the classification of the token at `position`.
	pub fn token_type_at<D: DocumentSource + ?Sized>(&mut self, doc: &D, position: Position) -> Result<StandardTokenType> {
		Ok(self.token_at(doc, position)?.token_type)
	}

	/// Returns true if `position` lies inside a comment token.
	pub fn is_comment_at<D: DocumentSource + ?Sized>(&mut self, doc: &D, position: Position) -> Result<bool> {
		Ok(self.token_type_at(doc, position)? == StandardTokenType::Comment)
	}

	/// Returns all tokens of `line`, empty if the line does not exist.
	pub fn line_tokens<D: DocumentSource + ?Sized>(&mut self, doc: &D, line: usize) -> Result<Vec<TokenInfo>> {
		self.validate_line(doc, line)?;
		Ok(self.collect_line(line))
	}

	/// Returns the tokens of each line in `lines`, clamped to the document.
	pub fn tokens_for_lines<D: DocumentSource + ?Sized>(&mut self, doc: &D, lines: Range<usize>) -> Result<Vec<Vec<TokenInfo>>> {
		self.validate_range(doc, lines.clone())?;
		let end = lines.end.min(self.lines.len());
		Ok((lines.start.min(end)..end).map(|line| self.collect_line(line)).collect())
	}

	/// Returns the tokens of every line.
	pub fn all_tokens<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<Vec<Vec<TokenInfo>>> {
		self.tokens_for_lines(doc, 0..doc.line_count())
	}

	/// Returns the validated token array of `line`.
	pub fn line_token_array<D: DocumentSource + ?Sized>(&mut self, doc: &D, line: usize) -> Result<Option<&LineTokenArray>> {
		self.validate_line(doc, line)?;
		Ok(self.lines.get(line).and_then(LineEntry::tokens).map(|tokens| &tokens.array))
	}

	/// Returns the same-language run of tokens around `position`.
	pub fn scoped_tokens_at<D: DocumentSource + ?Sized>(
		&mut self,
		doc: &D,
		position: Position,
	) -> Result<Option<ScopedLineTokens<'_>>> {
		let array = self.line_token_array(doc, position.line)?;
		Ok(array.map(|array| ScopedLineTokens::new(array, position.character)))
	}

	/// Numeric id of the document's language.
	pub fn language_id(&self) -> LanguageId {
		self.language_id
	}

	/// Returns true if the document is tokenized by a grammar.
	pub fn has_grammar(&self) -> bool {
		self.grammar.is_some()
	}

	/// Returns true after a grammar failure until a refresh succeeds.
	pub fn is_degraded(&self) -> bool {
		self.degraded
	}

	/// Number of cached lines.
	pub fn line_count(&self) -> usize {
		self.lines.len()
	}

	pub fn stats(&self) -> TokenizeStats {
		self.stats
	}

	fn reparse<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<()> {
		self.stats.refreshes += 1;
		self.resolve_grammar(doc)?;
		self.degraded = false;
		self.parse_all(doc)
	}

	fn resolve_grammar<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<()> {
		self.language = doc.language_id().to_string();
		self.language_id = self.registry.language_id(&self.language);
		self.grammar = None;

		let Some(scope) = self.registry.resolve_scope_name(&self.language) else {
			tracing::info!(language = %self.language, "tokens.grammar.missing");
			return Ok(());
		};
		match self.registry.load_grammar(&scope) {
			Ok(Some(grammar)) => self.grammar = Some(grammar),
			Ok(None) => tracing::info!(language = %self.language, scope = %scope, "tokens.grammar.missing"),
			Err(error) => {
				tracing::warn!(language = %self.language, scope = %scope, %error, "tokens.grammar.load_failed");
				return Err(error.into());
			}
		}
		Ok(())
	}

	fn parse_all<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<()> {
		self.lines.clear();
		self.pending.clear();
		let count = doc.line_count();
		self.lines.resize_with(count, LineEntry::unparsed);
		for line in 0..count {
			self.retokenize(doc, line)?;
		}
		Ok(())
	}

	fn apply_edit<D: DocumentSource + ?Sized>(&mut self, doc: &D, changes: &[TextChange]) -> Result<()> {
		let mut changes = changes.to_vec();
		sort_changes(&mut changes);

		// Line shift introduced by earlier changes of this batch.
		let mut shift: isize = 0;
		for change in &changes {
			let start = change.range.start.line.saturating_add_signed(shift);
			let end = change.range.end.line.saturating_add_signed(shift);
			let inserted = change.inserted_newlines();
			let last = start + inserted;
			if end >= self.lines.len() || last >= doc.line_count() {
				tracing::debug!(start, end, cached = self.lines.len(), "tokens.edit.out_of_range");
				return self.refresh_inner(doc);
			}

			let recorded = self.lines[end].end_state().cloned();
			self.lines.splice(start..=end, (0..=inserted).map(|_| LineEntry::unparsed()));
			self.remap_pending(start, end, last);
			for line in start..=last {
				self.retokenize(doc, line)?;
			}
			shift += inserted as isize - (end - start) as isize;

			let line_count_changed = inserted != end - start;
			let state_changed = self.lines[last].end_state() != recorded.as_ref();
			if self.grammar.is_some() && (line_count_changed || state_changed) {
				tracing::trace!(start, last, line_count_changed, state_changed, "tokens.edit.cascade");
				self.stats.cascades += 1;
				let count = doc.line_count();
				self.lines.resize_with(count, LineEntry::unparsed);
				for line in last + 1..count {
					self.retokenize(doc, line)?;
				}
				self.mark_pending(start..count);
				return Ok(());
			}

			tracing::trace!(start, last, "tokens.edit.absorbed");
			self.mark_pending(start..last + 1);
		}

		if self.lines.len() != doc.line_count() {
			tracing::debug!(cached = self.lines.len(), live = doc.line_count(), "tokens.edit.diverged");
			return self.refresh_inner(doc);
		}
		Ok(())
	}

	/// Moves pending ranges across a splice of old lines `start..=end` into
	/// new lines `start..=last`.
	fn remap_pending(&mut self, start: usize, end: usize, last: usize) {
		let remap_start = |line: usize| match line {
			l if l <= start => l,
			l if l > end => l - end + last,
			_ => start,
		};
		let remap_end = |line: usize| match line {
			l if l <= start => l,
			l if l > end => l - end + last,
			_ => last + 1,
		};
		for range in std::mem::take(&mut self.pending) {
			self.mark_pending(remap_start(range.start)..remap_end(range.end));
		}
	}

	/// Records `range` in the pending log, keeping the log sorted with
	/// overlapping or adjacent ranges merged.
	///
	/// Past [`MAX_PENDING_RANGES`] the log collapses into one covering range.
	fn mark_pending(&mut self, range: Range<usize>) {
		let at = self.pending.partition_point(|r| r.end < range.start);
		let mut merged = range;
		while let Some(next) = self.pending.get(at).filter(|r| r.start <= merged.end) {
			merged = merged.start.min(next.start)..merged.end.max(next.end);
			self.pending.remove(at);
		}
		self.pending.insert(at, merged);

		if self.pending.len() > MAX_PENDING_RANGES {
			let first = self.pending.first().map_or(0, |r| r.start);
			let last = self.pending.last().map_or(0, |r| r.end);
			tracing::trace!(first, last, "tokens.edit.pending_collapsed");
			self.pending.clear();
			self.pending.push(first..last);
		}
	}

	fn heal<D: DocumentSource + ?Sized>(&mut self, doc: &D, lines: Range<usize>) -> Result<()> {
		if self.lines.len() != doc.line_count() {
			tracing::debug!(cached = self.lines.len(), live = doc.line_count(), "tokens.validate.diverged");
			return self.refresh_inner(doc);
		}

		let mut ranges = std::mem::take(&mut self.pending);
		ranges.push(lines);
		for range in ranges {
			let end = range.end.min(self.lines.len());
			let mut line = range.start;
			while line < end {
				line = self.heal_from(doc, line)?;
			}
		}
		Ok(())
	}

	/// Re-tokenizes `line` if stale, then keeps going downward while the
	/// continuation state differs from what the next line was built on.
	///
	/// Returns the first line not examined.
	fn heal_from<D: DocumentSource + ?Sized>(&mut self, doc: &D, line: usize) -> Result<usize> {
		if !self.lines[line].is_stale(&doc.line_text(line)) {
			return Ok(line + 1);
		}

		let mut line = line;
		loop {
			let before = self.lines[line].end_state().cloned();
			self.retokenize(doc, line)?;
			line += 1;
			let settled = self.lines[line - 1].end_state() == before.as_ref();
			if line >= self.lines.len() || (settled && !self.lines[line].is_stale(&doc.line_text(line))) {
				return Ok(line);
			}
		}
	}

	fn refresh_inner<D: DocumentSource + ?Sized>(&mut self, doc: &D) -> Result<()> {
		tracing::debug!(language = %self.language, lines = doc.line_count(), "tokens.document.refresh");
		self.reparse(doc)
	}

	fn retokenize<D: DocumentSource + ?Sized>(&mut self, doc: &D, line: usize) -> Result<()> {
		let text = doc.line_text(line).into_owned();
		let previous = match line {
			0 => None,
			n => self.lines[n - 1].end_state(),
		};
		let tokenizer = LineTokenizer {
			grammar: self.grammar.as_deref(),
			registry: &self.registry,
			language_id: self.language_id,
			max_line_length: self.config.max_line_length,
		};
		let state = tokenizer.tokenize(&text, previous)?;

		match state {
			LineState::Parsed { .. } => self.stats.lines_tokenized += 1,
			LineState::SkippedTooLong { .. } => self.stats.lines_skipped += 1,
			LineState::Unparsed | LineState::Plain { .. } => {}
		}
		self.lines[line] = LineEntry { text, state };
		Ok(())
	}

	/// On grammar failure, drops to default tokens for the whole document.
	fn settle<D: DocumentSource + ?Sized>(&mut self, doc: &D, result: Result<()>) -> Result<()> {
		let Err(error) = result else {
			return Ok(());
		};
		tracing::warn!(language = %self.language, %error, "tokens.grammar.failed");
		self.grammar = None;
		self.degraded = true;
		// Default tokens come from the language id alone and only fail for
		// lines beyond the token offset range, which leave the cache empty.
		if self.parse_all(doc).is_err() {
			self.lines.clear();
		}
		Err(error)
	}

	fn collect_line(&self, line: usize) -> Vec<TokenInfo> {
		let Some(tokens) = self.lines.get(line).and_then(LineEntry::tokens) else {
			return Vec::new();
		};
		(0..tokens.array.count())
			.map(|index| TokenInfo::from_line(line, &tokens.array, &tokens.scopes, index))
			.collect()
	}
}
