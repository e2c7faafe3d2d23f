//! Caller-facing token API over every open document.

use std::ops::Range;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use scopeline_language::{Grammar, GrammarRegistry};
use scopeline_primitives::{Document, DocumentId, Position, TextChange};

use crate::config::TokenizerConfig;
use crate::error::{Result, TokenizeError};
use crate::info::TokenInfo;
use crate::stats::TokenizeStats;
use crate::store::DocumentTokenStore;

struct DocEntry<G: Grammar> {
	document: Document,
	store: DocumentTokenStore<G>,
}

/// Owns open documents and one token store per document.
pub struct TokenService<G: Grammar> {
	registry: Arc<GrammarRegistry<G>>,
	config: TokenizerConfig,
	entries: FxHashMap<DocumentId, DocEntry<G>>,
}

impl<G: Grammar> TokenService<G> {
	pub fn new(registry: Arc<GrammarRegistry<G>>, config: TokenizerConfig) -> Self {
		Self {
			registry,
			config,
			entries: FxHashMap::default(),
		}
	}

	pub fn registry(&self) -> &Arc<GrammarRegistry<G>> {
		&self.registry
	}

	/// Opens a document, replacing any open document with the same id.
	///
	/// On a grammar failure the document stays open with default tokens and
	/// the error is returned.
	pub fn open(&mut self, document: Document) -> Result<()> {
		let id = document.id();
		let mut store = DocumentTokenStore::new(self.registry.clone(), self.config);
		let result = store.open(&document);
		self.entries.insert(id, DocEntry { document, store });
		result
	}

	/// Closes a document, discarding its cache.
	pub fn close(&mut self, id: DocumentId) -> Option<Document> {
		let entry = self.entries.remove(&id)?;
		tracing::debug!(doc = %id, "tokens.document.closed");
		Some(entry.document)
	}

	pub fn is_open(&self, id: DocumentId) -> bool {
		self.entries.contains_key(&id)
	}

	pub fn document(&self, id: DocumentId) -> Option<&Document> {
		self.entries.get(&id).map(|entry| &entry.document)
	}

	/// Applies `changes` to the document text and updates its tokens.
	pub fn edit(&mut self, id: DocumentId, changes: &[TextChange]) -> Result<()> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		document.apply_changes(changes);
		store.on_edit(&*document, changes)
	}

	/// Switches the document to another language and re-parses it.
	pub fn set_language(&mut self, id: DocumentId, language: &str) -> Result<()> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		document.set_language_id(language);
		store.refresh(&*document)
	}

	/// Discards the document's tokens and re-parses it.
	pub fn refresh(&mut self, id: DocumentId) -> Result<()> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		store.refresh(&*document)
	}

	pub fn token_at(&mut self, id: DocumentId, position: Position) -> Result<TokenInfo> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		store.token_at(&*document, position)
	}

	pub fn is_comment_at(&mut self, id: DocumentId, position: Position) -> Result<bool> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		store.is_comment_at(&*document, position)
	}

	pub fn line_tokens(&mut self, id: DocumentId, line: usize) -> Result<Vec<TokenInfo>> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		store.line_tokens(&*document, line)
	}

	pub fn tokens_for_lines(&mut self, id: DocumentId, lines: Range<usize>) -> Result<Vec<Vec<TokenInfo>>> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		store.tokens_for_lines(&*document, lines)
	}

	pub fn all_tokens(&mut self, id: DocumentId) -> Result<Vec<Vec<TokenInfo>>> {
		let DocEntry { document, store } = self.entry_mut(id)?;
		store.all_tokens(&*document)
	}

	pub fn stats(&self, id: DocumentId) -> Option<TokenizeStats> {
		self.entries.get(&id).map(|entry| entry.store.stats())
	}

	fn entry_mut(&mut self, id: DocumentId) -> Result<&mut DocEntry<G>> {
		self.entries.get_mut(&id).ok_or(TokenizeError::UnknownDocument(id))
	}
}
