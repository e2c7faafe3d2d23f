//! Language and grammar registry.
//!
//! Maps language identifiers (`"rust"`) to numeric [`LanguageId`]s and root
//! scope names, and scope names to loaded grammars. Grammars are either
//! registered up front or produced on demand by a loader callback; loaded
//! results are cached.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::config::{ConfigError, LanguagesConfig, Result};
use crate::grammar::{Grammar, GrammarError};
use crate::ids::LanguageId;
use crate::scope::{ScopeName, ScopeStack};

/// Identifier under which plain text is always registered.
pub const PLAIN_TEXT: &str = "plaintext";

/// Produces a grammar for a scope name on first use. `Ok(None)` means no
/// grammar exists for the scope.
pub type GrammarLoader<G> = dyn Fn(&ScopeName) -> std::result::Result<Option<G>, GrammarError> + Send + Sync;

#[derive(Debug, Clone)]
struct LanguageEntry {
	name: String,
	scope_name: Option<ScopeName>,
	/// Scope prefixes that switch to an embedded language, longest first.
	embedded: Vec<(ScopeName, LanguageId)>,
}

/// Registry of languages and their grammars.
pub struct GrammarRegistry<G> {
	/// Indexed by `LanguageId - 1`; plain text occupies slot 0.
	languages: Vec<LanguageEntry>,
	by_name: FxHashMap<String, LanguageId>,
	grammars: Mutex<FxHashMap<ScopeName, Option<Arc<G>>>>,
	loader: Option<Box<GrammarLoader<G>>>,
}

impl<G> fmt::Debug for GrammarRegistry<G> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GrammarRegistry")
			.field("languages", &self.languages)
			.field("cached_grammars", &self.grammars.lock().len())
			.field("has_loader", &self.loader.is_some())
			.finish()
	}
}

impl<G> Default for GrammarRegistry<G> {
	fn default() -> Self {
		Self::new()
	}
}

impl<G> GrammarRegistry<G> {
	/// Creates a registry containing only plain text.
	pub fn new() -> Self {
		let mut by_name = FxHashMap::default();
		by_name.insert(PLAIN_TEXT.to_string(), LanguageId::PLAIN_TEXT);
		Self {
			languages: vec![LanguageEntry {
				name: PLAIN_TEXT.to_string(),
				scope_name: None,
				embedded: Vec::new(),
			}],
			by_name,
			grammars: Mutex::new(FxHashMap::default()),
			loader: None,
		}
	}

	/// Builds a registry from parsed `languages.toml` content.
	///
	/// All languages are registered before embedded-language mappings are
	/// resolved, so entries may reference languages declared later.
	pub fn from_config(config: &LanguagesConfig) -> Result<Self> {
		let mut registry = Self::new();
		for def in &config.languages {
			registry.register_language(&def.id, def.scope_name.as_deref())?;
		}
		for def in &config.languages {
			for (scope_prefix, embedded) in &def.embedded_languages {
				registry.register_embedded(&def.id, scope_prefix, embedded)?;
			}
		}
		Ok(registry)
	}

	/// Installs a loader invoked for scopes without a registered grammar.
	pub fn with_loader<F>(mut self, loader: F) -> Self
	where
		F: Fn(&ScopeName) -> std::result::Result<Option<G>, GrammarError> + Send + Sync + 'static,
	{
		self.loader = Some(Box::new(loader));
		self
	}

	/// Registers a language, returning its numeric identifier.
	pub fn register_language(&mut self, name: &str, scope_name: Option<&str>) -> Result<LanguageId> {
		if self.by_name.contains_key(name) {
			return Err(ConfigError::DuplicateLanguage(name.to_string()));
		}
		let max = u8::MAX as usize;
		if self.languages.len() >= max {
			return Err(ConfigError::TooManyLanguages { max: max - 1 });
		}

		let id = LanguageId(self.languages.len() as u8 + 1);
		self.languages.push(LanguageEntry {
			name: name.to_string(),
			scope_name: scope_name.map(ScopeName::new),
			embedded: Vec::new(),
		});
		self.by_name.insert(name.to_string(), id);
		tracing::debug!(language = name, id = id.raw(), scope = ?scope_name, "registry.language.registered");
		Ok(id)
	}

	/// Declares that scopes starting with `scope_prefix` inside `host` belong
	/// to the `embedded` language.
	pub fn register_embedded(&mut self, host: &str, scope_prefix: &str, embedded: &str) -> Result<()> {
		let host_id = self.lookup(host)?;
		let embedded_id = self.lookup(embedded)?;
		let entry = &mut self.languages[Self::slot(host_id)];
		entry.embedded.push((ScopeName::new(scope_prefix), embedded_id));
		entry
			.embedded
			.sort_by(|a, b| b.0.as_str().len().cmp(&a.0.as_str().len()));
		Ok(())
	}

	/// Returns the numeric identifier of a language, or [`LanguageId::NONE`].
	pub fn language_id(&self, name: &str) -> LanguageId {
		self.by_name.get(name).copied().unwrap_or(LanguageId::NONE)
	}

	/// Returns the identifier string of a registered language.
	pub fn language_name(&self, id: LanguageId) -> Option<&str> {
		self.entry(id).map(|entry| entry.name.as_str())
	}

	/// Resolves a language identifier to the root scope of its grammar.
	pub fn resolve_scope_name(&self, language: &str) -> Option<ScopeName> {
		let id = self.by_name.get(language)?;
		self.entry(*id)?.scope_name.clone()
	}

	/// Returns the language a token belongs to, given its scopes and the
	/// language of the document hosting it.
	///
	/// The innermost scope covered by one of the host's embedded-language
	/// prefixes wins; otherwise the token belongs to the host.
	pub fn language_for_scopes(&self, host: LanguageId, scopes: &ScopeStack) -> LanguageId {
		let Some(entry) = self.entry(host) else {
			return host;
		};
		if entry.embedded.is_empty() {
			return host;
		}
		scopes
			.as_slice()
			.iter()
			.rev()
			.find_map(|scope| {
				entry
					.embedded
					.iter()
					.find(|(prefix, _)| scope.has_segment_prefix(prefix.as_str()))
					.map(|(_, id)| *id)
			})
			.unwrap_or(host)
	}

	/// Registers a grammar under an explicit scope name, replacing any cached entry.
	pub fn insert_grammar(&self, scope: ScopeName, grammar: G) {
		self.grammars.lock().insert(scope, Some(Arc::new(grammar)));
	}

	/// Returns the grammar for a scope, loading and caching it if needed.
	///
	/// A scope without a grammar is `Ok(None)`. Loader failures are returned
	/// and not cached, so a later call retries.
	pub fn load_grammar(&self, scope: &ScopeName) -> std::result::Result<Option<Arc<G>>, GrammarError> {
		if let Some(cached) = self.grammars.lock().get(scope) {
			return Ok(cached.clone());
		}
		let Some(loader) = &self.loader else {
			return Ok(None);
		};

		let loaded = loader(scope)?.map(Arc::new);
		tracing::debug!(scope = %scope, found = loaded.is_some(), "registry.grammar.loaded");
		self.grammars.lock().insert(scope.clone(), loaded.clone());
		Ok(loaded)
	}

	/// Returns all registered language identifiers and their numeric ids.
	pub fn languages(&self) -> impl Iterator<Item = (LanguageId, &str)> {
		self.languages
			.iter()
			.enumerate()
			.map(|(idx, entry)| (LanguageId(idx as u8 + 1), entry.name.as_str()))
	}

	fn lookup(&self, name: &str) -> Result<LanguageId> {
		self.by_name
			.get(name)
			.copied()
			.ok_or_else(|| ConfigError::UnknownLanguage(name.to_string()))
	}

	fn entry(&self, id: LanguageId) -> Option<&LanguageEntry> {
		if id.is_none() {
			return None;
		}
		self.languages.get(Self::slot(id))
	}

	#[inline]
	fn slot(id: LanguageId) -> usize {
		id.raw() as usize - 1
	}
}

impl<G: Grammar> GrammarRegistry<G> {
	/// Registers a grammar under its own root scope.
	pub fn register_grammar(&self, grammar: G) {
		let scope = grammar.scope_name().clone();
		self.insert_grammar(scope, grammar);
	}
}
