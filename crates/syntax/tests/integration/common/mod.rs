//! Shared fixtures: a small C-like grammar whose block comments carry state
//! across lines, and helpers to open documents against it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scopeline_language::{
	Grammar, GrammarError, GrammarRegistry, LanguagesConfig, LineTokenization, RawToken, ScopeName, ScopeStack,
};
use scopeline_primitives::{Document, DocumentId};
use scopeline_syntax::{DocumentTokenStore, TokenizerConfig};

pub const ROOT: &str = "source.mock";
pub const BLOCK_COMMENT: &str = "comment.block.mock";
pub const LINE_COMMENT: &str = "comment.line.double-slash.mock";
pub const STRING: &str = "string.quoted.double.mock";
pub const EMBEDDED: &str = "meta.embedded.block.guest";

/// Lines containing this marker make the grammar fail.
pub const FAIL_MARKER: &str = "!!fail";

pub const LANGUAGES: &str = r#"
	[tokenizer]
	max-line-length = 120

	[[language]]
	id = "mock"
	scope-name = "source.mock"

	[language.embedded-languages]
	"meta.embedded.block.guest" = "guest"

	[[language]]
	id = "guest"

	[[language]]
	id = "prose"
	scope-name = "text.prose"
"#;

/// Continuation state: whether the line ended inside `/* ... */`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Code,
	BlockComment,
}

/// Recognizes `/* */`, `//`, `"..."` and `{{ guest }}` regions.
#[derive(Debug)]
pub struct MockGrammar {
	scope: ScopeName,
	calls: Arc<AtomicUsize>,
}

impl MockGrammar {
	pub fn new(calls: Arc<AtomicUsize>) -> Self {
		Self {
			scope: ScopeName::new(ROOT),
			calls,
		}
	}
}

fn at(chars: &[char], i: usize, pattern: &str) -> bool {
	pattern.chars().enumerate().all(|(k, c)| chars.get(i + k) == Some(&c))
}

/// Advances `i` past the closing `*/`, or to the end of the line.
fn consume_block_comment(chars: &[char], i: &mut usize, mode: &mut Mode) {
	while *i < chars.len() {
		if at(chars, *i, "*/") {
			*i += 2;
			*mode = Mode::Code;
			return;
		}
		*i += 1;
	}
}

impl Grammar for MockGrammar {
	type State = Mode;

	fn scope_name(&self) -> &ScopeName {
		&self.scope
	}

	fn tokenize_line(&self, line: &str, previous: Option<&Mode>) -> Result<LineTokenization<Mode>, GrammarError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if line.contains(FAIL_MARKER) {
			return Err(GrammarError::TokenizeFailed {
				scope: self.scope.clone(),
				reason: "scripted failure".into(),
			});
		}

		let chars: Vec<char> = line.chars().collect();
		let n = chars.len();
		let mut mode = previous.copied().unwrap_or(Mode::Code);
		let mut tokens = Vec::new();
		let mut i = 0;
		while i < n {
			let start = i;
			let scope = match mode {
				Mode::BlockComment => {
					consume_block_comment(&chars, &mut i, &mut mode);
					Some(BLOCK_COMMENT)
				}
				Mode::Code if at(&chars, i, "/*") => {
					i += 2;
					mode = Mode::BlockComment;
					consume_block_comment(&chars, &mut i, &mut mode);
					Some(BLOCK_COMMENT)
				}
				Mode::Code if at(&chars, i, "//") => {
					i = n;
					Some(LINE_COMMENT)
				}
				Mode::Code if chars[i] == '"' => {
					i += 1;
					while i < n && chars[i] != '"' {
						i += 1;
					}
					i = (i + 1).min(n);
					Some(STRING)
				}
				Mode::Code if at(&chars, i, "{{") => {
					i += 2;
					while i < n && !at(&chars, i, "}}") {
						i += 1;
					}
					i = (i + 2).min(n);
					Some(EMBEDDED)
				}
				Mode::Code => {
					i += 1;
					while i < n && !at(&chars, i, "/*") && !at(&chars, i, "//") && chars[i] != '"' && !at(&chars, i, "{{") {
						i += 1;
					}
					None
				}
			};
			let scopes = match scope {
				Some(inner) => ScopeStack::new([ROOT, inner]),
				None => ScopeStack::new([ROOT]),
			};
			tokens.push(RawToken::new(start, i, scopes));
		}

		Ok(LineTokenization { tokens, end_state: mode })
	}
}

/// A registry with the mock grammar registered, plus its call counter.
pub fn registry() -> (Arc<GrammarRegistry<MockGrammar>>, Arc<AtomicUsize>) {
	let config = LanguagesConfig::from_toml_str(LANGUAGES).expect("fixture config parses");
	let registry = GrammarRegistry::from_config(&config).expect("fixture languages register");
	let calls = Arc::new(AtomicUsize::new(0));
	registry.register_grammar(MockGrammar::new(calls.clone()));
	(Arc::new(registry), calls)
}

pub fn tokenizer_config() -> TokenizerConfig {
	TokenizerConfig::from_toml_str(LANGUAGES).expect("fixture tokenizer config parses")
}

pub fn document(text: &str) -> Document {
	Document::new(DocumentId(1), "mock", text)
}

/// Opens `doc` in a fresh store.
pub fn open_store(doc: &Document) -> DocumentTokenStore<MockGrammar> {
	let _ = tracing_subscriber::fmt::try_init();
	let (registry, _) = registry();
	let mut store = DocumentTokenStore::new(registry, tokenizer_config());
	store.open(doc).expect("fixture document opens");
	store
}

/// Scope-name suffixes of every token of every line, for compact comparison.
pub fn scope_summary(store: &mut DocumentTokenStore<MockGrammar>, doc: &Document) -> Vec<Vec<(String, String)>> {
	store
		.all_tokens(doc)
		.expect("tokens")
		.into_iter()
		.map(|line| {
			line.into_iter()
				.map(|token| {
					let inner = token.scopes.innermost().map(|s| s.as_str().to_string()).unwrap_or_default();
					(token.text, inner)
				})
				.collect()
		})
		.collect()
}
