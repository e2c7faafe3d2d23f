//! End-to-end token queries against the mock grammar.

use pretty_assertions::assert_eq;
use scopeline_language::LanguageId;
use scopeline_primitives::{Position, TextChange, TextRange};
use scopeline_syntax::DocumentTokenStore;
use scopeline_tokens::StandardTokenType;

use crate::common::*;

#[test]
fn line_comment_token_spans_whole_line() {
	let doc = document("// hello");
	let mut store = open_store(&doc);

	let token = store.token_at(&doc, Position::new(0, 3)).unwrap();
	assert_eq!(token.token_type, StandardTokenType::Comment);
	assert_eq!(token.range, TextRange::on_line(0, 0, 8));
	assert_eq!(token.text, "// hello");
	assert_eq!(token.scopes.innermost().unwrap().as_str(), LINE_COMMENT);
	assert!(store.is_comment_at(&doc, Position::new(0, 0)).unwrap());
}

#[test]
fn split_line_shifts_following_lines() {
	let mut doc = document("int a;\nint b = 1;\n/* c */");
	let mut store = open_store(&doc);
	let before = scope_summary(&mut store, &doc);

	let changes = [TextChange::new(TextRange::point(Position::new(1, 5)), "\n")];
	doc.apply_changes(&changes);
	store.on_edit(&doc, &changes).unwrap();

	assert_eq!(store.line_count(), 4);
	let after = scope_summary(&mut store, &doc);
	assert_eq!(after[3], before[2]);
	assert_eq!(after[1], vec![("int b".to_string(), ROOT.to_string())]);
	assert_eq!(after[2], vec![(" = 1;".to_string(), ROOT.to_string())]);

	let mut fresh = open_store(&doc);
	assert_eq!(after, scope_summary(&mut fresh, &doc));
	assert_eq!(store.stats().cascades, 1);
}

#[test]
fn oversized_line_is_one_default_token() {
	let long = "x".repeat(50_000);
	let doc = document(&format!("/* open\n{long}\nstill */ done"));
	let (registry, _) = registry();
	let mut store = DocumentTokenStore::new(registry, Default::default());
	store.open(&doc).unwrap();

	let tokens = store.line_tokens(&doc, 1).unwrap();
	assert_eq!(tokens.len(), 1);
	assert_eq!(tokens[0].range, TextRange::on_line(1, 0, 50_000));
	assert_eq!(tokens[0].token_type, StandardTokenType::Other);
	assert_eq!(store.stats().lines_skipped, 1);

	// The skipped line passes the open comment through to the next line.
	let next = store.token_at(&doc, Position::new(2, 0)).unwrap();
	assert_eq!(next.token_type, StandardTokenType::Comment);
	assert_eq!(next.text, "still */");
}

#[test]
fn fixture_limit_skips_moderate_lines() {
	let doc = document(&"y".repeat(121));
	let mut store = open_store(&doc);
	assert_eq!(store.stats().lines_skipped, 1);
	assert_eq!(store.line_tokens(&doc, 0).unwrap().len(), 1);
}

#[test]
fn tokens_of_mixed_line() {
	let doc = document(r#"let s = "hi"; // done"#);
	let mut store = open_store(&doc);
	let tokens = store.line_tokens(&doc, 0).unwrap();
	let types: Vec<_> = tokens.iter().map(|t| (t.text.as_str(), t.token_type)).collect();
	assert_eq!(
		types,
		vec![
			("let s = ", StandardTokenType::Other),
			("\"hi\"", StandardTokenType::String),
			("; ", StandardTokenType::Other),
			("// done", StandardTokenType::Comment),
		]
	);
	let line = store.line_token_array(&doc, 0).unwrap().unwrap();
	assert_eq!(line.find_ranges_of(StandardTokenType::Comment), vec![14..21]);
}

#[test]
fn embedded_region_has_its_own_language() {
	let doc = document("a {{ guest }} b");
	let mut store = open_store(&doc);
	let host = store.language_id();
	let (registry, _) = registry();
	let guest = registry.language_id("guest");
	assert_ne!(host, guest);

	let token = store.token_at(&doc, Position::new(0, 5)).unwrap();
	assert_eq!(token.language_id(), guest);
	assert_eq!(token.token_type, StandardTokenType::Other);

	let scoped = store.scoped_tokens_at(&doc, Position::new(0, 5)).unwrap().unwrap();
	assert_eq!(scoped.language_id(), guest);
	assert_eq!(scoped.line_content(), "{{ guest }}");
	assert_eq!(scoped.first_char_offset(), 2);
	assert_eq!(scoped.token_count(), 1);

	let outer = store.scoped_tokens_at(&doc, Position::new(0, 0)).unwrap().unwrap();
	assert_eq!(outer.language_id(), host);
	assert_eq!(outer.line_content(), "a ");
}

#[test]
fn language_without_grammar_gets_defaults() {
	let (registry, calls) = registry();
	let mut store = DocumentTokenStore::new(registry, tokenizer_config());
	let doc = scopeline_primitives::Document::new(scopeline_primitives::DocumentId(4), "prose", "/* not parsed");
	store.open(&doc).unwrap();

	assert!(!store.has_grammar());
	let token = store.token_at(&doc, Position::new(0, 4)).unwrap();
	assert_eq!(token.token_type, StandardTokenType::Other);
	assert_eq!(token.range, TextRange::on_line(0, 0, 13));
	assert!(token.scopes.is_empty());
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

	let unknown = scopeline_primitives::Document::new(scopeline_primitives::DocumentId(5), "cobol", "x");
	store.open(&unknown).unwrap();
	assert_eq!(store.language_id(), LanguageId::NONE);
	assert_eq!(store.line_tokens(&unknown, 0).unwrap().len(), 1);
}
