//! Incremental results must always equal a full re-parse.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scopeline_primitives::{Document, Position, TextChange, TextRange};
use scopeline_syntax::DocumentTokenStore;
use scopeline_tokens::StandardTokenType;

use crate::common::*;

fn apply(store: &mut DocumentTokenStore<MockGrammar>, doc: &mut Document, changes: &[TextChange]) {
	doc.apply_changes(changes);
	store.on_edit(&*doc, changes).unwrap();
}

fn assert_matches_fresh(store: &mut DocumentTokenStore<MockGrammar>, doc: &Document) {
	let mut fresh = open_store(doc);
	assert_eq!(scope_summary(store, doc), scope_summary(&mut fresh, doc));
}

#[test]
fn opening_a_block_comment_recolors_everything_below() {
	let mut doc = document("a\nb\nc\nd");
	let mut store = open_store(&doc);
	assert!(!store.is_comment_at(&doc, Position::new(3, 0)).unwrap());

	apply(&mut store, &mut doc, &[TextChange::new(TextRange::point(Position::new(0, 1)), " /*")]);
	for line in 1..4 {
		assert!(store.is_comment_at(&doc, Position::new(line, 0)).unwrap(), "line {line}");
	}
	assert_eq!(store.stats().cascades, 1);

	apply(&mut store, &mut doc, &[TextChange::new(TextRange::point(Position::new(1, 1)), "*/")]);
	assert!(store.is_comment_at(&doc, Position::new(1, 0)).unwrap());
	assert!(!store.is_comment_at(&doc, Position::new(2, 0)).unwrap());
	assert_eq!(store.stats().cascades, 2);
	assert_matches_fresh(&mut store, &doc);
}

#[test]
fn edit_inside_comment_does_not_cascade() {
	let mut doc = document("/* one\ntwo\nthree */\nfour");
	let mut store = open_store(&doc);
	let before = store.stats();

	apply(&mut store, &mut doc, &[TextChange::new(TextRange::on_line(1, 0, 3), "2")]);
	let work = store.stats().since(&before);
	assert_eq!(work.lines_tokenized, 1);
	assert_eq!(work.cascades, 0);
	assert_eq!(store.token_type_at(&doc, Position::new(1, 0)).unwrap(), StandardTokenType::Comment);
	assert_matches_fresh(&mut store, &doc);
}

#[test]
fn joining_lines_cascades() {
	let mut doc = document("x = 1;\n/* a */\ny = 2;");
	let mut store = open_store(&doc);

	let join = TextChange::new(TextRange::new(Position::new(0, 6), Position::new(1, 0)), " ");
	apply(&mut store, &mut doc, &[join]);
	assert_eq!(store.line_count(), 2);
	assert_eq!(store.stats().cascades, 1);
	assert_matches_fresh(&mut store, &doc);
}

#[test]
fn untracked_text_change_is_picked_up_on_query() {
	let mut doc = document("a\nb\nc");
	let mut store = open_store(&doc);

	doc.replace_untracked("/*\nb\nc");
	assert!(store.is_comment_at(&doc, Position::new(0, 0)).unwrap());
	assert!(store.is_comment_at(&doc, Position::new(2, 0)).unwrap());
	assert_eq!(store.stats().refreshes, 1);

	doc.replace_untracked("/*\nb\nc\n*/ d");
	store.validate_document(&doc).unwrap();
	assert_eq!(store.stats().refreshes, 2);
	assert_matches_fresh(&mut store, &doc);
}

fn arb_line() -> impl Strategy<Value = String> {
	prop::collection::vec(prop::sample::select(vec!["a", " ", "/*", "*/", "//", "\"", "{{", "}}"]), 0..6)
		.prop_map(|parts| parts.concat())
}

fn arb_change() -> impl Strategy<Value = (usize, usize, usize, usize, String)> {
	(
		0usize..10,
		0usize..8,
		0usize..2,
		0usize..8,
		prop::collection::vec(prop::sample::select(vec!["a", "/*", "*/", "\n", "\"", "//"]), 0..3)
			.prop_map(|parts| parts.concat()),
	)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn incremental_edits_match_full_parse(
		lines in prop::collection::vec(arb_line(), 1..8),
		changes in prop::collection::vec(arb_change(), 1..6),
	) {
		let mut doc = document(&lines.join("\n"));
		let mut store = open_store(&doc);
		for (line, start, span, end, text) in changes {
			let line_count = doc.text().len_lines();
			let start_line = line % line_count;
			let end_line = (start_line + span).min(line_count - 1);
			let range = if end_line == start_line {
				TextRange::on_line(start_line, start, start + end)
			} else {
				TextRange::new(Position::new(start_line, start), Position::new(end_line, end))
			};
			apply(&mut store, &mut doc, &[TextChange::new(range, text)]);
			assert_matches_fresh(&mut store, &doc);
		}
	}
}
