//! Token service lifecycle across several documents.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use scopeline_language::{GrammarError, GrammarRegistry, LanguagesConfig};
use scopeline_primitives::{Document, DocumentId, Position, TextChange, TextRange};
use scopeline_syntax::{TokenService, TokenizeError};
use scopeline_tokens::StandardTokenType;

use crate::common::*;

fn service() -> TokenService<MockGrammar> {
	let _ = tracing_subscriber::fmt::try_init();
	let (registry, _) = registry();
	TokenService::new(registry, tokenizer_config())
}

#[test]
fn documents_are_tokenized_independently() {
	let mut service = service();
	let a = DocumentId(1);
	let b = DocumentId(2);
	service.open(Document::new(a, "mock", "/* a")).unwrap();
	service.open(Document::new(b, "mock", "b\nc")).unwrap();

	service
		.edit(b, &[TextChange::new(TextRange::point(Position::new(0, 0)), "/*")])
		.unwrap();
	assert!(service.is_comment_at(b, Position::new(1, 0)).unwrap());
	assert!(service.is_comment_at(a, Position::new(0, 3)).unwrap());
	assert_eq!(service.document(b).unwrap().version(), 2);

	let lines = service.tokens_for_lines(b, 0..2).unwrap();
	assert_eq!(lines.len(), 2);
	assert_eq!(lines[1][0].text, "c");
	assert_eq!(service.all_tokens(a).unwrap().len(), 1);
}

#[test]
fn failing_grammar_keeps_document_open() {
	let mut service = service();
	let id = DocumentId(9);
	let err = service
		.open(Document::new(id, "mock", &format!("ok\n{FAIL_MARKER}")))
		.unwrap_err();
	assert!(matches!(err, TokenizeError::Grammar(GrammarError::TokenizeFailed { .. })));
	assert!(service.is_open(id));

	let tokens = service.line_tokens(id, 1).unwrap();
	assert_eq!(tokens.len(), 1);
	assert_eq!(tokens[0].token_type, StandardTokenType::Other);

	let clear = TextChange::new(TextRange::on_line(1, 0, FAIL_MARKER.len()), "/* fixed");
	service.edit(id, &[clear]).unwrap();
	assert!(!service.is_comment_at(id, Position::new(1, 0)).unwrap());

	service.refresh(id).unwrap();
	assert!(service.is_comment_at(id, Position::new(1, 0)).unwrap());
}

#[test]
fn grammars_load_lazily_once() {
	let config = LanguagesConfig::from_toml_str(LANGUAGES).unwrap();
	let loads = Arc::new(AtomicUsize::new(0));
	let counter = loads.clone();
	let registry = GrammarRegistry::from_config(&config).unwrap().with_loader(move |scope| {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok((scope.as_str() == ROOT).then(|| MockGrammar::new(Arc::new(AtomicUsize::new(0)))))
	});
	let mut service = TokenService::new(Arc::new(registry), tokenizer_config());

	service.open(Document::new(DocumentId(1), "mock", "// x")).unwrap();
	service.open(Document::new(DocumentId(2), "mock", "\"y\"")).unwrap();
	service.open(Document::new(DocumentId(3), "prose", "z")).unwrap();
	assert_eq!(loads.load(Ordering::SeqCst), 2);

	assert!(service.is_comment_at(DocumentId(1), Position::new(0, 0)).unwrap());
	let token = service.token_at(DocumentId(2), Position::new(0, 1)).unwrap();
	assert_eq!(token.token_type, StandardTokenType::String);
}

#[test]
fn closed_documents_are_unknown() {
	let mut service = service();
	let id = DocumentId(4);
	service.open(Document::new(id, "mock", "a")).unwrap();
	assert!(service.close(id).is_some());
	assert!(service.close(id).is_none());
	assert_eq!(
		service.edit(id, &[]),
		Err(TokenizeError::UnknownDocument(id))
	);
}
