use scopeline_language::GrammarError;
use scopeline_primitives::DocumentId;
use scopeline_tokens::TokenArrayError;
use thiserror::Error;

/// Errors surfaced by token stores and the token service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
	/// The grammar engine failed; the document falls back to default tokens
	/// until a refresh succeeds.
	#[error(transparent)]
	Grammar(#[from] GrammarError),

	/// Grammar output could not be turned into a valid token partition.
	#[error("invalid tokens: {0}")]
	TokenArray(#[from] TokenArrayError),

	#[error("document {0} is not open")]
	UnknownDocument(DocumentId),
}

/// Result type for tokenization operations.
pub type Result<T> = std::result::Result<T, TokenizeError>;
