use scopeline_language::{LanguageId, ScopeStack};
use scopeline_primitives::{Position, TextRange};
use scopeline_tokens::{LineTokenArray, StandardTokenType, TokenMetadata};

/// A resolved token as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
	/// Document range of the token; always on a single line.
	pub range: TextRange,
	pub text: String,
	/// Scopes reported by the grammar, outermost first. Empty for default tokens.
	pub scopes: ScopeStack,
	pub token_type: StandardTokenType,
	pub metadata: TokenMetadata,
}

impl TokenInfo {
	/// Builds the info for token `index` of `tokens` on document line `line`.
	pub(crate) fn from_line(line: usize, tokens: &LineTokenArray, scopes: &[ScopeStack], index: usize) -> Self {
		let metadata = tokens.metadata(index);
		Self {
			range: TextRange::on_line(line, tokens.start_offset(index), tokens.end_offset(index)),
			text: tokens.token_text(index).to_string(),
			scopes: scopes.get(index).cloned().unwrap_or_default(),
			token_type: metadata.token_type(),
			metadata,
		}
	}

	/// The empty token returned for positions outside the document.
	pub(crate) fn empty_at(position: Position, language_id: LanguageId) -> Self {
		Self {
			range: TextRange::point(position),
			text: String::new(),
			scopes: ScopeStack::default(),
			token_type: StandardTokenType::Other,
			metadata: TokenMetadata::default_for(language_id),
		}
	}

	pub fn language_id(&self) -> LanguageId {
		self.metadata.language_id()
	}

	pub fn is_comment(&self) -> bool {
		self.token_type == StandardTokenType::Comment
	}
}
