use std::fmt;

/// Numeric language identifier stored in the low byte of token metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageId(pub u8);

impl LanguageId {
	/// No language.
	pub const NONE: LanguageId = LanguageId(0);
	/// Plain text; always registered and never backed by a grammar.
	pub const PLAIN_TEXT: LanguageId = LanguageId(1);
	/// First identifier handed out to registered languages.
	pub const FIRST_REGISTERED: u8 = 2;

	#[inline]
	pub fn is_none(self) -> bool {
		self == Self::NONE
	}

	#[inline]
	pub fn raw(self) -> u8 {
		self.0
	}
}

impl fmt::Display for LanguageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "lang#{}", self.0)
	}
}
