//! Scope stack classification and scope selectors.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

/// Coarse token category used by comment detection, bracket matching and
/// auto-closing logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum StandardTokenType {
	#[default]
	Other = 0,
	Comment = 1,
	String = 2,
	RegEx = 3,
}

impl StandardTokenType {
	/// All variants in bit order.
	pub const ALL: [StandardTokenType; 4] = [Self::Other, Self::Comment, Self::String, Self::RegEx];

	/// Decodes the two low bits of `bits`.
	#[inline]
	pub const fn from_bits(bits: u32) -> Self {
		match bits & 0b11 {
			1 => Self::Comment,
			2 => Self::String,
			3 => Self::RegEx,
			_ => Self::Other,
		}
	}

	#[inline]
	pub const fn bits(self) -> u32 {
		self as u32
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Other => "other",
			Self::Comment => "comment",
			Self::String => "string",
			Self::RegEx => "regex",
		}
	}
}

impl fmt::Display for StandardTokenType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

static STANDARD_TOKEN_TYPE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b(comment|string|regex|regexp|meta\.embedded)\b").expect("standard token type pattern is valid"));

/// Classifies a scope stack.
///
/// The scopes are joined with single spaces and searched for the first
/// whole-word occurrence of `comment`, `string`, `regex`, `regexp` or
/// `meta.embedded`. Embedded regions classify as [`StandardTokenType::Other`]
/// so their content is not treated as a comment or string of the host.
pub fn classify<S: AsRef<str>>(scopes: &[S]) -> StandardTokenType {
	match scopes {
		[] => StandardTokenType::Other,
		[single] => classify_scope(single.as_ref()),
		_ => {
			let joined = scopes.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
			classify_scope(&joined)
		}
	}
}

/// Classifies a single scope string (possibly several space-separated scopes).
pub fn classify_scope(scope: &str) -> StandardTokenType {
	let Some(m) = STANDARD_TOKEN_TYPE.find(scope) else {
		return StandardTokenType::Other;
	};
	match m.as_str() {
		"comment" => StandardTokenType::Comment,
		"string" => StandardTokenType::String,
		"regex" | "regexp" => StandardTokenType::RegEx,
		_ => StandardTokenType::Other,
	}
}

/// A pre-split scope selector such as `"source.js string"`.
///
/// Matching is an ordered subsequence prefix test: every part must be a
/// prefix of some scope, in order, with non-matching scopes skipped. There
/// is no negation and no child/descendant distinction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSelector {
	parts: SmallVec<[Box<str>; 4]>,
}

impl ScopeSelector {
	pub fn parse(selector: &str) -> Self {
		Self {
			parts: selector.split_whitespace().map(Box::from).collect(),
		}
	}

	/// An empty selector matches every scope stack.
	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}

	pub fn matches<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
		let mut remaining = scopes.iter();
		'parts: for part in &self.parts {
			for scope in remaining.by_ref() {
				if scope.as_ref().starts_with(&**part) {
					continue 'parts;
				}
			}
			return false;
		}
		true
	}
}

/// Tests a scope stack against a space-separated selector.
pub fn match_scope<S: AsRef<str>>(selector: &str, scopes: &[S]) -> bool {
	ScopeSelector::parse(selector).matches(scopes)
}
