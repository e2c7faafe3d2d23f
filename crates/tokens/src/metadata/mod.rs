//! Packed per-token metadata.
//!
//! Each token carries a 32-bit word laid out low bit to high bit:
//!
//! ```text
//! bits  0..=7   language id          (8)
//! bits  8..=9   standard token type  (2)
//! bit   10      balanced brackets    (1)
//! bits 11..=14  font style           (4)
//! bits 15..=23  foreground color id  (9)
//! bits 24..=31  background color id  (8)
//! ```
//!
//! Every accessor masks, so stray bits in a malformed word are ignored
//! rather than leaking into neighbouring fields.

use std::fmt;

use bitflags::bitflags;
use scopeline_language::LanguageId;

use crate::classify::StandardTokenType;

const LANGUAGE_ID_MASK: u32 = 0b0000_0000_0000_0000_0000_0000_1111_1111;
const TOKEN_TYPE_MASK: u32 = 0b0000_0000_0000_0000_0000_0011_0000_0000;
const BALANCED_BRACKETS_MASK: u32 = 0b0000_0000_0000_0000_0000_0100_0000_0000;
const FONT_STYLE_MASK: u32 = 0b0000_0000_0000_0000_0111_1000_0000_0000;
const FOREGROUND_MASK: u32 = 0b0000_0000_1111_1111_1000_0000_0000_0000;
const BACKGROUND_MASK: u32 = 0b1111_1111_0000_0000_0000_0000_0000_0000;

const LANGUAGE_ID_OFFSET: u32 = 0;
const TOKEN_TYPE_OFFSET: u32 = 8;
const BALANCED_BRACKETS_OFFSET: u32 = 10;
const FONT_STYLE_OFFSET: u32 = 11;
const FOREGROUND_OFFSET: u32 = 15;
const BACKGROUND_OFFSET: u32 = 24;

/// Color id meaning "no color".
pub const COLOR_NONE: u16 = 0;
/// Color id of the default foreground.
pub const DEFAULT_FOREGROUND: u16 = 1;
/// Color id of the default background.
pub const DEFAULT_BACKGROUND: u16 = 2;

bitflags! {
	/// Font style flags.
	///
	/// `OVERLINE` exists for parity with theme definitions but has no slot in
	/// the packed word; packing silently drops it.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct FontStyle: u8 {
		const ITALIC = 1;
		const BOLD = 2;
		const UNDERLINE = 4;
		const STRIKETHROUGH = 8;
		const OVERLINE = 16;
	}
}

impl FontStyle {
	/// Styles representable in packed metadata.
	pub const PACKABLE: FontStyle = FontStyle::ITALIC
		.union(FontStyle::BOLD)
		.union(FontStyle::UNDERLINE)
		.union(FontStyle::STRIKETHROUGH);
}

/// A packed token metadata word.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TokenMetadata(pub u32);

impl TokenMetadata {
	/// Packs all fields. Values wider than their slot are truncated.
	pub const fn pack(
		language_id: LanguageId,
		token_type: StandardTokenType,
		font_style: FontStyle,
		balanced_brackets: bool,
		foreground: u16,
		background: u16,
	) -> Self {
		let bits = ((language_id.0 as u32) << LANGUAGE_ID_OFFSET) & LANGUAGE_ID_MASK
			| (token_type.bits() << TOKEN_TYPE_OFFSET) & TOKEN_TYPE_MASK
			| ((balanced_brackets as u32) << BALANCED_BRACKETS_OFFSET) & BALANCED_BRACKETS_MASK
			| ((font_style.bits() as u32) << FONT_STYLE_OFFSET) & FONT_STYLE_MASK
			| ((foreground as u32) << FOREGROUND_OFFSET) & FOREGROUND_MASK
			| ((background as u32) << BACKGROUND_OFFSET) & BACKGROUND_MASK;
		Self(bits)
	}

	/// Best-guess metadata used when no grammar is available.
	pub const fn default_for(language_id: LanguageId) -> Self {
		Self::pack(
			language_id,
			StandardTokenType::Other,
			FontStyle::empty(),
			true,
			DEFAULT_FOREGROUND,
			DEFAULT_BACKGROUND,
		)
	}

	#[inline]
	pub const fn bits(self) -> u32 {
		self.0
	}

	#[inline]
	pub const fn language_id(self) -> LanguageId {
		LanguageId(((self.0 & LANGUAGE_ID_MASK) >> LANGUAGE_ID_OFFSET) as u8)
	}

	#[inline]
	pub const fn token_type(self) -> StandardTokenType {
		StandardTokenType::from_bits((self.0 & TOKEN_TYPE_MASK) >> TOKEN_TYPE_OFFSET)
	}

	#[inline]
	pub const fn contains_balanced_brackets(self) -> bool {
		self.0 & BALANCED_BRACKETS_MASK != 0
	}

	#[inline]
	pub const fn font_style(self) -> FontStyle {
		FontStyle::from_bits_truncate(((self.0 & FONT_STYLE_MASK) >> FONT_STYLE_OFFSET) as u8)
	}

	#[inline]
	pub const fn foreground(self) -> u16 {
		((self.0 & FOREGROUND_MASK) >> FOREGROUND_OFFSET) as u16
	}

	#[inline]
	pub const fn background(self) -> u16 {
		((self.0 & BACKGROUND_MASK) >> BACKGROUND_OFFSET) as u16
	}

	/// Returns a copy with the language id replaced.
	pub const fn with_language_id(self, language_id: LanguageId) -> Self {
		Self((self.0 & !LANGUAGE_ID_MASK) | ((language_id.0 as u32) << LANGUAGE_ID_OFFSET))
	}

	/// Returns a copy with the token type replaced.
	pub const fn with_token_type(self, token_type: StandardTokenType) -> Self {
		Self((self.0 & !TOKEN_TYPE_MASK) | (token_type.bits() << TOKEN_TYPE_OFFSET))
	}

	/// CSS class list for renderers: `mtk{fg}` plus one class per font style.
	pub fn class_name(self) -> String {
		let mut class = format!("mtk{}", self.foreground());
		let style = self.font_style();
		if style.contains(FontStyle::ITALIC) {
			class.push_str(" mtki");
		}
		if style.contains(FontStyle::BOLD) {
			class.push_str(" mtkb");
		}
		if style.contains(FontStyle::UNDERLINE) {
			class.push_str(" mtku");
		}
		if style.contains(FontStyle::STRIKETHROUGH) {
			class.push_str(" mtks");
		}
		class
	}

	/// Inline CSS for renderers that cannot use class names.
	///
	/// `color_map` is indexed by foreground color id; ids outside the map
	/// produce no `color` declaration.
	pub fn inline_style<S: AsRef<str>>(self, color_map: &[S]) -> String {
		let mut css = String::new();
		if let Some(color) = color_map.get(self.foreground() as usize) {
			css.push_str("color: ");
			css.push_str(color.as_ref());
			css.push(';');
		}

		let style = self.font_style();
		if style.contains(FontStyle::ITALIC) {
			css.push_str("font-style: italic;");
		}
		if style.contains(FontStyle::BOLD) {
			css.push_str("font-weight: bold;");
		}
		let decoration = match (style.contains(FontStyle::UNDERLINE), style.contains(FontStyle::STRIKETHROUGH)) {
			(true, true) => Some("underline line-through"),
			(true, false) => Some("underline"),
			(false, true) => Some("line-through"),
			(false, false) => None,
		};
		if let Some(decoration) = decoration {
			css.push_str("text-decoration: ");
			css.push_str(decoration);
			css.push(';');
		}
		css
	}
}

impl From<u32> for TokenMetadata {
	fn from(bits: u32) -> Self {
		Self(bits)
	}
}

impl From<TokenMetadata> for u32 {
	fn from(metadata: TokenMetadata) -> Self {
		metadata.0
	}
}

impl fmt::Debug for TokenMetadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenMetadata")
			.field("language_id", &self.language_id().raw())
			.field("token_type", &self.token_type())
			.field("balanced_brackets", &self.contains_balanced_brackets())
			.field("font_style", &self.font_style())
			.field("foreground", &self.foreground())
			.field("background", &self.background())
			.finish()
	}
}
