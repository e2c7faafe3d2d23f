//! Tokenizer settings read from the `[tokenizer]` table of `languages.toml`.
//!
//! ```toml
//! [tokenizer]
//! max-line-length = 20000
//! ```

use scopeline_language::config::Result;
use serde::Deserialize;

/// Lines longer than this many chars are skipped by default.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 20_000;

/// Settings shared by every document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TokenizerConfig {
	/// Lines longer than this (in chars) get a single default token instead
	/// of being handed to the grammar.
	pub max_line_length: usize,
}

impl Default for TokenizerConfig {
	fn default() -> Self {
		Self {
			max_line_length: DEFAULT_MAX_LINE_LENGTH,
		}
	}
}

#[derive(Deserialize)]
struct ConfigFile {
	#[serde(default)]
	tokenizer: TokenizerConfig,
}

impl TokenizerConfig {
	/// Reads the `[tokenizer]` table of a `languages.toml` document.
	///
	/// Other tables are ignored; a missing table yields the defaults.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let file: ConfigFile = toml::from_str(text)?;
		Ok(file.tokenizer)
	}
}
