//! Language configuration loaded from `languages.toml`.
//!
//! ```toml
//! [[language]]
//! id = "html"
//! scope-name = "text.html.basic"
//!
//! [language.embedded-languages]
//! "source.css" = "css"
//! ```
//!
//! Unknown top-level tables (such as `[tokenizer]`) are ignored here and
//! consumed by the crates that own them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading language configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to parse languages.toml: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("language {0:?} is registered twice")]
	DuplicateLanguage(String),

	#[error("embedded language {0:?} is not registered")]
	UnknownLanguage(String),

	#[error("too many languages: at most {max} can be registered")]
	TooManyLanguages { max: usize },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A single `[[language]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageDef {
	/// Language identifier (e.g. "rust", "python").
	pub id: String,
	/// Root scope of the language's grammar, if it has one.
	#[serde(default)]
	pub scope_name: Option<String>,
	/// Scope prefixes inside this language that switch to another language.
	#[serde(default)]
	pub embedded_languages: BTreeMap<String, String>,
}

/// Languages configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LanguagesConfig {
	#[serde(default, rename = "language")]
	pub languages: Vec<LanguageDef>,
}

impl LanguagesConfig {
	/// Parses configuration from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a `languages.toml` file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}
}
