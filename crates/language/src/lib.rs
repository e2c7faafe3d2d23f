//! Language metadata and the scope-grammar engine boundary.
//!
//! # Architecture
//!
//! * [`grammar`]: The [`Grammar`] contract an external engine implements
//! * [`scope`]: Scope names and scope stacks attached to raw tokens
//! * [`ids`]: Numeric language identifiers packed into token metadata
//! * [`config`]: `languages.toml` configuration
//! * [`registry`]: [`GrammarRegistry`], mapping language identifiers to
//!   scope names and scope names to loaded grammars
//!
//! Grammars are looked up through an explicit registry value that callers
//! construct and pass to each token store.

pub mod config;
pub mod grammar;
pub mod ids;
pub mod registry;
pub mod scope;

pub use config::{ConfigError, LanguageDef, LanguagesConfig};
pub use grammar::{Grammar, GrammarError, LexerState, LineTokenization, RawToken};
pub use ids::LanguageId;
pub use registry::GrammarRegistry;
pub use scope::{ScopeName, ScopeStack};
