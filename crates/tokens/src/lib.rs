//! Token representation shared by the token cache and its consumers.
//!
//! * [`metadata`]: 32-bit packed per-token metadata and its accessors
//! * [`classify`]: scope stack to [`StandardTokenType`] mapping and scope selectors
//! * [`line_tokens`]: [`LineTokenArray`], the immutable token partition of one line
//! * [`scoped`]: [`ScopedLineTokens`], a same-language window over a line

pub mod classify;
pub mod line_tokens;
pub mod metadata;
pub mod scoped;

pub use classify::{ScopeSelector, StandardTokenType, classify, match_scope};
pub use line_tokens::{LineTokenArray, TokenArrayError, to_end_offset_form};
pub use metadata::{COLOR_NONE, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, FontStyle, TokenMetadata};
pub use scoped::ScopedLineTokens;
