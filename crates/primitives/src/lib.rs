//! Core types for addressing and editing line-oriented text.

/// Content changes delivered by the edit stream.
pub mod change;
/// Rope-backed documents and the read-only line access trait.
pub mod document;
/// Identifier types for open documents.
pub mod ids;
/// Line/character positions and ranges.
pub mod position;
/// Rope utilities and extensions.
pub mod rope;

pub use change::{TextChange, count_newlines, sort_changes};
pub use document::{Document, DocumentSource};
pub use ids::DocumentId;
pub use position::{Position, TextRange};
pub use rope::{line_len_without_ending, line_text_without_ending, visible_line_count};
pub use ropey::{Rope, RopeSlice};
