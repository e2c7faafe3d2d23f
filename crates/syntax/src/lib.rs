//! Incremental token cache for open documents.
//!
//! # Architecture
//!
//! * [`store`]: [`DocumentTokenStore`], the per-document line cache and its
//!   edit-driven re-tokenization
//! * [`service`]: [`TokenService`], owning documents and their stores by [`DocumentId`]
//! * [`config`]: [`TokenizerConfig`] read from `languages.toml`
//!
//! Every query validates the lines it reads against the live document before
//! answering, so results never reflect text the cache has not seen.
//!
//! [`DocumentId`]: scopeline_primitives::DocumentId

pub mod config;
mod error;
mod info;
pub mod service;
mod stats;
pub mod store;

pub use config::{DEFAULT_MAX_LINE_LENGTH, TokenizerConfig};
pub use error::{Result, TokenizeError};
pub use info::TokenInfo;
pub use service::TokenService;
pub use stats::TokenizeStats;
pub use store::DocumentTokenStore;
