//! Shared types, error model, and configuration for the Handelsregister toolkit.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`RegisterError`] — the unified error type
//! - Domain types ([`CompanyRecord`], [`DocumentLink`], [`ExtractedFields`], [`Person`])
//! - Configuration ([`AppConfig`], [`SearchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CacheConfig, DocumentsConfig, SearchConfig, SearchDefaults, SourceConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{RegisterError, Result};
pub use types::{
    CompanyRecord, DocumentLink, ExtractedFields, Person, SEARCH_OPTION_CODES, SearchOption,
};
