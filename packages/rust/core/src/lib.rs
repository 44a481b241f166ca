//! Search orchestration for the Handelsregister toolkit.
//!
//! Ties a [`RegisterSource`] to the result-page parser and the document field
//! extractor, with an on-disk [`ResultCache`] in front of the source.

pub mod cache;
pub mod pipeline;
pub mod render;
pub mod source;

pub use cache::ResultCache;
pub use pipeline::{ProgressReporter, SearchOutcome, SilentProgress, search};
pub use source::{LocalSource, RegisterSource, pdf_text};
