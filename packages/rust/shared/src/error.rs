//! Error types for the Handelsregister toolkit.
//!
//! Library crates use [`RegisterError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all register operations.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The register collaborator could not deliver a result page.
    #[error("source error: {0}")]
    Source(String),

    /// A disclosure document could not be retrieved or read.
    #[error("document error: {0}")]
    Document(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON/TOML serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RegisterError>;

impl RegisterError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for RegisterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = RegisterError::config("unknown search option");
        assert_eq!(err.to_string(), "config error: unknown search option");

        let err = RegisterError::Source("no saved result page for 'gasag'".into());
        assert!(err.to_string().contains("gasag"));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = RegisterError::io(
            "/tmp/missing.html",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("missing.html"));
    }
}
