//! Input errors raised at the corpus / JSON boundary.
//!
//! Analysis and synthesis never fail on well-formed input; anything that does
//! fail is one of these and aborts the current invocation.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Source file or directory does not exist.
    #[error("not found: {0:?}")]
    NotFound(PathBuf),

    /// Path exists but is neither a regular file nor a directory.
    #[error("invalid path: {0:?}")]
    InvalidPath(PathBuf),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Corrupt or mis-shaped JSON from a prior stage.
    #[error("malformed JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl InputError {
    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        let err = InputError::NotFound(PathBuf::from("/tmp/missing.md"));
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("missing.md"));

        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = InputError::json("analysis.json", source);
        assert!(err.to_string().starts_with("malformed JSON"));
    }
}
