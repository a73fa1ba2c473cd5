use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for cyrtype.
///
/// Subsystems report failures through the string-carrying variant that
/// names them, so `?` works across crate boundaries without a zoo of
/// per-crate error types.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CyrtypeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transliteration table error: {0}")]
    Table(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Dictionary file not found: {}", path.display())]
    DictionaryNotFound { path: PathBuf },

    #[error("Text injection error: {0}")]
    Injection(String),

    #[error("Keyboard hook error: {0}")]
    Hook(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CyrtypeError {
    fn from(err: toml::de::Error) -> Self {
        CyrtypeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CyrtypeError {
    fn from(err: toml::ser::Error) -> Self {
        CyrtypeError::Config(err.to_string())
    }
}

/// A specialized `Result` type for cyrtype operations.
pub type Result<T> = std::result::Result<T, CyrtypeError>;
