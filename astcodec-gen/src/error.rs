use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error on '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse Rust source '{file}': {source}")]
    SourceParseError { file: String, source: syn::Error },

    #[error("Failed to parse manifest file '{file}': {source}")]
    ManifestParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize manifest: {0}")]
    ManifestWriteError(#[from] toml::ser::Error),

    #[error("Manifest '{file}' has version {found}, this generator understands version {expected}")]
    ManifestVersion {
        file: String,
        found: u32,
        expected: u32,
    },

    #[error("Invalid {what} '{text}': {source}")]
    InvalidSyntax {
        what: &'static str,
        text: String,
        source: syn::Error,
    },

    #[error("Type '{0}' is neither a built-in nor a struct of the input sources")]
    UnknownType(String),

    #[error("Unsupported type '{ty}': {reason}")]
    UnsupportedType { ty: String, reason: String },

    #[error("Struct '{0}' is defined more than once in the input sources")]
    DuplicateStruct(String),
}

pub type GenResult<T> = Result<T, GenError>;
