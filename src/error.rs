//! Error types shared by the model loader, the walker and the renderers.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of a documentation run.
///
/// Declarations that are simply not documented (plain variables,
/// interfaces, type aliases, literals) are not errors and never reach
/// this type; they are logged and skipped.
#[derive(Error, Debug)]
pub enum DocError {
    #[error("root module not found: {0}")]
    ModuleNotFound(String),

    #[error("symbol '{0}' has no declarations")]
    NoDeclarations(String),

    #[error("unsupported declaration kind '{kind}' for '{name}'")]
    UnsupportedDeclaration { kind: String, name: String },

    #[error("callable declaration '{0}' has no call signature")]
    MissingSignature(String),

    #[error("{file} has uncommitted changes; commit before generating source links")]
    UncommittedChanges { file: String },

    #[error("source link for {file} is unreachable: {url} ({reason})")]
    UnreachableLink {
        file: String,
        url: String,
        reason: String,
    },

    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    #[error("{kind} '{key}' referenced from '{from}' is not defined")]
    UnknownReference {
        kind: &'static str,
        key: String,
        from: String,
    },

    #[error("{kind} '{key}' is defined more than once")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("alias cycle through symbol '{0}'")]
    AliasCycle(String),

    #[error("invalid semantic graph {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;
