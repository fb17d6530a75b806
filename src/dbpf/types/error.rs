//! Custom error types for the dbpf-conflict crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Every fault is scoped to a single package file; a batch scan catches
/// these per file, tallies them, and keeps going.
#[derive(Debug, Error)]
pub enum DbpfError {
    /// The path does not exist or does not carry the `.package` extension.
    #[error("Not a package file: {}", .0.display())]
    NotFound(PathBuf),

    /// The file is structurally invalid: wrong magic, unsupported major
    /// version, or a header too short to contain its required fields.
    #[error("Invalid package format: {0}")]
    InvalidFormat(String),

    /// An underlying read or seek failed for environmental reasons
    /// (permissions, device error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` type alias using the crate's `DbpfError` type.
pub type Result<T> = std::result::Result<T, DbpfError>;
