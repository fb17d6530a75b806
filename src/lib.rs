//! # dbpf-conflict
//!
//! Extracts resource identity keys from DBPF package files (versions 1.x
//! and 2.x) and detects identical keys recurring across a content library,
//! the signal that two files silently override the same content.
//!
//! **Note:** the companion scripted-content container (`.ts4script`) is not
//! supported; resource payloads are never decompressed or interpreted.
pub mod conflict;
pub mod dbpf;
pub mod report;
pub mod scan;

// Re-export the main types for convenience
pub use conflict::{find_conflicts, find_conflicts_by_type, ConflictMap};
pub use dbpf::{parse_package, parse_package_bytes, DbpfError, ResourceKey, Result};
pub use scan::{discover_packages, scan_directory, scan_files, ScanOutcome};
