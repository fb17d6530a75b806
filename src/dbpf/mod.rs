//! DBPF package parsing.
//!
//! One call per file: open a reader, decode the header, dispatch to the
//! matching index table reader, and hand back the set of identity keys. All
//! internal failure modes are normalized into the three fault kinds of
//! [`DbpfError`], and the underlying reader (file handle or mapping) is
//! released on every exit path.

pub mod format;
pub mod reader;
pub mod types;

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};

use reader::ByteReader;
pub use types::error::{DbpfError, Result};
pub use types::models::{PackageHeader, PackageVersion, ResourceKey};

/// Parses one package file and extracts its resource identity keys.
///
/// Fails fast, before any I/O, if the path does not exist or does not carry
/// the `.package` extension. The returned set contains no duplicates even
/// when the on-disk table repeats an identity, and never contains the
/// zero type/group padding marker.
///
/// # Errors
/// - [`DbpfError::NotFound`] — missing path or wrong extension
/// - [`DbpfError::InvalidFormat`] — bad magic, unsupported major version,
///   or a header too short to decode
/// - [`DbpfError::Io`] — environmental read/seek failure
pub fn parse_package(path: impl AsRef<Path>) -> Result<HashSet<ResourceKey>> {
    let path = path.as_ref();

    if !has_package_extension(path) || !path.is_file() {
        return Err(DbpfError::NotFound(path.to_path_buf()));
    }

    debug!("Opening package file: {}", path.display());
    let mut byte_reader = ByteReader::open(path)?;
    let resources = parse_reader(&mut byte_reader)?;
    info!(
        "Found {} resources in {}",
        resources.len(),
        path.display()
    );
    Ok(resources)
}

/// Runs the same parsing pipeline over an in-memory buffer.
///
/// Path existence and extension checks do not apply; everything else
/// behaves exactly as [`parse_package`].
pub fn parse_package_bytes(data: &[u8]) -> Result<HashSet<ResourceKey>> {
    let mut byte_reader = ByteReader::from_bytes(data.to_vec());
    parse_reader(&mut byte_reader)
}

fn parse_reader(byte_reader: &mut ByteReader) -> Result<HashSet<ResourceKey>> {
    let header = format::header::parse(byte_reader)?;
    debug!(
        "Package version {}.{}, {} declared entries",
        header.version, header.version_minor, header.entry_count
    );
    format::index::parse(byte_reader, &header)
}

/// True when the file name ends in `.package`, case-insensitively.
fn has_package_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("package"))
}
