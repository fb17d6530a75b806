//! # Index Table Dispatcher
//!
//! Entry point for decoding the resource index of a package file. Dispatches
//! to the version-specific reader selected during header parsing.

use std::collections::HashSet;

use crate::dbpf::reader::ByteReader;
use crate::dbpf::types::error::Result;
use crate::dbpf::types::models::{PackageHeader, PackageVersion, ResourceKey};

pub mod v1;
pub mod v2;

/// Size of one v2 index entry: 16 identity bytes + 12 location/size bytes
/// + 4 compression-flag bytes.
pub const INDEX_ENTRY_SIZE: u64 = 28;

/// Identity portion of a v1 entry: type + group + instance halves.
pub const V1_ENTRY_KEY_SIZE: usize = 16;

/// Trailing storage metadata of a v1 entry, read past and ignored.
pub const V1_ENTRY_TRAILER_SIZE: usize = 16;

/// Upper bound on entries decoded from one file, whatever the header
/// claims. Real packages stay far below this; a corrupt count cannot push
/// a single file's work past it.
pub const MAX_INDEX_ENTRIES: u64 = 10_000;

/// Decodes the index table for the layout resolved by the header decoder.
pub fn parse(reader: &mut ByteReader, header: &PackageHeader) -> Result<HashSet<ResourceKey>> {
    match header.version {
        PackageVersion::V2 => v2::parse(reader, header),
        PackageVersion::V1 => v1::parse(reader, header),
    }
}
