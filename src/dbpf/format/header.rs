//! DBPF header parsing and layout dispatch.
//!
//! Header structure (all fields little-endian):
//! ```text
//! [4 bytes]  Magic "DBPF"
//! [2 bytes]  Major version
//! [2 bytes]  Minor version
//! ... version-specific fields, see below ...
//! ```
//!
//! v2 packages carry a fixed 96-byte header with the index entry count at
//! byte offset 32 and the index table offset at byte offset 64. v1 packages
//! store the entry count at fixed offset 36 and place the index table at
//! fixed offset 84, with no header-embedded pointer. Every other header byte
//! is read to preserve the stream position and discarded.

use std::io::{Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use log::{debug, trace};

use crate::dbpf::reader::ByteReader;
use crate::dbpf::types::error::{DbpfError, Result};
use crate::dbpf::types::models::{PackageHeader, PackageVersion};

/// Magic signature at offset 0 of every package file.
pub const MAGIC: [u8; 4] = *b"DBPF";

/// Total size of the v2 fixed header, including reserved bytes.
pub const HEADER_SIZE: u64 = 96;

// v2 field offsets, relative to the start of the file.
const V2_INDEX_COUNT_OFFSET: usize = 32;
const V2_INDEX_OFFSET_OFFSET: usize = 64;

// v1 fixed locations, relative to the start of the file.
const V1_INDEX_COUNT_OFFSET: u64 = 36;
const V1_INDEX_TABLE_OFFSET: u64 = 84;

/// Parses the package header from a reader positioned at offset 0.
///
/// Validates the magic signature, reads the version fields, and resolves
/// the layout variant exactly once; the index readers dispatch on the
/// returned tag. A header too short to contain its required fields is an
/// `InvalidFormat` fault, not an I/O error.
pub fn parse(reader: &mut ByteReader) -> Result<PackageHeader> {
    let mut magic = [0u8; 4];
    let got = reader.read_up_to(4)?;
    if got.len() < 4 {
        return Err(DbpfError::InvalidFormat(
            "File too short to contain a DBPF header".to_string(),
        ));
    }
    magic.copy_from_slice(&got);
    if magic != MAGIC {
        return Err(DbpfError::InvalidFormat(
            "Expected 'DBPF' signature".to_string(),
        ));
    }

    let version_major = read_header_u16(reader, "version")?;
    let version_minor = read_header_u16(reader, "version")?;
    let version = PackageVersion::try_from(version_major)?;
    trace!("DBPF version {}.{}", version_major, version_minor);

    match version {
        PackageVersion::V2 => parse_v2(reader, version_minor),
        PackageVersion::V1 => parse_v1(reader, version_minor),
    }
}

/// v2: consume the remainder of the fixed 96-byte header and pull the two
/// fields the scanner needs out of it at their documented offsets.
fn parse_v2(reader: &mut ByteReader, version_minor: u16) -> Result<PackageHeader> {
    // Magic and version are already consumed.
    let rest = reader.read_up_to(HEADER_SIZE as usize - 8)?;
    if rest.len() < HEADER_SIZE as usize - 8 {
        return Err(DbpfError::InvalidFormat(format!(
            "Header truncated: expected {} bytes, got {}",
            HEADER_SIZE,
            rest.len() + 8
        )));
    }

    let entry_count = LittleEndian::read_u32(&rest[V2_INDEX_COUNT_OFFSET - 8..]);
    let index_offset = LittleEndian::read_u32(&rest[V2_INDEX_OFFSET_OFFSET - 8..]);
    debug!(
        "v2 header: {} declared entries, index at {:#010x}",
        entry_count, index_offset
    );

    Ok(PackageHeader {
        version: PackageVersion::V2,
        version_minor,
        entry_count,
        index_offset: u64::from(index_offset),
    })
}

/// v1: the entry count sits at a fixed offset and the index table location
/// is a format constant, so there is nothing else to decode.
fn parse_v1(reader: &mut ByteReader, version_minor: u16) -> Result<PackageHeader> {
    reader.seek(SeekFrom::Start(V1_INDEX_COUNT_OFFSET))?;
    let entry_count = match reader.read_u32::<LittleEndian>() {
        Ok(count) => count,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(DbpfError::InvalidFormat(
                "Header truncated: missing v1 index entry count".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    debug!(
        "v1 header: {} declared entries, index at {:#010x}",
        entry_count, V1_INDEX_TABLE_OFFSET
    );

    Ok(PackageHeader {
        version: PackageVersion::V1,
        version_minor,
        entry_count,
        index_offset: V1_INDEX_TABLE_OFFSET,
    })
}

fn read_header_u16(reader: &mut ByteReader, field: &str) -> Result<u16> {
    reader.read_u16::<LittleEndian>().map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            DbpfError::InvalidFormat(format!("Header truncated while reading {}", field))
        } else {
            DbpfError::Io(e)
        }
    })
}
