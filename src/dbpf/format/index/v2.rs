//! Index table reader for DBPF version 2.x.
//!
//! The v2 index table lives wherever the header's offset field points, and
//! begins with a 4-byte index-type tag followed by a flat array of 28-byte
//! entries:
//! ```text
//! [4 bytes] Type ID
//! [4 bytes] Group ID
//! [4 bytes] Instance ID (high half)
//! [4 bytes] Instance ID (low half)
//! [12 bytes] Offset, file size, memory size
//! [4 bytes] Compression flags
//! ```
//! Only the first 16 bytes carry identity; the trailing 12 + 4 bytes are
//! storage metadata the scanner reads past without interpreting.

use std::collections::HashSet;
use std::io::{Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use log::{debug, warn};

use super::{INDEX_ENTRY_SIZE, MAX_INDEX_ENTRIES};
use crate::dbpf::format::header::HEADER_SIZE;
use crate::dbpf::reader::ByteReader;
use crate::dbpf::types::error::Result;
use crate::dbpf::types::models::{PackageHeader, ResourceKey};

/// Reads the v2 index table and reconstructs the identity key set.
///
/// An index offset outside `(header, file_size - 4)` means the table cannot
/// be located; the file contributes zero resources and a warning, not a
/// fault. The declared entry count is never trusted: it is capped against
/// the bytes actually remaining in the file and a fixed safety limit, so a
/// corrupt or hostile count can neither read past the end nor make the
/// scanner do unbounded work. A short read mid-table simply ends the
/// iteration with the entries decoded so far.
pub fn parse(reader: &mut ByteReader, header: &PackageHeader) -> Result<HashSet<ResourceKey>> {
    let mut resources = HashSet::new();
    let file_size = reader.len();
    let index_offset = header.index_offset;

    if index_offset <= HEADER_SIZE || index_offset >= file_size.saturating_sub(4) {
        warn!(
            "Invalid index offset {:#x} for file size {}; treating as empty",
            index_offset, file_size
        );
        return Ok(resources);
    }

    reader.seek(SeekFrom::Start(index_offset))?;

    // 4-byte index type tag; its value does not affect entry decoding.
    let index_type = reader.read_u32::<LittleEndian>()?;
    debug!("Index type: {}", index_type);

    let remaining = file_size - index_offset - 4;
    let max_readable = remaining / INDEX_ENTRY_SIZE;
    let effective = if header.entry_count > 0 {
        u64::from(header.entry_count).min(max_readable)
    } else {
        // A zero declared count still gets a chance: read whatever fits.
        max_readable
    }
    .min(MAX_INDEX_ENTRIES);
    debug!(
        "Reading up to {} index entries ({} declared, {} readable)",
        effective, header.entry_count, max_readable
    );

    for _ in 0..effective {
        let entry = reader.read_up_to(INDEX_ENTRY_SIZE as usize)?;
        if entry.len() < INDEX_ENTRY_SIZE as usize {
            break;
        }

        let type_id = LittleEndian::read_u32(&entry[0..4]);
        let group_id = LittleEndian::read_u32(&entry[4..8]);
        let instance_high = LittleEndian::read_u32(&entry[8..12]);
        let instance_low = LittleEndian::read_u32(&entry[12..16]);

        // Zero type and group marks a padding/hole entry.
        if type_id == 0 && group_id == 0 {
            continue;
        }

        resources.insert(ResourceKey::from_parts(
            type_id,
            group_id,
            instance_high,
            instance_low,
        ));
    }

    Ok(resources)
}
