//! Index table reader for DBPF version 1.x.
//!
//! The legacy layout has no header-embedded pointer: the table starts at a
//! fixed file offset. Each entry is 32 bytes:
//! ```text
//! [4 bytes] Type ID
//! [4 bytes] Group ID
//! [4 bytes] Instance ID (low half)
//! [4 bytes] Instance ID (high half)
//! [16 bytes] Storage metadata
//! ```
//! The low/high halves are stored in the opposite order to v2, but the
//! decoded `instance_id` uses the identical `(high << 32) | low` formula.

use std::collections::HashSet;
use std::io::{Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};
use log::warn;

use super::{V1_ENTRY_KEY_SIZE, V1_ENTRY_TRAILER_SIZE};
use crate::dbpf::reader::ByteReader;
use crate::dbpf::types::error::Result;
use crate::dbpf::types::models::{PackageHeader, ResourceKey};

/// Reads the v1 index table and reconstructs the identity key set.
///
/// Iterates the declared count of entries; a short read on the 16 identity
/// bytes ends the iteration with whatever has been decoded so far, so a
/// count larger than the file can hold is bounded by end-of-data rather
/// than being an error.
pub fn parse(reader: &mut ByteReader, header: &PackageHeader) -> Result<HashSet<ResourceKey>> {
    let mut resources = HashSet::new();

    reader.seek(SeekFrom::Start(header.index_offset))?;

    for i in 0..header.entry_count {
        let key_bytes = reader.read_up_to(V1_ENTRY_KEY_SIZE)?;
        if key_bytes.len() < V1_ENTRY_KEY_SIZE {
            warn!(
                "Unexpected end of index at entry {} of {}; keeping {} entries",
                i,
                header.entry_count,
                resources.len()
            );
            break;
        }

        let type_id = LittleEndian::read_u32(&key_bytes[0..4]);
        let group_id = LittleEndian::read_u32(&key_bytes[4..8]);
        let instance_low = LittleEndian::read_u32(&key_bytes[8..12]);
        let instance_high = LittleEndian::read_u32(&key_bytes[12..16]);

        // Skip the storage metadata; a short skip at end-of-data is fine,
        // the next key read will terminate the loop.
        reader.read_up_to(V1_ENTRY_TRAILER_SIZE)?;

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
