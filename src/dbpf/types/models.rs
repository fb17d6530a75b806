//! Core data structures for the DBPF container format.
//!
//! This module defines the fundamental types used throughout the library:
//! - Resource identity keys
//! - Parsed package headers
//! - Format version enumeration

use std::fmt;

use super::error::{DbpfError, Result};

/// The unique identity of one resource inside a package file.
///
/// Two files that each contain a resource with an equal `ResourceKey` are,
/// by definition, conflicting: the game loads whichever it sees last.
/// Equality and hashing cover all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    /// Identifies the kind of resource (texture, tuning, mesh, ...).
    pub type_id: u32,
    /// Organizes resources into groups.
    pub group_id: u32,
    /// 64-bit instance identifier, unique within a type/group.
    pub instance_id: u64,
}

impl ResourceKey {
    /// Builds a key from the two 32-bit instance halves as they appear on
    /// disk. Both layouts use the same `(high << 32) | low` composition,
    /// whatever order the halves are stored in.
    pub fn from_parts(type_id: u32, group_id: u32, instance_high: u32, instance_low: u32) -> Self {
        Self {
            type_id,
            group_id,
            instance_id: (u64::from(instance_high) << 32) | u64::from(instance_low),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T:{:08x} G:{:08x} I:{:016x}",
            self.type_id, self.group_id, self.instance_id
        )
    }
}

/// The two historical on-disk layouts of the DBPF container.
///
/// Resolved exactly once while decoding the header; every later stage
/// dispatches on this tag, never on file names or paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageVersion {
    /// Legacy layout: entry count and index table live at fixed offsets.
    V1,
    /// Current layout: a 96-byte header carries a pointer to the index.
    V2,
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageVersion::V1 => write!(f, "v1"),
            PackageVersion::V2 => write!(f, "v2"),
        }
    }
}

impl TryFrom<u16> for PackageVersion {
    type Error = DbpfError;

    fn try_from(major: u16) -> Result<Self> {
        match major {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(DbpfError::InvalidFormat(format!(
                "Unsupported DBPF version: {}. Only v1.x and v2.x are supported.",
                other
            ))),
        }
    }
}

/// Parsed package header: the layout variant plus the location and declared
/// size of the index table.
///
/// Exists only for the duration of one file's parse. All header bytes not
/// represented here carry no semantics the scanner needs and are discarded.
#[derive(Debug, Clone, Copy)]
pub struct PackageHeader {
    pub version: PackageVersion,
    pub version_minor: u16,
    /// Number of index entries the header claims the file contains. Treated
    /// as a hint, never trusted: the index readers cap it against what the
    /// file can actually hold.
    pub entry_count: u32,
    /// Absolute byte offset of the index table. Read from the header for
    /// v2; a fixed format constant for v1.
    pub index_offset: u64,
}
