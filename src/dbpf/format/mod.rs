//! On-disk format decoding: header layout resolution and the two
//! version-specific index table readers.

pub mod header;
pub mod index;
