//! Positionable byte reader over a package file.
//!
//! Small files go through buffered I/O; large ones are memory-mapped so the
//! index table (which usually sits at the far end of the file) can be
//! reached without dragging the whole payload through the page cache twice.
//! Callers never see which backing is in use: both sit behind the same
//! `Read + Seek` surface, and an owned in-memory buffer is available for
//! parsing byte slices directly.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, warn};
use memmap2::Mmap;

/// Files at or above this size are memory-mapped instead of buffered.
const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024;

/// Sequential reader over one package file or in-memory buffer.
///
/// Supports seeking in both directions; the v2 index table's location is
/// discovered from a header field and is not adjacent to the header.
#[derive(Debug)]
pub struct ByteReader {
    backing: Backing,
    len: u64,
}

#[derive(Debug)]
enum Backing {
    Buffered(BufReader<File>),
    Mapped { map: Mmap, pos: u64 },
    Memory { data: Vec<u8>, pos: u64 },
}

impl ByteReader {
    /// Opens a reader over the file at `path`, choosing the backing by file
    /// size. A failed mapping attempt falls back to buffered I/O rather
    /// than failing the parse.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        if len >= MMAP_THRESHOLD {
            // Safety note: the scan never mutates input files, but another
            // process truncating the file mid-map is outside our control;
            // map errors degrade to buffered reads.
            match unsafe { Mmap::map(&file) } {
                Ok(map) => {
                    debug!(
                        "Memory-mapped {} ({:.2} MiB)",
                        path.display(),
                        len as f64 / (1024.0 * 1024.0)
                    );
                    return Ok(Self {
                        backing: Backing::Mapped { map, pos: 0 },
                        len,
                    });
                }
                Err(e) => {
                    warn!(
                        "Memory mapping failed for {}: {}. Using buffered I/O instead.",
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(Self {
            backing: Backing::Buffered(BufReader::new(file)),
            len,
        })
    }

    /// Wraps an owned byte buffer. Used when the package bytes are already
    /// in memory.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let len = data.len() as u64;
        Self {
            backing: Backing::Memory { data, pos: 0 },
            len,
        }
    }

    /// Total length of the underlying data in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current absolute position.
    pub fn tell(&mut self) -> io::Result<u64> {
        match &mut self.backing {
            Backing::Buffered(inner) => inner.stream_position(),
            Backing::Mapped { pos, .. } | Backing::Memory { pos, .. } => Ok(*pos),
        }
    }

    /// Reads up to `n` bytes from the current position, returning fewer
    /// only at end-of-data. This is the primitive the index readers use to
    /// detect a short record.
    pub fn read_up_to(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(read) => filled += read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }
}

fn slice_read(data: &[u8], pos: &mut u64, buf: &mut [u8]) -> usize {
    let start = (*pos).min(data.len() as u64) as usize;
    let avail = &data[start..];
    let n = avail.len().min(buf.len());
    buf[..n].copy_from_slice(&avail[..n]);
    *pos += n as u64;
    n
}

fn slice_seek(len: u64, pos: &mut u64, target: SeekFrom) -> io::Result<u64> {
    let base = match target {
        SeekFrom::Start(offset) => {
            *pos = offset;
            return Ok(*pos);
        }
        SeekFrom::Current(delta) => (*pos as i64, delta),
        SeekFrom::End(delta) => (len as i64, delta),
    };
    let absolute = base.0.checked_add(base.1).filter(|p| *p >= 0).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "seek before the start of the data",
        )
    })?;
    *pos = absolute as u64;
    Ok(*pos)
}

impl Read for ByteReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.backing {
            Backing::Buffered(inner) => inner.read(buf),
            Backing::Mapped { map, pos } => Ok(slice_read(map, pos, buf)),
            Backing::Memory { data, pos } => Ok(slice_read(data, pos, buf)),
        }
    }
}

impl Seek for ByteReader {
    fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
        match &mut self.backing {
            Backing::Buffered(inner) => inner.seek(target),
            Backing::Mapped { pos, .. } => slice_seek(self.len, pos, target),
            Backing::Memory { pos, .. } => slice_seek(self.len, pos, target),
        }
    }
}
