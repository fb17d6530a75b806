//! Package discovery and batch scanning.
//!
//! Walks a content directory for `.package` files and parses each one on a
//! parallel worker. Per-file parsing shares no state, so the only
//! discipline here is that every worker owns its reader for the duration of
//! one parse; results come back as private values folded by a single
//! collector in discovery order. Per-file faults are tallied and never
//! abort the rest of the corpus.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::conflict::{self, ConflictMap};
use crate::dbpf::{self, DbpfError, ResourceKey, Result};

/// Outcome of scanning a batch of package files.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Successfully parsed files with their identity key sets, in
    /// discovery order.
    pub parsed: Vec<(PathBuf, HashSet<ResourceKey>)>,
    /// Files that faulted, with the fault that stopped each one.
    pub failures: Vec<(PathBuf, DbpfError)>,
}

impl ScanOutcome {
    /// Resources present in two or more of the scanned files.
    pub fn conflicts(&self) -> ConflictMap<ResourceKey> {
        conflict::find_conflicts(self.iter_sets())
    }

    /// Conflicts collapsed by resource type alone.
    pub fn conflicts_by_type(&self) -> ConflictMap<u32> {
        conflict::find_conflicts_by_type(self.iter_sets())
    }

    fn iter_sets(&self) -> impl Iterator<Item = (&Path, &HashSet<ResourceKey>)> {
        self.parsed.iter().map(|(p, set)| (p.as_path(), set))
    }
}

/// Recursively collects all `.package` files under `directory`.
///
/// The extension match is case-insensitive. Unreadable subtrees are logged
/// and skipped; only a root that is not a directory is a fault.
pub fn discover_packages(directory: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(DbpfError::NotFound(directory.to_path_buf()));
    }

    let mut packages = Vec::new();
    for entry in WalkDir::new(directory) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", directory.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_package_name(entry.path()) {
            packages.push(entry.into_path());
        }
    }

    info!(
        "Found {} package files in {}",
        packages.len(),
        directory.display()
    );
    Ok(packages)
}

/// Parses every file in `paths` on parallel workers.
///
/// Result order matches `paths`; a fault in one file lands in
/// [`ScanOutcome::failures`] and leaves every other file unaffected.
pub fn scan_files(paths: &[PathBuf]) -> ScanOutcome {
    let results: Vec<(PathBuf, Result<HashSet<ResourceKey>>)> = paths
        .par_iter()
        .map(|path| (path.clone(), dbpf::parse_package(path)))
        .collect();

    let mut outcome = ScanOutcome::default();
    for (path, result) in results {
        match result {
            Ok(resources) => outcome.parsed.push((path, resources)),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                outcome.failures.push((path, e));
            }
        }
    }

    info!(
        "Scanned {} files: {} parsed, {} failed",
        paths.len(),
        outcome.parsed.len(),
        outcome.failures.len()
    );
    outcome
}

/// Discovers and scans a whole content directory in one call.
pub fn scan_directory(directory: impl AsRef<Path>) -> Result<ScanOutcome> {
    let paths = discover_packages(directory)?;
    Ok(scan_files(&paths))
}

fn is_package_name(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("package"))
}
