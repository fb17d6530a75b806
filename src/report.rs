//! Conflict report rendering.
//!
//! Turns the aggregator's reverse index into the two outputs the original
//! tool produced: a console summary ordered by how contested each file is,
//! and a CSV listing every conflicting file pair.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::conflict::ConflictMap;

/// One file and the set of other files it conflicts with.
#[derive(Debug)]
pub struct FileConflicts {
    pub file: PathBuf,
    pub conflicts_with: Vec<PathBuf>,
}

/// Regroups conflicts per file: for each file, every other file sharing at
/// least one conflict key with it. Sorted by conflict count descending,
/// then by path for a stable order; each `conflicts_with` list is sorted.
pub fn group_by_file<K>(conflicts: &ConflictMap<K>) -> Vec<FileConflicts> {
    let mut per_file: std::collections::HashMap<&PathBuf, std::collections::BTreeSet<&PathBuf>> =
        std::collections::HashMap::new();

    for files in conflicts.values() {
        for file in files {
            let others = per_file.entry(file).or_default();
            others.extend(files.iter().filter(|other| *other != file));
        }
    }

    let mut grouped: Vec<FileConflicts> = per_file
        .into_iter()
        .map(|(file, others)| FileConflicts {
            file: file.clone(),
            conflicts_with: others.into_iter().cloned().collect(),
        })
        .collect();
    grouped.sort_by(|a, b| {
        b.conflicts_with
            .len()
            .cmp(&a.conflicts_with.len())
            .then_with(|| a.file.cmp(&b.file))
    });
    grouped
}

/// Writes the console summary to `out`.
///
/// `verbose` adds the top ten most contested files with up to five of
/// their counterparts each, mirroring the original report.
pub fn render_summary<K>(
    conflicts: &ConflictMap<K>,
    verbose: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    let grouped = group_by_file(conflicts);

    writeln!(out, "\nConflict Summary:")?;
    writeln!(
        out,
        "Found {} resources with conflicts across {} files.",
        conflicts.len(),
        grouped.len()
    )?;

    if verbose {
        writeln!(out, "\nTop conflicts by file:")?;
        for entry in grouped.iter().take(10) {
            writeln!(
                out,
                "\n{} conflicts with {} other files:",
                relative_mod_path(&entry.file),
                entry.conflicts_with.len()
            )?;
            for other in entry.conflicts_with.iter().take(5) {
                writeln!(out, "  - {}", relative_mod_path(other))?;
            }
            if entry.conflicts_with.len() > 5 {
                writeln!(
                    out,
                    "  - ... and {} more files",
                    entry.conflicts_with.len() - 5
                )?;
            }
        }
    }

    Ok(())
}

/// Writes the full conflict listing as CSV: one row per conflicting pair,
/// `File, Conflicts With, Conflict Type`.
pub fn write_csv<K>(conflicts: &ConflictMap<K>, output: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(output)?);
    writeln!(writer, "File,Conflicts With,Conflict Type")?;

    for entry in group_by_file(conflicts) {
        let file = relative_mod_path(&entry.file);
        for other in &entry.conflicts_with {
            writeln!(
                writer,
                "{},{},Resource Override",
                csv_field(&file),
                csv_field(&relative_mod_path(other))
            )?;
        }
    }

    writer.flush()
}

/// Shortens an absolute path to its last two components, the way paths read
/// relative to a mods directory (`Author/file.package`).
fn relative_mod_path(path: &Path) -> String {
    let components: Vec<_> = path.components().collect();
    if components.len() >= 2 {
        let tail: PathBuf = components[components.len() - 2..].iter().collect();
        tail.display().to_string()
    } else {
        path.display().to_string()
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
