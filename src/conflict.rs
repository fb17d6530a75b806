//! Cross-file conflict aggregation.
//!
//! Pure functions over already-parsed per-file identity sets: build the
//! reverse index from key to containing files, then keep only keys seen in
//! two or more distinct files. No I/O, no faults, deterministic for a given
//! input order. The merge is associative and commutative over per-file
//! sets, which is what lets the batch scan parse files on parallel workers
//! and fold their results through a single collector.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use crate::dbpf::ResourceKey;

/// Reverse index from a conflict key to the files containing it, filtered
/// to genuine conflicts (two or more distinct files).
pub type ConflictMap<K> = HashMap<K, Vec<PathBuf>>;

/// Finds resources that occur in more than one package file.
///
/// `per_file` is consumed in order; each key's file list preserves
/// first-seen order and never repeats a path. Keys observed in only one
/// file are absent from the result.
pub fn find_conflicts<'a, I>(per_file: I) -> ConflictMap<ResourceKey>
where
    I: IntoIterator<Item = (&'a Path, &'a std::collections::HashSet<ResourceKey>)>,
{
    collect_conflicts(per_file, |key| *key)
}

/// Coarser variant: collapses identities by `type_id` alone, flagging files
/// that carry any resource of the same type. Useful for a first-pass
/// overview of a large library.
pub fn find_conflicts_by_type<'a, I>(per_file: I) -> ConflictMap<u32>
where
    I: IntoIterator<Item = (&'a Path, &'a std::collections::HashSet<ResourceKey>)>,
{
    collect_conflicts(per_file, |key| key.type_id)
}

fn collect_conflicts<'a, I, K, F>(per_file: I, project: F) -> ConflictMap<K>
where
    I: IntoIterator<Item = (&'a Path, &'a std::collections::HashSet<ResourceKey>)>,
    K: Eq + Hash,
    F: Fn(&ResourceKey) -> K,
{
    let mut reverse: ConflictMap<K> = HashMap::new();

    for (path, resources) in per_file {
        for resource in resources {
            let files = reverse.entry(project(resource)).or_default();
            // A full key appears at most once per file set, but the
            // projected key may not; keep each path at most once.
            if !files.iter().any(|f| f == path) {
                files.push(path.to_path_buf());
            }
        }
    }

    reverse.retain(|_, files| files.len() > 1);
    reverse
}
