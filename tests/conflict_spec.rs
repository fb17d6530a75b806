use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use dbpf_conflict::{find_conflicts, find_conflicts_by_type, report, ResourceKey};

fn key(type_id: u32, group_id: u32, instance_id: u64) -> ResourceKey {
    ResourceKey {
        type_id,
        group_id,
        instance_id,
    }
}

fn file_set<'a>(
    path: &'a Path,
    keys: &[ResourceKey],
) -> (&'a Path, HashSet<ResourceKey>) {
    (path, keys.iter().copied().collect())
}

#[test]
fn keys_in_two_or_more_files_are_conflicts() {
    let k1 = key(0x1, 0x0, 0x100);
    let k2 = key(0x2, 0x0, 0x200);
    let k3 = key(0x3, 0x0, 0x300);

    let a = PathBuf::from("mods/a.package");
    let b = PathBuf::from("mods/b.package");
    let c = PathBuf::from("mods/c.package");
    let (pa, sa) = file_set(&a, &[k1, k2]);
    let (pb, sb) = file_set(&b, &[k2, k3]);
    let (pc, sc) = file_set(&c, &[k1]);

    let conflicts = find_conflicts([(pa, &sa), (pb, &sb), (pc, &sc)]);

    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[&k1], vec![a.clone(), c.clone()]);
    assert_eq!(conflicts[&k2], vec![a.clone(), b.clone()]);
    assert!(!conflicts.contains_key(&k3));
}

#[test]
fn file_lists_preserve_first_seen_order() {
    let k = key(0xAB, 0xCD, 0xEF);
    let paths: Vec<PathBuf> = (0..6)
        .map(|i| PathBuf::from(format!("mods/{}.package", i)))
        .collect();
    let sets: Vec<HashSet<ResourceKey>> =
        paths.iter().map(|_| HashSet::from([k])).collect();

    let conflicts =
        find_conflicts(paths.iter().map(|p| p.as_path()).zip(sets.iter()));
    assert_eq!(conflicts[&k], paths);
}

#[test]
fn no_conflicts_from_a_single_file() {
    let a = PathBuf::from("only.package");
    let (pa, sa) = file_set(&a, &[key(0x1, 0x2, 0x3), key(0x4, 0x5, 0x6)]);
    let conflicts = find_conflicts([(pa, &sa)]);
    assert!(conflicts.is_empty());
}

#[test]
fn by_type_mode_collapses_distinct_instances_and_dedups_paths() {
    // Same type in both files, but through different full keys; the file
    // with two resources of that type must appear only once.
    let a = PathBuf::from("a.package");
    let b = PathBuf::from("b.package");
    let (pa, sa) = file_set(&a, &[key(0x77, 0x0, 0x1), key(0x77, 0x0, 0x2)]);
    let (pb, sb) = file_set(&b, &[key(0x77, 0x1, 0x3)]);

    let full = find_conflicts([(pa, &sa), (pb, &sb)]);
    assert!(full.is_empty());

    let by_type = find_conflicts_by_type([(pa, &sa), (pb, &sb)]);
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[&0x77], vec![a, b]);
}

#[test]
fn merge_is_insensitive_to_set_contents_order() {
    // The same per-file sets presented in two different file orders name
    // the same conflicting keys.
    let k1 = key(0x1, 0x1, 0x1);
    let k2 = key(0x2, 0x2, 0x2);
    let a = PathBuf::from("a.package");
    let b = PathBuf::from("b.package");
    let (pa, sa) = file_set(&a, &[k1, k2]);
    let (pb, sb) = file_set(&b, &[k2, k1]);

    let forward = find_conflicts([(pa, &sa), (pb, &sb)]);
    let backward = find_conflicts([(pb, &sb), (pa, &sa)]);

    let forward_keys: HashSet<_> = forward.keys().copied().collect();
    let backward_keys: HashSet<_> = backward.keys().copied().collect();
    assert_eq!(forward_keys, backward_keys);
    assert_eq!(forward_keys, HashSet::from([k1, k2]));
}

#[test]
fn grouping_orders_files_by_conflict_count() {
    // hub shares a key with each of three spokes; each spoke only
    // conflicts with hub.
    let hub = PathBuf::from("mods/hub.package");
    let spokes: Vec<PathBuf> = (0..3)
        .map(|i| PathBuf::from(format!("mods/spoke{}.package", i)))
        .collect();

    let hub_keys: Vec<ResourceKey> =
        (0..3).map(|i| key(0x10 + i, 0x0, u64::from(i))).collect();
    let (ph, sh) = file_set(&hub, &hub_keys);
    let spoke_sets: Vec<HashSet<ResourceKey>> = hub_keys
        .iter()
        .map(|k| HashSet::from([*k]))
        .collect();

    let mut input: Vec<(&Path, &HashSet<ResourceKey>)> = vec![(ph, &sh)];
    input.extend(spokes.iter().map(|p| p.as_path()).zip(spoke_sets.iter()));
    let conflicts = find_conflicts(input);

    let grouped = report::group_by_file(&conflicts);
    assert_eq!(grouped.len(), 4);
    assert_eq!(grouped[0].file, hub);
    assert_eq!(grouped[0].conflicts_with.len(), 3);
    for entry in &grouped[1..] {
        assert_eq!(entry.conflicts_with, vec![hub.clone()]);
    }
}

#[test]
fn summary_counts_resources_and_files() {
    let k = key(0x9, 0x9, 0x9);
    let a = PathBuf::from("mods/pair/a.package");
    let b = PathBuf::from("mods/pair/b.package");
    let (pa, sa) = file_set(&a, &[k]);
    let (pb, sb) = file_set(&b, &[k]);
    let conflicts = find_conflicts([(pa, &sa), (pb, &sb)]);

    let mut buf = Vec::new();
    report::render_summary(&conflicts, true, &mut buf).expect("render");
    let text = String::from_utf8(buf).expect("utf8");
    assert!(text.contains("Found 1 resources with conflicts across 2 files."));
    assert!(text.contains("pair/a.package"));
}

#[test]
fn csv_report_lists_each_conflicting_pair() {
    let k = key(0x9, 0x9, 0x9);
    let a = PathBuf::from("mods/pair/a.package");
    let b = PathBuf::from("mods/pair/b.package");
    let (pa, sa) = file_set(&a, &[k]);
    let (pb, sb) = file_set(&b, &[k]);
    let conflicts = find_conflicts([(pa, &sa), (pb, &sb)]);

    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("report.csv");
    report::write_csv(&conflicts, &out).expect("write csv");

    let text = fs::read_to_string(&out).expect("read csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "File,Conflicts With,Conflict Type");
    assert_eq!(lines.len(), 3); // header + one row per direction
    assert!(lines[1..]
        .iter()
        .all(|line| line.ends_with(",Resource Override")));
}
