use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use dbpf_conflict::{report, scan};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <mods-directory> [-o <report.csv>] [-v] [--by-type]",
            args[0]
        );
        process::exit(1);
    }

    let mut mods_dir: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut verbose = false;
    let mut by_type = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => match iter.next() {
                Some(path) => output = Some(PathBuf::from(path)),
                None => {
                    eprintln!("ERROR: {} flag requires an argument.", arg);
                    process::exit(1);
                }
            },
            "-v" | "--verbose" => verbose = true,
            "--by-type" => by_type = true,
            other if mods_dir.is_none() => mods_dir = Some(PathBuf::from(other)),
            other => {
                eprintln!("ERROR: Unexpected argument: {}", other);
                process::exit(1);
            }
        }
    }

    let Some(mods_dir) = mods_dir else {
        eprintln!("ERROR: No mods directory given.");
        process::exit(1);
    };

    println!("Scanning mods directory: {}", mods_dir.display());

    let outcome = match scan::scan_directory(&mods_dir) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("\nERROR: Failed to scan {}", mods_dir.display());
            eprintln!("  {}", e);
            process::exit(1);
        }
    };

    println!(
        "Successfully processed {} files with {} errors.",
        outcome.parsed.len(),
        outcome.failures.len()
    );
    if verbose {
        for (path, error) in &outcome.failures {
            println!("  error in {}: {}", path.display(), error);
        }
    }

    let mut stdout = io::stdout();
    let conflict_count = if by_type {
        let conflicts = outcome.conflicts_by_type();
        render(&conflicts, verbose, output.as_deref(), &mut stdout);
        conflicts.len()
    } else {
        let conflicts = outcome.conflicts();
        render(&conflicts, verbose, output.as_deref(), &mut stdout);
        conflicts.len()
    };

    if conflict_count == 0 {
        println!("No conflicts detected.");
    }
}

fn render<K>(
    conflicts: &dbpf_conflict::ConflictMap<K>,
    verbose: bool,
    output: Option<&std::path::Path>,
    out: &mut impl Write,
) {
    if conflicts.is_empty() {
        return;
    }

    if let Err(e) = report::render_summary(conflicts, verbose, out) {
        eprintln!("ERROR: Failed to write summary: {}", e);
        process::exit(1);
    }

    if let Some(path) = output {
        match report::write_csv(conflicts, path) {
            Ok(()) => println!("\nDetailed conflict report saved to: {}", path.display()),
            Err(e) => {
                eprintln!("ERROR: Failed to write report to {}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }
}
