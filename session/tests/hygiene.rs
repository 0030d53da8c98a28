//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the session crate source tree for antipatterns. Each has
//! a budget (ideally zero). The budget never grows: fix an existing hit before
//! adding a new one.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

// Panics: a panic inside a browser event handler kills the whole app.
const MAX_UNWRAP: usize = 0;
const MAX_EXPECT: usize = 0;
const MAX_PANIC: usize = 0;
const MAX_TODO: usize = 0;

// Silent loss: failures must be logged or recorded in the store.
const MAX_SILENT_DISCARD: usize = 0;
const MAX_DOT_OK: usize = 0;

// Output goes through the `log` facade so the browser console picks it up.
const MAX_PRINT: usize = 0;

// The store is single-threaded by contract.
const MAX_THREAD_SYNC: usize = 0;

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `session/src/`, skipping `_test.rs` files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

/// Count lines containing any of `patterns`, ignoring `//` comment lines.
fn hits(files: &[SourceFile], patterns: &[&str]) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| patterns.iter().any(|p| line.contains(p)))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn assert_budget(label: &str, patterns: &[&str], max: usize) {
    let files = source_files();
    assert!(!files.is_empty(), "no source files found; run from the crate root");
    let found = hits(&files, patterns);
    let count: usize = found.iter().map(|(_, c)| c).sum();
    let listing = found
        .iter()
        .map(|(path, c)| format!("  {path}: {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(count <= max, "{label} budget exceeded: found {count}, max {max}.\n{listing}");
}

#[test]
fn unwrap_budget() {
    assert_budget(".unwrap()", &[".unwrap()"], MAX_UNWRAP);
}

#[test]
fn expect_budget() {
    assert_budget(".expect()", &[".expect("], MAX_EXPECT);
}

#[test]
fn panic_budget() {
    assert_budget("panic!/unreachable!", &["panic!(", "unreachable!("], MAX_PANIC);
}

#[test]
fn todo_budget() {
    assert_budget("todo!/unimplemented!", &["todo!(", "unimplemented!("], MAX_TODO);
}

#[test]
fn silent_discard_budget() {
    assert_budget("let _ =", &["let _ ="], MAX_SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    assert_budget(".ok()", &[".ok()"], MAX_DOT_OK);
}

#[test]
fn print_budget() {
    assert_budget("println!/eprintln!/dbg!", &["println!(", "eprintln!(", "dbg!("], MAX_PRINT);
}

#[test]
fn thread_sync_budget() {
    assert_budget("Arc/Mutex/thread", &["Arc<", "Mutex<", "std::thread"], MAX_THREAD_SYNC);
}
