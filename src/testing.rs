//! Invariant checks shared by the fuzz target and the regression tests.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`check_fingerprint_invariants`]: assert the fingerprint properties on arbitrary SQL
//! - [`test_fingerprint`]: the same check on raw fuzzer bytes
//! - [`run_crash_dir_regression`]: replay every saved crash input through a check

use alloc::string::String;
use alloc::vec::Vec;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::parser::Lexer;
use crate::{FingerprintCache, fingerprint_uncached};

/// Whitespace substituted for every whitespace token when checking that
/// incidental whitespace does not affect the fingerprint.
const RESPACING: &str = "\n\t  ";

/// Assert that `sql` fingerprints consistently.
///
/// For both values of `hide_columns`:
/// - a fresh [`FingerprintCache`] returns what [`fingerprint_uncached`] returns,
///   on the first call and on the cached repeat
/// - a successful fingerprint carries no leading or trailing whitespace
/// - for input without comments, replacing every whitespace run with other
///   whitespace yields the same result
///
/// # Panics
///
/// Panics when an invariant does not hold.
pub fn check_fingerprint_invariants(sql: &str) {
    let respaced = respaced(sql);
    for hide_columns in [true, false] {
        let expected = fingerprint_uncached(sql, hide_columns);

        let cache = FingerprintCache::default();
        assert_eq!(
            cache.fingerprint(sql, hide_columns),
            expected,
            "cold cache disagrees for {sql:?}"
        );
        assert_eq!(
            cache.fingerprint(sql, hide_columns),
            expected,
            "warm cache disagrees for {sql:?}"
        );

        if let Ok(fingerprint) = &expected {
            assert_eq!(fingerprint.trim(), fingerprint, "untrimmed fingerprint");
        }

        if let Some(respaced) = &respaced {
            assert_eq!(
                fingerprint_uncached(respaced, hide_columns),
                expected,
                "whitespace changed the fingerprint of {sql:?} (respaced: {respaced:?})"
            );
        }
    }
}

/// Run [`check_fingerprint_invariants`] on raw fuzzer input, skipping
/// non-UTF-8 data.
pub fn test_fingerprint(data: &[u8]) {
    let Ok(sql) = core::str::from_utf8(data) else {
        return;
    };
    check_fingerprint_invariants(sql);
}

/// `sql` with every whitespace token replaced by [`RESPACING`], or `None` when
/// it holds comments, whose bodies end at line breaks.
fn respaced(sql: &str) -> Option<String> {
    let mut respaced = String::with_capacity(sql.len());
    for token in Lexer::new(sql) {
        if token.kind.is_comment() {
            return None;
        }
        if token.is_whitespace() {
            respaced.push_str(RESPACING);
        } else {
            respaced.push_str(&token.value);
        }
    }
    Some(respaced)
}

/// Replay every `.fuzz` file in `crash_dir` through `check`.
///
/// New crash files found in the honggfuzz `workspace_dir` are copied into
/// `crash_dir` first, so a crash becomes a regression test on the next run.
/// Each input must complete within `time_limit`.
///
/// # Panics
///
/// Panics when a file cannot be read or copied, when `check` panics, or when
/// an input exceeds `time_limit`.
pub fn run_crash_dir_regression(
    crash_dir: &str,
    workspace_dir: &str,
    time_limit: Duration,
    check: fn(&[u8]),
) {
    let crash_dir = Path::new(crash_dir);
    copy_new_crash_files(Path::new(workspace_dir), crash_dir);

    for path in fuzz_files(crash_dir) {
        let data = fs::read(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let start = Instant::now();
        check(&data);
        let elapsed = start.elapsed();
        assert!(
            elapsed <= time_limit,
            "{} took {elapsed:?}, over the {time_limit:?} limit",
            path.display()
        );
    }
}

fn fuzz_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|extension| extension == "fuzz"))
        .collect();
    paths.sort();
    paths
}

fn copy_new_crash_files(workspace_dir: &Path, crash_dir: &Path) {
    let new_files: Vec<PathBuf> = fuzz_files(workspace_dir)
        .into_iter()
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| !crash_dir.join(name).exists())
        })
        .collect();
    if new_files.is_empty() {
        return;
    }
    fs::create_dir_all(crash_dir)
        .unwrap_or_else(|err| panic!("failed to create {}: {err}", crash_dir.display()));
    for path in new_files {
        let Some(name) = path.file_name() else {
            continue;
        };
        fs::copy(&path, crash_dir.join(name))
            .unwrap_or_else(|err| panic!("failed to copy {}: {err}", path.display()));
    }
}
