//! Hygiene: scans `src/` for panicking calls and silently dropped errors.
//!
//! Every budget is zero. Sibling `*_test.rs` files are exempt.

use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern and how many occurrences are tolerated.
struct Budget {
    pattern: &'static str,
    max: usize,
}

const PANICS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0 },
    Budget { pattern: ".expect(", max: 0 },
    Budget { pattern: "panic!(", max: 0 },
    Budget { pattern: "unreachable!(", max: 0 },
    Budget { pattern: "todo!(", max: 0 },
    Budget { pattern: "unimplemented!(", max: 0 },
];

const DISCARDS: &[Budget] = &[Budget { pattern: "let _ =", max: 0 }, Budget { pattern: ".ok()", max: 0 }];

const STYLE: &[Budget] = &[Budget { pattern: "#[allow(dead_code)]", max: 0 }, Budget { pattern: "dbg!(", max: 0 }];

fn production_sources() -> Vec<(PathBuf, String)> {
    let mut out = Vec::new();
    walk(Path::new("src"), &mut out);
    out
}

fn walk(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            walk(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rs && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

fn check(budgets: &[Budget]) {
    let sources = production_sources();
    assert!(!sources.is_empty(), "no sources found under src/");

    let mut report = Vec::new();
    for budget in budgets {
        let hits: Vec<String> = sources
            .iter()
            .flat_map(|(path, content)| {
                content
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| line.contains(budget.pattern))
                    .map(move |(n, _)| format!("  {}:{}", path.display(), n + 1))
            })
            .collect();
        if hits.len() > budget.max {
            report.push(format!("`{}`: found {}, max {}\n{}", budget.pattern, hits.len(), budget.max, hits.join("\n")));
        }
    }
    assert!(report.is_empty(), "hygiene budget exceeded:\n{}", report.join("\n"));
}

#[test]
fn no_panicking_calls() {
    check(PANICS);
}

#[test]
fn no_silent_discards() {
    check(DISCARDS);
}

#[test]
fn no_style_escapes() {
    check(STYLE);
}
