//! The `check` subcommand, run as a separate process
#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A `sh` prover command line for a script holding `body`
fn script(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    format!("sh {}", path.display())
}

fn problem(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("problem.p");
    fs::write(&path, "fof(a, axiom, p).\n").unwrap();
    path
}

fn check(first: &str, second: &str, file: &Path) -> (Output, Vec<String>) {
    let output = Command::new(env!("CARGO_BIN_EXE_tptp-minify"))
        .arg("check")
        .arg(first)
        .arg(second)
        .arg(file)
        .output()
        .unwrap();
    let lines = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    (output, lines)
}

#[test]
fn test_check_runs_second_prover_after_inconclusive_first() {
    let dir = tempfile::tempdir().unwrap();
    let file = problem(&dir);
    let first = script(&dir, "first.sh", "echo 'SZS status GaveUp'\n");
    let second = script(&dir, "second.sh", "echo sat\n");

    let (output, lines) = check(&first, &second, &file);
    assert!(!output.status.success());
    assert_eq!(
        lines,
        vec![
            "inconclusive (no verdict)",
            "SZS status GaveUp",
            "sat",
            "did not get two answers",
        ]
    );
}

#[test]
fn test_check_reports_disagreement() {
    let dir = tempfile::tempdir().unwrap();
    let file = problem(&dir);
    let first = script(&dir, "first.sh", "echo sat\n");
    let second = script(&dir, "second.sh", "echo '% SZS status Theorem'\n");

    let (output, lines) = check(&first, &second, &file);
    assert!(output.status.success());
    assert_eq!(lines, vec!["sat", "unsat", "ok"]);
}

#[test]
fn test_check_agreement_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = problem(&dir);
    let unsat = script(&dir, "unsat.sh", "echo unsat\n");

    let (output, lines) = check(&unsat, &unsat, &file);
    assert!(!output.status.success());
    assert_eq!(lines, vec!["unsat", "unsat", "answers are not different"]);
}
