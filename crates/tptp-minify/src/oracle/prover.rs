//! Running one external prover under a time budget

use super::{Inconclusive, Verdict};
use crate::config::ProverCommand;
use crate::error::{MinifyError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Scan prover output for a status line; the first line that decides wins
pub fn classify_output(stdout: &str) -> Verdict {
    for line in stdout.lines() {
        let line = line.trim_end();
        if line == "sat" {
            return Verdict::Satisfiable;
        }
        if line == "unsat" {
            return Verdict::Unsatisfiable;
        }
        if let Some(status) = szs_status(line) {
            match status {
                "Satisfiable" | "CounterSatisfiable" => return Verdict::Satisfiable,
                "Unsatisfiable" | "Theorem" | "ContradictoryAxioms" => {
                    return Verdict::Unsatisfiable
                }
                _ => {}
            }
        }
    }
    Verdict::Inconclusive(Inconclusive::NoVerdict)
}

/// The word following `SZS status` on a line
fn szs_status(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once("SZS status ")?;
    rest.split_whitespace().next()
}

/// Kills and reaps the child on drop unless it already exited
struct ChildGuard {
    child: Child,
    exited: bool,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.exited {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// A finished prover run: its verdict and what it printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProverRun {
    pub verdict: Verdict,
    /// Empty when the run timed out
    pub stdout: String,
}

/// Runs prover commands on problem files
#[derive(Debug, Clone)]
pub struct ProverRunner {
    pub timeout: Duration,
    pub strict_exit: bool,
}

impl ProverRunner {
    pub fn new(timeout: Duration, strict_exit: bool) -> Self {
        ProverRunner {
            timeout,
            strict_exit,
        }
    }

    /// Run `command problem` and classify the result.
    ///
    /// Only a failure to start the process is an error; timeouts and failed
    /// runs come back as inconclusive verdicts.
    pub fn run(&self, command: &ProverCommand, problem: &Path) -> Result<Verdict> {
        self.run_captured(command, problem).map(|run| run.verdict)
    }

    /// Like [`ProverRunner::run`], keeping the prover's stdout
    pub fn run_captured(&self, command: &ProverCommand, problem: &Path) -> Result<ProverRun> {
        let temp_dir = std::env::temp_dir();
        let mut stdout_file = tempfile::tempfile().map_err(|e| MinifyError::io(&temp_dir, e))?;
        let mut stderr_file = tempfile::tempfile().map_err(|e| MinifyError::io(&temp_dir, e))?;
        let stdout_handle = stdout_file.try_clone().map_err(|e| MinifyError::io(&temp_dir, e))?;
        let stderr_handle = stderr_file.try_clone().map_err(|e| MinifyError::io(&temp_dir, e))?;

        let start = Instant::now();
        let child = Command::new(&command.program)
            .args(&command.args)
            .arg(problem)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_handle))
            .stderr(Stdio::from(stderr_handle))
            .spawn()
            .map_err(|source| MinifyError::Spawn {
                command: command.to_string(),
                source,
            })?;
        let mut guard = ChildGuard {
            child,
            exited: false,
        };

        let status = match guard.child.wait_timeout(self.timeout) {
            Ok(Some(status)) => {
                guard.exited = true;
                status
            }
            Ok(None) => {
                debug!(prover = %command, budget = ?self.timeout, "prover timed out");
                return Ok(ProverRun {
                    verdict: Verdict::Inconclusive(Inconclusive::Timeout(self.timeout)),
                    stdout: String::new(),
                });
            }
            Err(e) => return Err(MinifyError::io(problem, e)),
        };
        let elapsed = start.elapsed();

        let stdout = read_back(&mut stdout_file, &temp_dir)?;
        let stderr = read_back(&mut stderr_file, &temp_dir)?;

        let verdict = if !stderr.is_empty() {
            warn!(prover = %command, stderr = %stderr.trim_end(), "prover wrote to stderr");
            Verdict::Inconclusive(Inconclusive::Failed {
                status: status.code(),
                stderr,
            })
        } else if self.strict_exit && !status.success() {
            Verdict::Inconclusive(Inconclusive::Failed {
                status: status.code(),
                stderr,
            })
        } else {
            classify_output(&stdout)
        };

        debug!(prover = %command, %verdict, ?elapsed, "prover finished");
        Ok(ProverRun { verdict, stdout })
    }
}

fn read_back(file: &mut File, path: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut bytes))
        .map_err(|e| MinifyError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_tokens() {
        assert_eq!(classify_output("c comment\nsat\n"), Verdict::Satisfiable);
        assert_eq!(classify_output("unsat\r\n"), Verdict::Unsatisfiable);
        // only whole lines count
        assert_eq!(
            classify_output("unsatisfiable core\n"),
            Verdict::Inconclusive(Inconclusive::NoVerdict)
        );
    }

    #[test]
    fn test_szs_status_lines() {
        assert_eq!(
            classify_output("% SZS status Theorem for PUZ001+1\n"),
            Verdict::Unsatisfiable
        );
        assert_eq!(
            classify_output("# SZS status CounterSatisfiable\n"),
            Verdict::Satisfiable
        );
        assert_eq!(
            classify_output("% SZS status ContradictoryAxioms for x\n"),
            Verdict::Unsatisfiable
        );
        assert_eq!(
            classify_output("% SZS status GaveUp\n% SZS status Timeout\n"),
            Verdict::Inconclusive(Inconclusive::NoVerdict)
        );
    }

    #[test]
    fn test_first_marker_wins() {
        assert_eq!(
            classify_output("% SZS status Satisfiable\nunsat\n"),
            Verdict::Satisfiable
        );
    }
}
