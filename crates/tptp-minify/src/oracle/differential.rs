//! The two-prover oracle

use super::prover::ProverRunner;
use super::{Oracle, Outcome, Verdict};
use crate::config::MinifyConfig;
use crate::error::{MinifyError, Result};
use crate::fol::Candidate;
use crate::printer::{render_problem, Header};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Verdicts of both provers on one problem.
///
/// `second` is `None` when the second prover was never started because the
/// first gave no answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub first: Verdict,
    pub second: Option<Verdict>,
}

impl Comparison {
    pub fn outcome(&self) -> Outcome {
        match &self.second {
            Some(second) => Outcome::from_verdicts(&self.first, second),
            None => Outcome::Inconclusive,
        }
    }
}

/// Runs two provers on each candidate and reports whether they disagree
pub struct DifferentialOracle {
    config: MinifyConfig,
    runner: ProverRunner,
    scratch: NamedTempFile,
    header: Option<Header>,
    last: Option<Comparison>,
    calls: usize,
}

impl DifferentialOracle {
    pub fn new(config: &MinifyConfig) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("candidate-")
            .suffix(".p")
            .tempfile()
            .map_err(|e| MinifyError::io(std::env::temp_dir(), e))?;
        debug!(path = %scratch.path().display(), "candidate scratch file");
        Ok(DifferentialOracle {
            config: config.clone(),
            runner: ProverRunner::new(config.timeout, config.strict_exit),
            scratch,
            header: None,
            last: None,
            calls: 0,
        })
    }

    /// Prefix every candidate file with `header`
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    /// Run both provers on an existing file.
    ///
    /// The second prover only runs when the first one answered.
    pub fn compare_file(&mut self, path: &Path) -> Result<Comparison> {
        self.calls += 1;
        let first = self.runner.run(&self.config.first, path)?;
        let second = if first.is_conclusive() {
            Some(self.runner.run(&self.config.second, path)?)
        } else {
            debug!(prover = %self.config.first, %first, "skipping second prover");
            None
        };
        let comparison = Comparison { first, second };
        self.last = Some(comparison.clone());
        Ok(comparison)
    }

    /// Verdicts from the most recent run, if any
    pub fn last_comparison(&self) -> Option<&Comparison> {
        self.last.as_ref()
    }

    /// Number of times the provers have been consulted
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Oracle for DifferentialOracle {
    fn test(&mut self, candidate: &Candidate) -> Result<Outcome> {
        let text = render_problem(&candidate.term, self.header.as_ref());
        let path = self.scratch.path().to_path_buf();
        fs::write(&path, text).map_err(|e| MinifyError::io(&path, e))?;
        let comparison = self.compare_file(&path)?;
        let outcome = comparison.outcome();
        debug!(size = candidate.size, %outcome, "candidate tested");
        Ok(outcome)
    }
}
