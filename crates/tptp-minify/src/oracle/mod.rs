//! Deciding whether a candidate still makes two provers disagree
//!
//! The [`Oracle`] trait is the seam between the shrink loop and the outside
//! world. [`DifferentialOracle`] runs two external provers; tests plug in
//! closures.

pub mod differential;
pub mod prover;

pub use differential::{Comparison, DifferentialOracle};
pub use prover::{classify_output, ProverRun, ProverRunner};

use crate::error::Result;
use crate::fol::Candidate;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Why a prover run gave no usable answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Inconclusive {
    /// Killed after exceeding its budget
    Timeout(Duration),
    /// Wrote to stderr, or exited non-zero under the strict exit policy
    Failed { status: Option<i32>, stderr: String },
    /// Finished cleanly without a recognizable status line
    NoVerdict,
}

/// A prover's classification of a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Satisfiable,
    Unsatisfiable,
    Inconclusive(Inconclusive),
}

impl Verdict {
    pub fn is_conclusive(&self) -> bool {
        !matches!(self, Verdict::Inconclusive(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Satisfiable => write!(f, "sat"),
            Verdict::Unsatisfiable => write!(f, "unsat"),
            Verdict::Inconclusive(Inconclusive::Timeout(budget)) => {
                write!(f, "inconclusive (timeout after {:?})", budget)
            }
            Verdict::Inconclusive(Inconclusive::Failed { status, stderr }) => {
                write!(f, "inconclusive (failed")?;
                if let Some(code) = status {
                    write!(f, ", exit status {}", code)?;
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                write!(f, ")")
            }
            Verdict::Inconclusive(Inconclusive::NoVerdict) => write!(f, "inconclusive (no verdict)"),
        }
    }
}

/// Result of testing one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Both provers answered and disagree
    Interesting,
    /// Both provers answered and agree
    Uninteresting,
    /// At least one prover gave no answer
    Inconclusive,
}

impl Outcome {
    pub fn from_verdicts(first: &Verdict, second: &Verdict) -> Self {
        if !first.is_conclusive() || !second.is_conclusive() {
            Outcome::Inconclusive
        } else if first != second {
            Outcome::Interesting
        } else {
            Outcome::Uninteresting
        }
    }

    pub fn is_interesting(self) -> bool {
        self == Outcome::Interesting
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Interesting => write!(f, "answers are different"),
            Outcome::Uninteresting => write!(f, "answers are not different"),
            Outcome::Inconclusive => write!(f, "did not get two answers"),
        }
    }
}

/// Decides whether a candidate exhibits the divergence being minimized
pub trait Oracle {
    fn test(&mut self, candidate: &Candidate) -> Result<Outcome>;
}

impl<F> Oracle for F
where
    F: FnMut(&Candidate) -> Result<Outcome>,
{
    fn test(&mut self, candidate: &Candidate) -> Result<Outcome> {
        self(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_verdicts() {
        let sat = Verdict::Satisfiable;
        let unsat = Verdict::Unsatisfiable;
        let timeout = Verdict::Inconclusive(Inconclusive::Timeout(Duration::from_secs(1)));
        assert_eq!(Outcome::from_verdicts(&sat, &unsat), Outcome::Interesting);
        assert_eq!(Outcome::from_verdicts(&unsat, &unsat), Outcome::Uninteresting);
        assert_eq!(Outcome::from_verdicts(&sat, &timeout), Outcome::Inconclusive);
        assert_eq!(Outcome::from_verdicts(&timeout, &timeout), Outcome::Inconclusive);
    }

    #[test]
    fn test_verdict_display() {
        let failed = Verdict::Inconclusive(Inconclusive::Failed {
            status: Some(2),
            stderr: "bad input\n".into(),
        });
        assert_eq!(failed.to_string(), "inconclusive (failed, exit status 2: bad input)");
        assert_eq!(Verdict::Unsatisfiable.to_string(), "unsat");
    }
}
