//! The first-improvement shrink loop

use super::{find_shrinks, Shrink};
use crate::error::{MinifyError, Result};
use crate::fol::{Candidate, FormulaSet};
use crate::oracle::{Oracle, Outcome};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Observer for the user-visible progress of a run
pub trait Progress {
    /// The initial candidate was confirmed interesting
    fn confirmed(&mut self, _candidate: &Candidate) {}

    /// `shrink` was accepted, producing `candidate`
    fn accepted(&mut self, _candidate: &Candidate, _shrink: &Shrink) {}
}

/// Ignores all progress
pub struct NoProgress;

impl Progress for NoProgress {}

/// Counters collected over one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MinifyStats {
    pub initial_size: usize,
    pub final_size: usize,
    /// Rounds of shrink discovery, including the final round without an acceptance
    pub passes: usize,
    pub oracle_calls: usize,
    pub inconclusive: usize,
    /// Shrinks skipped because their result was not smaller
    pub skipped_non_decreasing: usize,
    /// Accepted shrinks per reduction family
    pub accepted: IndexMap<String, usize>,
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Drives a candidate to a fixpoint under an oracle
pub struct Minifier<O: Oracle> {
    oracle: O,
    progress: Box<dyn Progress>,
    stats: MinifyStats,
}

impl<O: Oracle> Minifier<O> {
    pub fn new(oracle: O) -> Self {
        Minifier {
            oracle,
            progress: Box::new(NoProgress),
            stats: MinifyStats::default(),
        }
    }

    pub fn with_progress(mut self, progress: impl Progress + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Minimize a formula set; the result is named `f1..fN`
    pub fn reduce(&mut self, set: &FormulaSet) -> Result<FormulaSet> {
        self.minify(set.candidate()).map(Candidate::into_formulas)
    }

    /// Shrink `initial` until no single shrink yields a smaller interesting
    /// candidate.
    ///
    /// Fails with [`MinifyError::NotInteresting`] when `initial` itself is not
    /// interesting, and with [`MinifyError::Consistency`] when the fixpoint no
    /// longer is on re-verification.
    pub fn minify(&mut self, initial: Candidate) -> Result<Candidate> {
        let start = Instant::now();
        self.stats = MinifyStats {
            initial_size: initial.size,
            ..MinifyStats::default()
        };

        self.stats.oracle_calls += 1;
        let outcome = self.oracle.test(&initial)?;
        if !outcome.is_interesting() {
            return Err(MinifyError::NotInteresting(outcome));
        }
        info!(size = initial.size, "initial candidate is interesting");
        self.progress.confirmed(&initial);

        let mut current = initial;
        while let Some((shrink, next)) = self.pass(&current) {
            info!(%shrink, size = next.size, "accepted");
            *self
                .stats
                .accepted
                .entry(shrink.kind().to_string())
                .or_default() += 1;
            self.progress.accepted(&next, &shrink);
            current = next;
        }

        self.stats.oracle_calls += 1;
        let outcome = self.oracle.test(&current)?;
        self.stats.final_size = current.size;
        self.stats.elapsed = start.elapsed();
        if !outcome.is_interesting() {
            return Err(MinifyError::Consistency(outcome));
        }
        info!(
            size = current.size,
            passes = self.stats.passes,
            calls = self.stats.oracle_calls,
            "fixpoint reached"
        );
        Ok(current)
    }

    /// One discovery round: the first shrink giving a smaller interesting
    /// candidate, if any
    fn pass(&mut self, current: &Candidate) -> Option<(Shrink, Candidate)> {
        self.stats.passes += 1;
        let shrinks = find_shrinks(&current.term);
        debug!(pass = self.stats.passes, shrinks = shrinks.len(), size = current.size, "pass");

        for shrink in shrinks {
            let Some(term) = shrink.apply(&current.term) else {
                continue;
            };
            let candidate = Candidate::new(term);
            if candidate.size >= current.size {
                self.stats.skipped_non_decreasing += 1;
                debug!(%shrink, size = candidate.size, "not smaller, skipped");
                continue;
            }
            match self.consult(&candidate) {
                Outcome::Interesting => return Some((shrink, candidate)),
                Outcome::Uninteresting => debug!(%shrink, "rejected"),
                Outcome::Inconclusive => {
                    self.stats.inconclusive += 1;
                    debug!(%shrink, "rejected, inconclusive");
                }
            }
        }
        None
    }

    /// Oracle failures inside the loop only reject the shrink
    fn consult(&mut self, candidate: &Candidate) -> Outcome {
        self.stats.oracle_calls += 1;
        match self.oracle.test(candidate) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "oracle failed, treating as inconclusive");
                Outcome::Inconclusive
            }
        }
    }

    pub fn stats(&self) -> &MinifyStats {
        &self.stats
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Quantifier, Term};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mentions(term: &Term, name: &str) -> bool {
        match term {
            Term::Atom(atom) => atom == name,
            Term::Apply(functor, _) if functor == name => true,
            _ => term.children().iter().any(|child| mentions(child, name)),
        }
    }

    /// Interesting iff the candidate mentions `name`
    fn mentioning(name: &'static str) -> impl FnMut(&Candidate) -> Result<Outcome> {
        move |candidate: &Candidate| {
            Ok(if mentions(&candidate.term, name) {
                Outcome::Interesting
            } else {
                Outcome::Uninteresting
            })
        }
    }

    fn atoms(names: &[&str]) -> Term {
        Term::and(names.iter().map(|n| Term::atom(*n)).collect())
    }

    #[test]
    fn test_reduces_chain_to_single_conjunct() {
        let mut minifier = Minifier::new(mentioning("c"));
        let result = minifier.minify(Candidate::new(atoms(&["a", "b", "c"]))).unwrap();
        assert_eq!(result.term, Term::atom("c"));
        assert_eq!(result.size, 1);

        let stats = minifier.stats();
        assert_eq!(stats.initial_size, 4);
        assert_eq!(stats.final_size, 1);
        assert_eq!(stats.accepted.get("delete_conjunct"), Some(&2));
        // the third pass finds nothing to try on a lone atom
        assert_eq!(stats.passes, 3);
        assert_eq!(stats.oracle_calls, 4);
    }

    #[test]
    fn test_initial_candidate_must_be_interesting() {
        let mut minifier = Minifier::new(mentioning("z"));
        let err = minifier.minify(Candidate::new(atoms(&["a", "b"]))).unwrap_err();
        assert!(matches!(err, MinifyError::NotInteresting(Outcome::Uninteresting)));
        assert_eq!(minifier.stats().oracle_calls, 1);
    }

    #[test]
    fn test_inconclusive_initial_aborts_before_shrinking() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let oracle = move |_: &Candidate| -> Result<Outcome> {
            *counter.borrow_mut() += 1;
            Ok(Outcome::Inconclusive)
        };
        let err = Minifier::new(oracle)
            .minify(Candidate::new(atoms(&["a", "b"])))
            .unwrap_err();
        assert!(matches!(err, MinifyError::NotInteresting(Outcome::Inconclusive)));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_inconclusive_shrinks_are_rejected() {
        // deleting `a` times out; deleting `b` is fine
        let oracle = |candidate: &Candidate| -> Result<Outcome> {
            Ok(if !mentions(&candidate.term, "a") {
                Outcome::Inconclusive
            } else {
                Outcome::Interesting
            })
        };
        let mut minifier = Minifier::new(oracle);
        let result = minifier.minify(Candidate::new(atoms(&["a", "b"]))).unwrap();
        assert_eq!(result.term, Term::atom("a"));
        assert_eq!(minifier.stats().inconclusive, 1);
    }

    #[test]
    fn test_final_check_failure_is_consistency_error() {
        // interesting for the first three calls only
        let mut calls = 0;
        let oracle = move |_: &Candidate| -> Result<Outcome> {
            calls += 1;
            Ok(if calls <= 3 {
                Outcome::Interesting
            } else {
                Outcome::Uninteresting
            })
        };
        let err = Minifier::new(oracle)
            .minify(Candidate::new(atoms(&["a", "b", "c"])))
            .unwrap_err();
        assert!(matches!(err, MinifyError::Consistency(Outcome::Uninteresting)));
    }

    #[test]
    fn test_substitution_then_deletion() {
        // q & ![X]: p(X), interesting while q survives
        let t = Term::and(vec![
            Term::atom("q"),
            Term::quantified(
                Quantifier::Forall,
                vec!["X".into()],
                Term::apply("p", vec![Term::atom("X")]),
            ),
        ]);
        let result = Minifier::new(mentioning("q")).minify(Candidate::new(t)).unwrap();
        assert_eq!(result.term, Term::atom("q"));
    }

    #[test]
    fn test_reduce_renames_formulas() {
        let set = FormulaSet::from_conjuncts(&atoms(&["a", "b"]));
        let reduced = Minifier::new(mentioning("b")).reduce(&set).unwrap();
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced.formulas[0].name, "f1");
        assert_eq!(reduced.formulas[0].term, Term::atom("b"));
    }

    #[test]
    fn test_progress_sees_every_acceptance() {
        struct Sizes(Rc<RefCell<Vec<usize>>>);
        impl Progress for Sizes {
            fn confirmed(&mut self, candidate: &Candidate) {
                self.0.borrow_mut().push(candidate.size);
            }
            fn accepted(&mut self, candidate: &Candidate, _: &Shrink) {
                self.0.borrow_mut().push(candidate.size);
            }
        }
        let sizes = Rc::new(RefCell::new(Vec::new()));
        Minifier::new(mentioning("d"))
            .with_progress(Sizes(Rc::clone(&sizes)))
            .minify(Candidate::new(atoms(&["a", "b", "c", "d"])))
            .unwrap();
        assert_eq!(*sizes.borrow(), vec![5, 4, 3, 1]);
    }

    #[test]
    fn test_stats_serialize_elapsed_as_seconds() {
        let stats = MinifyStats {
            elapsed: Duration::from_millis(1500),
            ..MinifyStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["elapsed_secs"], 1.5);
    }
}
