//! Structural reductions of a candidate term
//!
//! Discovery is recomputed on every pass, since an accepted shrink
//! invalidates the paths of the previous one.

pub mod engine;

pub use engine::{Minifier, MinifyStats, NoProgress, Progress};

use crate::fol::{simplify, Connective, Term, TermPath};
use serde::Serialize;
use std::fmt;

/// One candidate mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Shrink {
    /// Remove the node at this path from its enclosing `&`/`|`
    DeleteConjunct(TermPath),
    /// Replace a quantifier body, addressed by its path, with `$true`/`$false`
    SubstituteBoolean(TermPath, bool),
    /// Drop argument `index` from every application of `functor`
    RemoveFunctorParameter { functor: String, index: usize },
}

impl Shrink {
    /// Stable name of the reduction family
    pub fn kind(&self) -> &'static str {
        match self {
            Shrink::DeleteConjunct(_) => "delete_conjunct",
            Shrink::SubstituteBoolean(..) => "substitute_boolean",
            Shrink::RemoveFunctorParameter { .. } => "remove_functor_parameter",
        }
    }

    /// The simplified result of applying this shrink to `term`, or `None`
    /// when it does not fit the term's shape.
    pub fn apply(&self, term: &Term) -> Option<Term> {
        let shrunk = match self {
            Shrink::DeleteConjunct(path) => {
                let (_, parent) = path.as_slice().split_last()?;
                match term.subterm(parent)? {
                    Term::Connective(Connective::And | Connective::Or, _) => {
                        term.delete_at(path.as_slice())?
                    }
                    _ => return None,
                }
            }
            Shrink::SubstituteBoolean(path, value) => {
                term.replace_at(path.as_slice(), Term::truth(*value))?
            }
            Shrink::RemoveFunctorParameter { functor, index } => {
                term.without_parameter(functor, *index)
            }
        };
        Some(simplify(shrunk))
    }
}

impl fmt::Display for Shrink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shrink::DeleteConjunct(path) => write!(f, "delete {}", path),
            Shrink::SubstituteBoolean(path, value) => {
                write!(f, "substitute {} at {}", Term::truth(*value), path)
            }
            Shrink::RemoveFunctorParameter { functor, index } => {
                write!(f, "remove parameter {} of {}", index, functor)
            }
        }
    }
}

/// Every shrink applicable to `term`, in the order they are tried:
/// deletions, then boolean substitutions, then parameter removals.
pub fn find_shrinks(term: &Term) -> Vec<Shrink> {
    let mut deletes = Vec::new();
    let mut substitutions = Vec::new();
    collect_positional(term, TermPath::root(), &mut deletes, &mut substitutions);

    let mut shrinks = deletes;
    shrinks.append(&mut substitutions);
    for (functor, arity) in term.functors() {
        for index in 0..arity {
            shrinks.push(Shrink::RemoveFunctorParameter {
                functor: functor.clone(),
                index,
            });
        }
    }
    shrinks
}

fn collect_positional(
    term: &Term,
    path: TermPath,
    deletes: &mut Vec<Shrink>,
    substitutions: &mut Vec<Shrink>,
) {
    match term {
        Term::Connective(Connective::And | Connective::Or, children) => {
            for i in 0..children.len() {
                deletes.push(Shrink::DeleteConjunct(path.child(i)));
            }
        }
        Term::Quantified(..) => {
            let body = path.child(0);
            substitutions.push(Shrink::SubstituteBoolean(body.clone(), true));
            substitutions.push(Shrink::SubstituteBoolean(body, false));
        }
        _ => {}
    }
    for (i, child) in term.children().iter().enumerate() {
        collect_positional(child, path.child(i), deletes, substitutions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Quantifier;

    fn var(name: &str) -> Term {
        Term::atom(name)
    }

    fn forall_p() -> Term {
        Term::quantified(
            Quantifier::Forall,
            vec!["X".into()],
            Term::apply("p", vec![var("X")]),
        )
    }

    #[test]
    fn test_discovery_order() {
        // q & ![X]: p(X)
        let t = Term::and(vec![Term::atom("q"), forall_p()]);
        let shrinks = find_shrinks(&t);
        assert_eq!(
            shrinks,
            vec![
                Shrink::DeleteConjunct(TermPath(vec![0])),
                Shrink::DeleteConjunct(TermPath(vec![1])),
                Shrink::SubstituteBoolean(TermPath(vec![1, 0]), true),
                Shrink::SubstituteBoolean(TermPath(vec![1, 0]), false),
                Shrink::RemoveFunctorParameter {
                    functor: "p".into(),
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn test_delete_collapses_unary_chain() {
        let t = Term::or(vec![Term::atom("a"), Term::atom("b")]);
        let shrunk = Shrink::DeleteConjunct(TermPath(vec![0])).apply(&t).unwrap();
        assert_eq!(shrunk, Term::atom("b"));
    }

    #[test]
    fn test_delete_requires_chain_parent() {
        let t = Term::apply("f", vec![Term::atom("a"), Term::atom("b")]);
        assert_eq!(Shrink::DeleteConjunct(TermPath(vec![0])).apply(&t), None);
        assert_eq!(Shrink::DeleteConjunct(TermPath::root()).apply(&t), None);
    }

    #[test]
    fn test_parameter_removal_is_global() {
        // p(f(X,Y)) | q(f(Z,W))
        let t = Term::or(vec![
            Term::apply("p", vec![Term::apply("f", vec![var("X"), var("Y")])]),
            Term::apply("q", vec![Term::apply("f", vec![var("Z"), var("W")])]),
        ]);
        let shrink = Shrink::RemoveFunctorParameter {
            functor: "f".into(),
            index: 1,
        };
        let shrunk = shrink.apply(&t).unwrap();
        assert_eq!(shrunk.to_string(), "p(f(X)) | q(f(Z))");
        assert!(shrunk.arity_conflicts().is_empty());
        assert_eq!(shrunk.functors().get("f"), Some(&1));
    }

    #[test]
    fn test_last_parameter_leaves_constant() {
        let t = Term::apply("p", vec![Term::atom("a")]);
        let shrink = Shrink::RemoveFunctorParameter {
            functor: "p".into(),
            index: 0,
        };
        assert_eq!(shrink.apply(&t), Some(Term::atom("p")));
    }

    #[test]
    fn test_substitute_true_folds_into_siblings() {
        let t = Term::and(vec![Term::atom("q"), forall_p()]);
        let shrunk = Shrink::SubstituteBoolean(TermPath(vec![1, 0]), true)
            .apply(&t)
            .unwrap();
        assert_eq!(shrunk, Term::atom("q"));

        let shrunk = Shrink::SubstituteBoolean(TermPath(vec![0]), true)
            .apply(&forall_p())
            .unwrap();
        assert_eq!(shrunk, Term::truth(true));
    }

    #[test]
    fn test_display() {
        let shrink = Shrink::SubstituteBoolean(TermPath(vec![2, 0]), false);
        assert_eq!(shrink.to_string(), "substitute $false at [2.0]");
        assert_eq!(shrink.kind(), "substitute_boolean");
    }
}
