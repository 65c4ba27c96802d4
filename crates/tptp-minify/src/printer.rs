//! TPTP output
//!
//! Formulas are written with fresh names `f1..fN` and role `plain`, as `cnf`
//! when they have free variables and `fof` otherwise.

use crate::fol::{Connective, FormulaSet, Term};
use std::fmt::{self, Write};

/// Comment block identifying where a minified problem came from
#[derive(Debug, Clone)]
pub struct Header {
    pub source: String,
    pub first_prover: String,
    pub second_prover: String,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "% Minified version of:")?;
        writeln!(f, "% {}", self.source)?;
        writeln!(f, "% Different answers from:")?;
        writeln!(f, "% {}", self.first_prover)?;
        writeln!(f, "% {}", self.second_prover)
    }
}

/// Render a formula set, one record per formula
pub fn render(set: &FormulaSet) -> String {
    render_terms(set.terms(), None)
}

/// Render a combined problem term, one record per top-level conjunct
pub fn render_problem(term: &Term, header: Option<&Header>) -> String {
    render_terms(term.conjuncts().iter(), header)
}

fn render_terms<'a>(terms: impl Iterator<Item = &'a Term>, header: Option<&Header>) -> String {
    let mut out = String::new();
    if let Some(header) = header {
        // writing to a String cannot fail
        let _ = write!(out, "{}", header);
    }
    for (i, term) in terms.enumerate() {
        let language = if term.is_closed() { "fof" } else { "cnf" };
        let _ = writeln!(out, "{}(f{}, plain, {}).", language, i + 1, term);
    }
    out
}

/// Whether `term` must be parenthesized as a child of `parent`
fn needs_parens(term: &Term, parent: Option<&Term>) -> bool {
    let binary = matches!(
        term,
        Term::Connective(Connective::And | Connective::Or | Connective::Iff, _)
    );
    let tight_parent = matches!(
        parent,
        Some(Term::Connective(
            Connective::And | Connective::Or | Connective::Iff | Connective::Not,
            _
        )) | Some(Term::Quantified(..))
    );
    binary && tight_parent
}

fn write_term(f: &mut fmt::Formatter<'_>, term: &Term, parent: Option<&Term>) -> fmt::Result {
    match term {
        Term::Atom(name) => f.write_str(name),
        Term::Apply(name, args) => {
            write!(f, "{}(", name)?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write_term(f, arg, Some(term))?;
            }
            f.write_str(")")
        }
        Term::Connective(Connective::Eq, children) if children.len() == 2 => {
            write_term(f, &children[0], Some(term))?;
            f.write_str("=")?;
            write_term(f, &children[1], Some(term))
        }
        Term::Connective(Connective::Not, children) if children.len() == 1 => {
            f.write_str("~")?;
            write_term(f, &children[0], Some(term))
        }
        Term::Connective(op, children) => {
            let parens = needs_parens(term, parent);
            if parens {
                f.write_str("(")?;
            }
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op.symbol())?;
                }
                write_term(f, child, Some(term))?;
            }
            if parens {
                f.write_str(")")?;
            }
            Ok(())
        }
        Term::Quantified(q, vars, body) => {
            write!(f, "{}[{}]:", q.symbol(), vars.join(","))?;
            write_term(f, body, Some(term))
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_term(f, self, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Quantifier;

    fn a() -> Term {
        Term::atom("a")
    }

    fn b() -> Term {
        Term::atom("b")
    }

    #[test]
    fn test_top_level_chain_has_no_parens() {
        assert_eq!(Term::and(vec![a(), b(), Term::atom("c")]).to_string(), "a & b & c");
    }

    #[test]
    fn test_nested_connectives_are_parenthesized() {
        let t = Term::or(vec![Term::and(vec![a(), b()]), Term::iff(a(), b())]);
        assert_eq!(t.to_string(), "(a & b) | (a <=> b)");
        let t = Term::and(vec![Term::and(vec![a(), b()]), a()]);
        assert_eq!(t.to_string(), "(a & b) & a");
    }

    #[test]
    fn test_negation_and_quantifier_children() {
        let t = Term::and(vec![
            Term::not(Term::or(vec![a(), b()])),
            Term::quantified(
                Quantifier::Exists,
                vec!["X".into(), "Y".into()],
                Term::and(vec![
                    Term::apply("p", vec![Term::atom("X")]),
                    Term::not(Term::eq(Term::atom("X"), Term::atom("Y"))),
                ]),
            ),
        ]);
        assert_eq!(t.to_string(), "~(a | b) & ?[X,Y]:(p(X) & ~X=Y)");
    }

    #[test]
    fn test_render_problem_splits_conjuncts() {
        let t = Term::and(vec![
            Term::apply("p", vec![Term::atom("X")]),
            Term::not(Term::apply("p", vec![a()])),
        ]);
        let header = Header {
            source: "in.p".into(),
            first_prover: "prover1 -x".into(),
            second_prover: "prover2".into(),
        };
        let text = render_problem(&t, Some(&header));
        assert_eq!(
            text,
            "% Minified version of:\n% in.p\n% Different answers from:\n% prover1 -x\n% prover2\n\
             cnf(f1, plain, p(X)).\nfof(f2, plain, ~p(a)).\n"
        );
    }

    #[test]
    fn test_render_single_formula() {
        let text = render_problem(&Term::atom("target"), None);
        assert_eq!(text, "fof(f1, plain, target).\n");
    }
}
