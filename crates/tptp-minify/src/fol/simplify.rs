//! Local normalization applied after every shrink
//!
//! `simplify` is bottom-up and never grows a term. Every node it returns is
//! already in normal form, which makes it idempotent.

use super::term::{Connective, Term};

/// Normalize a term.
///
/// - applications left without arguments become atoms
/// - `~~x` becomes `x`, `~$true` becomes `$false` and vice versa
/// - `&`/`|` drop their unit constant, collapse to their absorbing constant,
///   splice in same-operator children, and collapse when one child is left
/// - a quantifier over a boolean constant is that constant
pub fn simplify(term: Term) -> Term {
    match term {
        Term::Atom(_) => term,
        Term::Apply(name, args) => {
            if args.is_empty() {
                Term::Atom(name)
            } else {
                Term::Apply(name, args.into_iter().map(simplify).collect())
            }
        }
        Term::Quantified(q, vars, body) => {
            let body = simplify(*body);
            if body.as_bool().is_some() {
                body
            } else {
                Term::Quantified(q, vars, Box::new(body))
            }
        }
        Term::Connective(Connective::Not, mut children) if children.len() == 1 => {
            simplify_not(simplify(children.remove(0)))
        }
        Term::Connective(op, children) if op.is_associative() => {
            simplify_chain(op, children.into_iter().map(simplify).collect())
        }
        Term::Connective(op, children) => {
            Term::Connective(op, children.into_iter().map(simplify).collect())
        }
    }
}

fn simplify_not(child: Term) -> Term {
    if let Some(value) = child.as_bool() {
        return Term::truth(!value);
    }
    match child {
        Term::Connective(Connective::Not, mut inner) if inner.len() == 1 => inner.remove(0),
        other => Term::not(other),
    }
}

fn simplify_chain(op: Connective, children: Vec<Term>) -> Term {
    // `&` keeps going on $true and stops on $false; `|` the other way round
    let unit = op == Connective::And;

    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        match child.as_bool() {
            Some(value) if value == unit => continue,
            Some(_) => return Term::truth(!unit),
            None => {}
        }
        match child {
            Term::Connective(inner, grandchildren) if inner == op => kept.extend(grandchildren),
            other => kept.push(other),
        }
    }

    match kept.len() {
        0 => Term::truth(unit),
        1 => kept.remove(0),
        _ => Term::Connective(op, kept),
    }
}
