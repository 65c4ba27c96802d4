//! Paths into terms.
//!
//! A `TermPath` identifies a node by the sequence of child indices taken from
//! the root. Applications and connectives index their arguments; a quantifier
//! has a single child, its body, at index 0.

use super::term::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A path from the root of a term to one of its nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermPath(pub Vec<usize>);

impl TermPath {
    pub fn root() -> Self {
        TermPath(Vec::new())
    }

    /// The path to child `index` of the node at this path
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        TermPath(path)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for TermPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}

impl Term {
    /// The subterm at `path`, if the path exists
    pub fn subterm(&self, path: &[usize]) -> Option<&Term> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.children().get(i)?.subterm(rest),
        }
    }

    /// A copy of this term with the node at `path` replaced
    pub fn replace_at(&self, path: &[usize], replacement: Term) -> Option<Term> {
        let Some((&i, rest)) = path.split_first() else {
            return Some(replacement);
        };
        Some(match self {
            Term::Atom(_) => return None,
            Term::Apply(name, args) => Term::Apply(name.clone(), replace_child(args, i, rest, replacement)?),
            Term::Connective(op, children) => {
                Term::Connective(*op, replace_child(children, i, rest, replacement)?)
            }
            Term::Quantified(q, vars, body) => {
                if i != 0 {
                    return None;
                }
                Term::Quantified(*q, vars.clone(), Box::new(body.replace_at(rest, replacement)?))
            }
        })
    }

    /// A copy of this term with the node at `path` removed from its parent.
    ///
    /// Only children of applications and connectives can be removed; the
    /// root and quantifier bodies cannot.
    pub fn delete_at(&self, path: &[usize]) -> Option<Term> {
        let (&last, parent) = path.split_last()?;
        let target = self.subterm(parent)?;
        let pruned = match target {
            Term::Apply(name, args) if last < args.len() => {
                let mut args = args.clone();
                args.remove(last);
                Term::Apply(name.clone(), args)
            }
            Term::Connective(op, children) if last < children.len() => {
                let mut children = children.clone();
                children.remove(last);
                Term::Connective(*op, children)
            }
            _ => return None,
        };
        self.replace_at(parent, pruned)
    }
}

fn replace_child(children: &[Term], i: usize, rest: &[usize], replacement: Term) -> Option<Vec<Term>> {
    let mut children = children.to_vec();
    let child = children.get(i)?.replace_at(rest, replacement)?;
    children[i] = child;
    Some(children)
}
