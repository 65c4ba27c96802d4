//! Terms and formulas as a single recursive tree
//!
//! Atoms, functor applications, connectives and quantifiers all share one
//! `Term` type so that structural shrinks can address any node by path.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// The boolean constant `$true`
pub const TRUE: &str = "$true";
/// The boolean constant `$false`
pub const FALSE: &str = "$false";

/// Logical connectives
///
/// Implication and the negated connectives (`<~>`, `~&`, `~|`, `!=`) are
/// desugared by the parser, so they never appear in a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    And,
    Or,
    Not,
    Iff,
    Eq,
}

impl Connective {
    pub fn symbol(self) -> &'static str {
        match self {
            Connective::And => "&",
            Connective::Or => "|",
            Connective::Not => "~",
            Connective::Iff => "<=>",
            Connective::Eq => "=",
        }
    }

    /// `&` and `|` take any number of children
    pub fn is_associative(self) -> bool {
        matches!(self, Connective::And | Connective::Or)
    }
}

/// Quantifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    Forall,
    Exists,
}

impl Quantifier {
    pub fn symbol(self) -> &'static str {
        match self {
            Quantifier::Forall => "!",
            Quantifier::Exists => "?",
        }
    }
}

/// A term or formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Bare identifier: functor, variable, `$`-keyword, quoted atom or number
    Atom(String),
    /// Functor or predicate applied to arguments
    Apply(String, Vec<Term>),
    /// Connective applied to formulas (or to terms, for `=`)
    Connective(Connective, Vec<Term>),
    /// Quantified formula binding the listed variable names in the body
    Quantified(Quantifier, Vec<String>, Box<Term>),
}

/// Lowercase-initial names are functors; their parameters can be removed
pub fn is_functor_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_lowercase)
}

/// Uppercase-initial names are variables
pub fn is_variable_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn apply(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Apply(name.into(), args)
    }

    pub fn and(children: Vec<Term>) -> Self {
        Term::Connective(Connective::And, children)
    }

    pub fn or(children: Vec<Term>) -> Self {
        Term::Connective(Connective::Or, children)
    }

    pub fn not(term: Term) -> Self {
        Term::Connective(Connective::Not, vec![term])
    }

    pub fn iff(left: Term, right: Term) -> Self {
        Term::Connective(Connective::Iff, vec![left, right])
    }

    pub fn eq(left: Term, right: Term) -> Self {
        Term::Connective(Connective::Eq, vec![left, right])
    }

    /// `(~left) | right`
    pub fn implies(left: Term, right: Term) -> Self {
        Term::or(vec![Term::not(left), right])
    }

    pub fn quantified(quantifier: Quantifier, vars: Vec<String>, body: Term) -> Self {
        Term::Quantified(quantifier, vars, Box::new(body))
    }

    /// `$true` or `$false`
    pub fn truth(value: bool) -> Self {
        Term::Atom(if value { TRUE } else { FALSE }.to_string())
    }

    /// The boolean value of `$true`/`$false`, `None` for anything else
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Term::Atom(name) if name == TRUE => Some(true),
            Term::Atom(name) if name == FALSE => Some(false),
            _ => None,
        }
    }

    /// Direct subterms, in path order
    pub fn children(&self) -> &[Term] {
        match self {
            Term::Atom(_) => &[],
            Term::Apply(_, args) => args,
            Term::Connective(_, children) => children,
            Term::Quantified(_, _, body) => std::slice::from_ref(body.as_ref()),
        }
    }

    /// Top-level conjuncts; a term that is not a conjunction is its own only conjunct
    pub fn conjuncts(&self) -> &[Term] {
        match self {
            Term::Connective(Connective::And, children) => children,
            _ => std::slice::from_ref(self),
        }
    }

    /// Number of nodes: every atom, application, connective, quantifier and
    /// bound-variable name counts one.
    pub fn size(&self) -> usize {
        match self {
            Term::Atom(_) => 1,
            Term::Apply(_, args) => 1 + args.iter().map(Term::size).sum::<usize>(),
            Term::Connective(_, children) => 1 + children.iter().map(Term::size).sum::<usize>(),
            Term::Quantified(_, vars, body) => 1 + vars.len() + body.size(),
        }
    }

    /// Functors with their arity, in order of first occurrence.
    ///
    /// Constants are recorded with arity 0. When a name is used with several
    /// arities the first one wins; see [`Term::arity_conflicts`].
    pub fn functors(&self) -> IndexMap<String, usize> {
        let mut table = IndexMap::new();
        self.visit_functors(&mut |name, arity| {
            table.entry(name.to_string()).or_insert(arity);
        });
        table
    }

    /// Functors used with more than one arity, with every arity seen
    pub fn arity_conflicts(&self) -> IndexMap<String, IndexSet<usize>> {
        let mut seen: IndexMap<String, IndexSet<usize>> = IndexMap::new();
        self.visit_functors(&mut |name, arity| {
            seen.entry(name.to_string()).or_default().insert(arity);
        });
        seen.retain(|_, arities| arities.len() > 1);
        seen
    }

    fn visit_functors(&self, f: &mut impl FnMut(&str, usize)) {
        match self {
            Term::Atom(name) => {
                if is_functor_name(name) {
                    f(name, 0);
                }
            }
            Term::Apply(name, args) => {
                if is_functor_name(name) {
                    f(name, args.len());
                }
                for arg in args {
                    arg.visit_functors(f);
                }
            }
            Term::Connective(_, children) => {
                for child in children {
                    child.visit_functors(f);
                }
            }
            Term::Quantified(_, _, body) => body.visit_functors(f),
        }
    }

    /// Free variables in order of first occurrence
    pub fn free_variables(&self) -> Vec<String> {
        let mut free = IndexSet::new();
        let mut bound = Vec::new();
        self.collect_free(&mut bound, &mut free);
        free.into_iter().collect()
    }

    fn collect_free<'a>(&'a self, bound: &mut Vec<&'a str>, free: &mut IndexSet<String>) {
        match self {
            Term::Atom(name) => {
                if is_variable_name(name) && !bound.contains(&name.as_str()) {
                    free.insert(name.clone());
                }
            }
            Term::Apply(_, children) | Term::Connective(_, children) => {
                for child in children {
                    child.collect_free(bound, free);
                }
            }
            Term::Quantified(_, vars, body) => {
                let depth = bound.len();
                bound.extend(vars.iter().map(String::as_str));
                body.collect_free(bound, free);
                bound.truncate(depth);
            }
        }
    }

    /// Check if the formula is closed (no free variables)
    pub fn is_closed(&self) -> bool {
        self.free_variables().is_empty()
    }

    /// Remove argument `index` from every application of `functor`.
    ///
    /// The rewrite is global so all occurrences keep one arity. Applications
    /// left with no arguments stay as empty `Apply` nodes until simplified.
    pub fn without_parameter(&self, functor: &str, index: usize) -> Term {
        match self {
            Term::Atom(_) => self.clone(),
            Term::Apply(name, args) => {
                let mut args: Vec<Term> = args
                    .iter()
                    .map(|arg| arg.without_parameter(functor, index))
                    .collect();
                if name == functor && index < args.len() {
                    args.remove(index);
                }
                Term::Apply(name.clone(), args)
            }
            Term::Connective(op, children) => Term::Connective(
                *op,
                children
                    .iter()
                    .map(|child| child.without_parameter(functor, index))
                    .collect(),
            ),
            Term::Quantified(q, vars, body) => Term::Quantified(
                *q,
                vars.clone(),
                Box::new(body.without_parameter(functor, index)),
            ),
        }
    }
}
