//! Named formulas as loaded from a problem file

use super::term::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TPTP formula role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaRole {
    Axiom,
    Hypothesis,
    Definition,
    Assumption,
    Lemma,
    Theorem,
    Corollary,
    Conjecture,
    NegatedConjecture,
    Plain,
    Type,
    Other(String),
}

impl FormulaRole {
    pub fn from_tptp_role(role: &str) -> Self {
        match role {
            "axiom" => FormulaRole::Axiom,
            "hypothesis" => FormulaRole::Hypothesis,
            "definition" => FormulaRole::Definition,
            "assumption" => FormulaRole::Assumption,
            "lemma" => FormulaRole::Lemma,
            "theorem" => FormulaRole::Theorem,
            "corollary" => FormulaRole::Corollary,
            "conjecture" => FormulaRole::Conjecture,
            "negated_conjecture" => FormulaRole::NegatedConjecture,
            "plain" => FormulaRole::Plain,
            "type" => FormulaRole::Type,
            other => FormulaRole::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormulaRole::Axiom => "axiom",
            FormulaRole::Hypothesis => "hypothesis",
            FormulaRole::Definition => "definition",
            FormulaRole::Assumption => "assumption",
            FormulaRole::Lemma => "lemma",
            FormulaRole::Theorem => "theorem",
            FormulaRole::Corollary => "corollary",
            FormulaRole::Conjecture => "conjecture",
            FormulaRole::NegatedConjecture => "negated_conjecture",
            FormulaRole::Plain => "plain",
            FormulaRole::Type => "type",
            FormulaRole::Other(role) => role,
        }
    }
}

impl fmt::Display for FormulaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named formula.
///
/// The term of a conjecture is stored already negated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    pub role: FormulaRole,
    pub term: Term,
}

/// The formulas of one problem, includes expanded in place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaSet {
    pub formulas: Vec<Formula>,
}

impl FormulaSet {
    pub fn new(formulas: Vec<Formula>) -> Self {
        FormulaSet { formulas }
    }

    /// Formulas named `f1..fN` with role `plain`, one per conjunct of `term`
    pub fn from_conjuncts(term: &Term) -> Self {
        let formulas = term
            .conjuncts()
            .iter()
            .enumerate()
            .map(|(i, conjunct)| Formula {
                name: format!("f{}", i + 1),
                role: FormulaRole::Plain,
                term: conjunct.clone(),
            })
            .collect();
        FormulaSet { formulas }
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Formula> {
        self.formulas.iter()
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.formulas.iter().map(|f| &f.term)
    }

    /// The conjunction of every formula, as one candidate.
    ///
    /// A single formula is its own candidate, without a unary `&` around it.
    pub fn candidate(&self) -> Candidate {
        let mut terms: Vec<Term> = self.terms().cloned().collect();
        let term = if terms.len() == 1 {
            terms.remove(0)
        } else {
            Term::and(terms)
        };
        Candidate::new(term)
    }
}

/// A combined problem term together with its node count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub term: Term,
    pub size: usize,
}

impl Candidate {
    pub fn new(term: Term) -> Self {
        let size = term.size();
        Candidate { term, size }
    }

    pub fn into_formulas(self) -> FormulaSet {
        FormulaSet::from_conjuncts(&self.term)
    }
}
