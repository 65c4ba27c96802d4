//! tptp-minify: shrink a TPTP problem on which two theorem provers disagree
//!
//! The problem is parsed into one conjunction, confirmed to make the provers
//! give different answers, and then reduced one structural shrink at a time
//! until no single shrink keeps the disagreement while making the problem
//! smaller.

pub mod config;
pub mod error;
pub mod fol;
pub mod oracle;
pub mod parser;
pub mod printer;
pub mod shrink;

pub use config::{MinifyConfig, ProverCommand};
pub use error::{MinifyError, Result};
pub use fol::{Candidate, Formula, FormulaRole, FormulaSet, Term, TermPath};
pub use oracle::{Comparison, DifferentialOracle, Oracle, Outcome, Verdict};
pub use parser::{parse_file, parse_str, Selection};
pub use printer::{render, render_problem, Header};
pub use shrink::{find_shrinks, Minifier, MinifyStats, Progress, Shrink};
