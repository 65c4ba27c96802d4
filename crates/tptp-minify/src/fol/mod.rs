//! First-order formula data structures
//!
//! Terms, paths into terms, named formulas, and the simplifier applied after
//! every structural shrink.

pub mod formula;
pub mod position;
pub mod simplify;
pub mod term;


// Re-export commonly used types
pub use formula::{Candidate, Formula, FormulaRole, FormulaSet};
pub use position::TermPath;
pub use simplify::simplify;
pub use term::{is_functor_name, is_variable_name, Connective, Quantifier, Term, FALSE, TRUE};
