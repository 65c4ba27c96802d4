//! Recursive-descent TPTP parser producing the term representation
//!
//! Supports `cnf`, `fof`, `tff` and `tcf` annotated formulas and `include`
//! directives. `type` records are skipped without being interpreted and
//! conjectures are negated as they are read.

use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{MinifyError, Result};
use crate::fol::{Formula, FormulaRole, FormulaSet, Quantifier, Term};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which formulas to keep, by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Names(HashSet<String>),
}

impl Selection {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn selects(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Names(names) => names.contains(name),
        }
    }
}

/// Parse a TPTP file
///
/// Args:
///   - path: the problem file
///   - include_root: directory `include` paths are resolved against
///   - selection: names of the formulas to keep
pub fn parse_file(path: &Path, include_root: Option<&Path>, selection: &Selection) -> Result<FormulaSet> {
    let mut loader = Loader::new(include_root);
    loader.load_file(path, selection)?;
    Ok(FormulaSet::new(loader.formulas))
}

/// Parse TPTP text; `include` directives still read from `include_root`
pub fn parse_str(input: &str, include_root: Option<&Path>) -> Result<FormulaSet> {
    let mut loader = Loader::new(include_root);
    loader.load_text(input, "<input>", &Selection::All)?;
    Ok(FormulaSet::new(loader.formulas))
}

/// Shared state across a file and everything it includes
struct Loader {
    include_root: Option<PathBuf>,
    /// Files currently being parsed, outermost first
    stack: Vec<PathBuf>,
    formulas: Vec<Formula>,
}

impl Loader {
    fn new(include_root: Option<&Path>) -> Self {
        Loader {
            include_root: include_root.map(Path::to_path_buf),
            stack: Vec::new(),
            formulas: Vec::new(),
        }
    }

    fn load_file(&mut self, path: &Path, selection: &Selection) -> Result<()> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if self.stack.contains(&key) {
            return Err(MinifyError::CircularInclude(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|e| MinifyError::io(path, e))?;
        debug!(file = %path.display(), "parsing");

        self.stack.push(key);
        let result = self.load_text(&text, &path.display().to_string(), selection);
        self.stack.pop();
        result
    }

    fn load_text(&mut self, text: &str, file: &str, selection: &Selection) -> Result<()> {
        let mut parser = Parser::new(text, file, selection, self)?;
        parser.parse_problem()
    }
}

/// Parser state: the lexer and the current token
struct Parser<'a, 'l> {
    file: &'a str,
    lexer: Lexer<'a>,
    tok: Token<'a>,
    selection: &'a Selection,
    loader: &'l mut Loader,
}

impl<'a, 'l> Parser<'a, 'l> {
    fn new(text: &'a str, file: &'a str, selection: &'a Selection, loader: &'l mut Loader) -> Result<Self> {
        let mut lexer = Lexer::new(text);
        let tok = lexer.next_token().map_err(|e| MinifyError::Syntax {
            file: file.to_string(),
            line: e.line,
            token: String::new(),
            message: e.message.to_string(),
        })?;
        Ok(Parser {
            file,
            lexer,
            tok,
            selection,
            loader,
        })
    }

    fn error(&self, message: impl Into<String>) -> MinifyError {
        MinifyError::Syntax {
            file: self.file.to_string(),
            line: self.tok.line,
            token: self.tok.text.to_string(),
            message: message.into(),
        }
    }

    fn lex(&mut self) -> Result<()> {
        self.tok = self.lexer.next_token().map_err(|e| MinifyError::Syntax {
            file: self.file.to_string(),
            line: e.line,
            token: self.tok.text.to_string(),
            message: e.message.to_string(),
        })?;
        Ok(())
    }

    fn at(&self, text: &str) -> bool {
        self.tok.kind != TokenKind::Eof && self.tok.text == text
    }

    fn eat(&mut self, text: &str) -> Result<bool> {
        if self.at(text) {
            self.lex()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, text: &str) -> Result<()> {
        if !self.at(text) {
            return Err(self.error(format!("expected '{}'", text)));
        }
        self.lex()
    }

    // Top level

    fn parse_problem(&mut self) -> Result<()> {
        while self.tok.kind != TokenKind::Eof {
            match self.tok.text {
                "cnf" | "fof" | "tff" | "tcf" => self.annotated_formula()?,
                "include" => self.include()?,
                _ => return Err(self.error("unknown language")),
            }
        }
        Ok(())
    }

    fn annotated_formula(&mut self) -> Result<()> {
        self.lex()?;
        self.expect("(")?;

        let name = self.name()?;
        self.expect(",")?;

        let role = FormulaRole::from_tptp_role(self.name()?.as_str());
        self.expect(",")?;

        if role == FormulaRole::Type {
            while !self.at(")") {
                self.skip_balanced()?;
            }
        } else {
            let term = self.logic_formula()?;
            if self.selection.selects(&name) {
                let term = if role == FormulaRole::Conjecture {
                    Term::not(term)
                } else {
                    term
                };
                self.loader.formulas.push(Formula { name, role, term });
            }
        }

        // annotations
        if self.at(",") {
            while !self.at(")") {
                self.skip_balanced()?;
            }
        }

        self.expect(")")?;
        self.expect(".")
    }

    fn include(&mut self) -> Result<()> {
        self.lex()?;
        self.expect("(")?;

        let Some(root) = self.loader.include_root.clone() else {
            return Err(MinifyError::Environment(format!(
                "{}:{}: include root not configured (set TPTP or pass --tptp)",
                self.file, self.tok.line
            )));
        };

        if self.tok.kind != TokenKind::Quoted {
            return Err(self.error("expected file name"));
        }
        let file_name = unquote(self.tok.text).to_string();
        self.lex()?;

        let selection = if self.eat(",")? {
            self.expect("[")?;
            let mut names = HashSet::new();
            loop {
                let name = self.name()?;
                if self.selection.selects(&name) {
                    names.insert(name);
                }
                if !self.eat(",")? {
                    break;
                }
            }
            self.expect("]")?;
            Selection::Names(names)
        } else {
            self.selection.clone()
        };

        self.expect(")")?;
        self.expect(".")?;

        self.loader.load_file(&root.join(file_name), &selection)
    }

    /// Skip one token, or a whole parenthesized group
    fn skip_balanced(&mut self) -> Result<()> {
        if self.tok.kind == TokenKind::Eof {
            return Err(self.error("unexpected end of file"));
        }
        if self.eat("(")? {
            while !self.eat(")")? {
                self.skip_balanced()?;
            }
            return Ok(());
        }
        self.lex()
    }

    /// Formula name or role: a word, quoted atom or integer
    fn name(&mut self) -> Result<String> {
        if !self.tok.is_atomic() {
            return Err(self.error("expected name"));
        }
        let name = self.tok.text.to_string();
        self.lex()?;
        Ok(name)
    }

    // Terms

    fn args(&mut self) -> Result<Vec<Term>> {
        self.expect("(")?;
        let mut args = Vec::new();
        if !self.at(")") {
            args.push(self.atomic_term()?);
            while self.eat(",")? {
                args.push(self.atomic_term()?);
            }
        }
        self.expect(")")?;
        Ok(args)
    }

    fn atomic_term(&mut self) -> Result<Term> {
        if !self.tok.is_atomic() {
            return Err(self.error("expected term"));
        }
        let name = self.tok.text;

        // $greater(a,b) is $less(b,a), likewise $greatereq
        let flipped = match name {
            "$greater" => Some("$less"),
            "$greatereq" => Some("$lesseq"),
            _ => None,
        };
        if let Some(flipped) = flipped {
            self.lex()?;
            let mut args = self.args()?;
            if args.len() != 2 {
                return Err(self.error(format!("{} takes two arguments", name)));
            }
            args.swap(0, 1);
            return Ok(Term::apply(flipped, args));
        }

        self.lex()?;
        if self.at("(") {
            let args = self.args()?;
            if args.is_empty() {
                return Ok(Term::atom(name));
            }
            return Ok(Term::apply(name, args));
        }
        Ok(Term::atom(name))
    }

    fn infix_unary(&mut self) -> Result<Term> {
        let left = self.atomic_term()?;
        if self.eat("=")? {
            let right = self.atomic_term()?;
            return Ok(Term::eq(left, right));
        }
        if self.eat("!=")? {
            let right = self.atomic_term()?;
            return Ok(Term::not(Term::eq(left, right)));
        }
        Ok(left)
    }

    // Formulas

    fn unitary_formula(&mut self) -> Result<Term> {
        if self.eat("(")? {
            let formula = self.logic_formula()?;
            self.expect(")")?;
            return Ok(formula);
        }
        if self.eat("~")? {
            return Ok(Term::not(self.unitary_formula()?));
        }
        let quantifier = match self.tok.text {
            "!" if self.tok.kind == TokenKind::Punct => Some(Quantifier::Forall),
            "?" if self.tok.kind == TokenKind::Punct => Some(Quantifier::Exists),
            _ => None,
        };
        if let Some(quantifier) = quantifier {
            self.lex()?;
            let vars = self.variables()?;
            self.expect(":")?;
            let body = self.unitary_formula()?;
            return Ok(Term::quantified(quantifier, vars, body));
        }
        self.infix_unary()
    }

    fn variables(&mut self) -> Result<Vec<String>> {
        self.expect("[")?;
        let mut vars = Vec::new();
        loop {
            if self.tok.kind != TokenKind::Word {
                return Err(self.error("expected variable"));
            }
            vars.push(self.tok.text.to_string());
            self.lex()?;
            // tff variable type, dropped
            if self.eat(":")? {
                self.skip_balanced()?;
            }
            if !self.eat(",")? {
                break;
            }
        }
        self.expect("]")?;
        Ok(vars)
    }

    fn logic_formula(&mut self) -> Result<Term> {
        let left = self.unitary_formula()?;
        if self.tok.kind != TokenKind::Punct {
            return Ok(left);
        }
        match self.tok.text {
            op @ ("&" | "|") => {
                let mut children = vec![left];
                while self.eat(op)? {
                    children.push(self.unitary_formula()?);
                }
                Ok(if op == "&" {
                    Term::and(children)
                } else {
                    Term::or(children)
                })
            }
            "<=>" => {
                self.lex()?;
                Ok(Term::iff(left, self.logic_formula()?))
            }
            "=>" => {
                self.lex()?;
                Ok(Term::implies(left, self.logic_formula()?))
            }
            "<=" => {
                self.lex()?;
                Ok(Term::implies(self.logic_formula()?, left))
            }
            "<~>" => {
                self.lex()?;
                Ok(Term::not(Term::iff(left, self.logic_formula()?)))
            }
            "~&" => {
                self.lex()?;
                Ok(Term::not(Term::and(vec![left, self.logic_formula()?])))
            }
            "~|" => {
                self.lex()?;
                Ok(Term::not(Term::or(vec![left, self.logic_formula()?])))
            }
            _ => Ok(left),
        }
    }
}

/// Strip the quotes from a quoted atom
fn unquote(text: &str) -> &str {
    if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
