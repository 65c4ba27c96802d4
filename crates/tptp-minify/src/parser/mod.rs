//! TPTP lexer and parser

pub mod lexer;
pub mod tptp;

// Re-export main parsing functions and types
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use tptp::{parse_file, parse_str, Selection};
