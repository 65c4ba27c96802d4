//! TPTP tokenizer built from nom recognisers
//!
//! Whitespace and `%`, `#` and `/* */` comments are skipped. Every other
//! lexeme becomes one token tagged with the line it starts on.

use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_until, take_while},
    character::complete::{char, digit0, multispace1, one_of, satisfy},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

/// Token class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `[A-Za-z$][A-Za-z0-9_]*`
    Word,
    /// `'...'` or `"..."`, quotes included
    Quoted,
    /// Integer, rational or real
    Number,
    Punct,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: usize,
}

impl Token<'_> {
    /// Whether this token can stand for a term
    pub fn is_atomic(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Quoted | TokenKind::Number)
    }
}

/// A lexical error: unterminated comment or quoted atom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: usize,
    pub message: &'static str,
}

pub struct Lexer<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            rest: input,
            line: 1,
        }
    }

    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.skip_trivia()?;
        if self.rest.is_empty() {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: "",
                line: self.line,
            });
        }

        let (kind, result) = if let Ok(r) = word(self.rest) {
            (TokenKind::Word, r)
        } else if self.rest.starts_with(['\'', '"']) {
            match quoted(self.rest) {
                Ok(r) => (TokenKind::Quoted, r),
                Err(_) => return Err(self.error("unterminated quoted atom")),
            }
        } else if let Ok(r) = number(self.rest) {
            (TokenKind::Number, r)
        } else {
            match punct(self.rest) {
                Ok(r) => (TokenKind::Punct, r),
                Err(_) => return Err(self.error("unexpected character")),
            }
        };

        let (rest, text) = result;
        let token = Token {
            kind,
            text,
            line: self.line,
        };
        self.advance(rest, text);
        Ok(token)
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            let skipped = alt((multispace1, line_comment, block_comment))(self.rest);
            match skipped {
                Ok((rest, text)) => self.advance(rest, text),
                Err(_) if self.rest.starts_with("/*") => {
                    return Err(self.error("unterminated block comment"))
                }
                Err(_) => return Ok(()),
            }
        }
    }

    fn advance(&mut self, rest: &'a str, consumed: &str) {
        self.line += consumed.matches('\n').count();
        self.rest = rest;
    }

    fn error(&self, message: &'static str) -> LexError {
        LexError {
            line: self.line,
            message,
        }
    }
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(one_of("%#"), take_while(|c: char| c != '\n')))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '$'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// A quoted atom; a backslash escapes the following character
fn quoted(input: &str) -> IResult<&str, &str> {
    let (_, quote) = one_of("'\"")(input)?;
    let mut chars = input.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            let end = i + c.len_utf8();
            return Ok((&input[end..], &input[..end]));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// `-?digit alnum*` followed by a rational `/digits` or a real `.alnum*` tail
/// with an optional signed exponent
fn number(input: &str) -> IResult<&str, &str> {
    let (rest, _) = recognize(tuple((
        opt(char('-')),
        satisfy(|c| c.is_ascii_digit()),
        take_while(|c: char| c.is_alphanumeric()),
    )))(input)?;

    let rest = match recognize(pair(char::<_, nom::error::Error<_>>('/'), digit0))(rest) {
        Ok((rest, _)) => rest,
        Err(_) => {
            let (rest, _) = opt(recognize(pair(
                char('.'),
                take_while(|c: char| c.is_alphanumeric()),
            )))(rest)?;
            let mantissa = &input[..input.len() - rest.len()];
            if mantissa.ends_with(['e', 'E']) {
                let (rest, _) = opt(recognize(pair(one_of("+-"), digit0)))(rest)?;
                rest
            } else {
                rest
            }
        }
    };

    Ok((rest, &input[..input.len() - rest.len()]))
}

/// Multi-character operators are matched before single characters
fn punct(input: &str) -> IResult<&str, &str> {
    alt((
        tag("<=>"),
        tag("<~>"),
        tag("!="),
        tag("=>"),
        tag("<="),
        tag("~&"),
        tag("~|"),
        take(1usize),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            if tok.kind == TokenKind::Eof {
                return out;
            }
            out.push((tok.kind, tok.text.to_string()));
        }
    }

    fn texts(input: &str) -> Vec<String> {
        tokens(input).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            texts("fof(a1,axiom,p(X)<=>~$true)."),
            vec!["fof", "(", "a1", ",", "axiom", ",", "p", "(", "X", ")", "<=>", "~", "$true", ")", "."]
        );
    }

    #[test]
    fn test_multichar_operators_are_greedy() {
        assert_eq!(
            texts("a<~>b a~&b a~|b X!=Y a=>b a<=b"),
            vec!["a", "<~>", "b", "a", "~&", "b", "a", "~|", "b", "X", "!=", "Y", "a", "=>", "b", "a", "<=", "b"]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let input = "% line comment\n# hash comment\n/* block\ncomment */ p";
        let mut lexer = Lexer::new(input);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.text, "p");
        assert_eq!(tok.line, 4);
    }

    #[test]
    fn test_quoted_atoms() {
        let toks = tokens(r#"'it''s' 'a\'b' "distinct""#);
        assert_eq!(
            toks,
            vec![
                (TokenKind::Quoted, "'it'".to_string()),
                (TokenKind::Quoted, "'s'".to_string()),
                (TokenKind::Quoted, r"'a\'b'".to_string()),
                (TokenKind::Quoted, "\"distinct\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let toks = tokens("42 -7 1/3 2.5 1.0e-10 3E+2");
        let expected = ["42", "-7", "1/3", "2.5", "1.0e-10", "3E+2"];
        assert_eq!(toks.len(), expected.len());
        for ((kind, text), want) in toks.iter().zip(expected) {
            assert_eq!(*kind, TokenKind::Number);
            assert_eq!(text, want);
        }
    }

    #[test]
    fn test_minus_without_digit_is_punctuation() {
        assert_eq!(texts("- a"), vec!["-", "a"]);
    }

    #[test]
    fn test_unterminated_input() {
        assert!(Lexer::new("'open").next_token().is_err());
        let err = Lexer::new("\n/* never closed").next_token().unwrap_err();
        assert_eq!(err.line, 2);
    }
}
