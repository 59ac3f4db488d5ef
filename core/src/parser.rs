use std::io::BufRead;

use crate::error::{Error, Result};
use crate::interner::Interner;
use crate::language::{Expr, Keyword};
use crate::lexer::{Lexer, Token};

// ============================================================================
// Atom Classification
// ============================================================================

/// Turn raw token text into a typed atom. Order matters: numeric-looking
/// text never becomes a symbol and `#:` text is never parsed as a number.
pub fn classify(token: &str, interner: &Interner) -> Expr {
    match token {
        "#t" => return Expr::Bool(true),
        "#f" => return Expr::Bool(false),
        "nil" => return Expr::Nil,
        _ => {}
    }

    if let Some(quoted) = token.strip_prefix('"') {
        // The tokenizer only emits complete strings, closing quote included.
        let content = quoted.strip_suffix('"').unwrap_or(quoted);
        return Expr::Str(content.to_string());
    }

    if let Some(name) = token.strip_prefix("#:") {
        return Expr::Keyword(Keyword::new(name));
    }

    let digits = strip_digit_separators(token);
    let numeric = digits.as_deref().unwrap_or(token);

    if let Ok(n) = numeric.parse::<i64>() {
        return Expr::Int(n);
    }

    if let Ok(x) = numeric.parse::<f64>() {
        return Expr::Float(x);
    }

    Expr::Symbol(interner.intern(token))
}

/// `1_000` reads as `1000`. An underscore must sit between two digits,
/// otherwise the token is left alone.
fn strip_digit_separators(token: &str) -> Option<String> {
    if !token.contains('_') {
        return None;
    }
    let bytes = token.as_bytes();
    let separated = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'_'
            || (i > 0
                && i + 1 < bytes.len()
                && bytes[i - 1].is_ascii_digit()
                && bytes[i + 1].is_ascii_digit())
    });
    separated.then(|| token.replace('_', ""))
}

// ============================================================================
// Reader
// ============================================================================

/// Deepest list nesting the reader accepts.
pub const MAX_NESTING: usize = 512;

/// Reads successive top-level forms from a stream.
pub struct Reader<R> {
    lexer: Lexer<R>,
    interner: Interner,
}

impl<R: BufRead> Reader<R> {
    pub fn new(input: R, interner: Interner) -> Self {
        Reader {
            lexer: Lexer::new(input),
            interner,
        }
    }

    /// Read the next complete form, or `None` once the stream is exhausted.
    pub fn read(&mut self) -> Result<Option<Expr>> {
        match self.lexer.next_token()? {
            Token::Eof => Ok(None),
            token => self.read_ahead(token, 0).map(Some),
        }
    }

    fn read_ahead(&mut self, token: Token, depth: usize) -> Result<Expr> {
        match token {
            Token::LParen => {
                if depth >= MAX_NESTING {
                    return Err(Error::syntax("nesting too deep"));
                }
                let mut items = Vec::new();
                loop {
                    match self.lexer.next_token()? {
                        Token::RParen => return Ok(Expr::List(items)),
                        Token::Eof => return Err(Error::syntax("unexpected EOF in list")),
                        next => items.push(self.read_ahead(next, depth + 1)?),
                    }
                }
            }
            Token::RParen => Err(Error::syntax("unexpected )")),
            Token::Eof => Err(Error::syntax("unexpected EOF")),
            Token::Atom(text) => Ok(classify(&text, &self.interner)),
        }
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Expr>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Normalize a finished parse tree so every list is a tightly sized `Vec`.
pub fn expand(expr: Expr) -> Expr {
    match expr {
        Expr::List(items) => Expr::List(items.into_iter().map(expand).collect()),
        atom => atom,
    }
}

/// Parse the first complete form of `input` using the process-wide interner.
pub fn parse(input: &str) -> Result<Expr> {
    parse_with(input, Interner::global())
}

/// Parse the first complete form of `input`. Anything after it is ignored.
pub fn parse_with(input: &str, interner: &Interner) -> Result<Expr> {
    let mut reader = Reader::new(input.as_bytes(), interner.clone());
    let tree = reader
        .read()?
        .ok_or_else(|| Error::syntax("unexpected EOF"))?;
    log::trace!("parsed {} bytes", input.len());
    Ok(expand(tree))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_order() {
        let interner = Interner::new();
        assert_eq!(classify("#t", &interner), Expr::Bool(true));
        assert_eq!(classify("#f", &interner), Expr::Bool(false));
        assert_eq!(classify("nil", &interner), Expr::Nil);
        assert_eq!(classify("\"x y\"", &interner), Expr::Str("x y".to_string()));
        assert_eq!(classify("#:12", &interner), Expr::Keyword(Keyword::new("12")));
        assert_eq!(classify("-17", &interner), Expr::Int(-17));
        assert_eq!(classify("2.5", &interner), Expr::Float(2.5));
        assert_eq!(classify("1e3", &interner), Expr::Float(1000.0));
        assert_eq!(
            classify("foo", &interner),
            Expr::Symbol(interner.intern("foo"))
        );
        assert!(interner.get("-17").is_none());
    }

    #[test]
    fn test_digit_separators() {
        let interner = Interner::new();
        assert_eq!(classify("1_000", &interner), Expr::Int(1000));
        assert_eq!(classify("-2_500_000", &interner), Expr::Int(-2_500_000));
        assert_eq!(classify("1_0.2_5", &interner), Expr::Float(10.25));
        for token in ["_1", "1_", "1__0", "a_1", "1_a"] {
            assert_eq!(
                classify(token, &interner),
                Expr::Symbol(interner.intern(token)),
                "{token}"
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "(f ".repeat(depth), ")".repeat(depth));
        assert!(parse(&nested(MAX_NESTING)).is_ok());
        match parse(&nested(MAX_NESTING + 1)) {
            Err(Error::Syntax(message)) => assert_eq!(message, "nesting too deep"),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_string_contents_are_not_unescaped() {
        let interner = Interner::new();
        assert_eq!(
            classify(r#""a\"b""#, &interner),
            Expr::Str(r#"a\"b"#.to_string())
        );
    }

    #[test]
    fn test_reader_yields_successive_forms() {
        let interner = Interner::new();
        let reader = Reader::new("(a 1)\n2 ; trailing\n(b)".as_bytes(), interner.clone());
        let forms: Vec<Expr> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(
            forms,
            vec![
                Expr::List(vec![Expr::Symbol(interner.intern("a")), Expr::Int(1)]),
                Expr::Int(2),
                Expr::List(vec![Expr::Symbol(interner.intern("b"))]),
            ]
        );
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(parse("()").unwrap(), Expr::List(vec![]));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(parse(""), Err(Error::Syntax(_))));
        assert!(matches!(parse("  ; nothing\n"), Err(Error::Syntax(_))));
    }

    #[test]
    fn test_expand_preserves_structure() {
        let tree = parse("(a (b (c 1.5)) \"s\")").unwrap();
        assert_eq!(expand(tree.clone()), tree);
    }
}
