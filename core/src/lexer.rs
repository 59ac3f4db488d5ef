use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

// ============================================================================
// Lexer
// ============================================================================

// Whitespace, then one token. The empty alternative at the end always
// matches, so the pattern never fails.
static TOKENIZER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(,@|[('`,)]|"(?:\\.|[^\\"])*"|;.*|[^\s('"`,;)]*)"#)
        .expect("tokenizer pattern is valid")
});

/// Number of consecutive non-advancing matches tolerated before giving up.
const STALL_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    /// Any other token text, including quote marks and quoted strings
    Atom(String),
    Eof,
}

/// Pulls tokens out of a line-oriented character stream.
pub struct Lexer<R> {
    input: R,
    line: String,
    /// Byte offset of the unread remainder of `line`
    pos: usize,
    stalls: usize,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(input: R) -> Self {
        Lexer {
            input,
            line: String::new(),
            pos: 0,
            stalls: 0,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            if self.pos >= self.line.len() {
                self.line.clear();
                self.pos = 0;
                if self.input.read_line(&mut self.line)? == 0 {
                    return Ok(Token::Eof);
                }
            }

            let rest = &self.line[self.pos..];
            let (token, consumed) = match TOKENIZER.captures(rest) {
                Some(caps) => (
                    caps.get(1).map_or("", |m| m.as_str()),
                    caps.get(0).map_or(0, |m| m.end()),
                ),
                None => ("", 0),
            };

            // Only an opening quote with no closing partner on this line
            // leaves every alternative unable to advance.
            if consumed == 0 {
                self.stalls += 1;
                if self.stalls >= STALL_LIMIT {
                    return Err(Error::syntax(format!(
                        "tokenizer stalled at `{}` (unterminated quoted string?)",
                        rest.trim_end()
                    )));
                }
                continue;
            }
            self.stalls = 0;

            let token = match token {
                "" => None,
                comment if comment.starts_with(';') => None,
                "(" => Some(Token::LParen),
                ")" => Some(Token::RParen),
                text => Some(Token::Atom(text.to_string())),
            };
            self.pos += consumed;

            if let Some(token) = token {
                return Ok(token);
            }
        }
    }
}
