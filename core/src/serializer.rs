//! Rendering of expression trees back into source text.
//!
//! `parse(serialize(tree))` rebuilds a structurally equal tree. Whitespace
//! and comments of the original text are not preserved, and string
//! contents are written back exactly as they were read.

use std::fmt::{self, Write};

use crate::language::Expr;

pub fn serialize(tree: &Expr) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_expr(&mut out, tree);
    out
}

fn write_expr<W: Write>(out: &mut W, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::List(items) => {
            out.write_char('(')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write_expr(out, item)?;
            }
            out.write_char(')')
        }
        Expr::Symbol(s) => out.write_str(s.as_str()),
        Expr::Keyword(k) => write!(out, "{k}"),
        Expr::Str(s) => write!(out, "\"{s}\""),
        Expr::Bool(true) => out.write_str("#t"),
        Expr::Bool(false) => out.write_str("#f"),
        Expr::Nil => out.write_str("nil"),
        Expr::Int(n) => write!(out, "{n}"),
        // Debug formatting keeps the fractional part so `1.0` re-reads as a float.
        Expr::Float(x) => write!(out, "{x:?}"),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self)
    }
}
