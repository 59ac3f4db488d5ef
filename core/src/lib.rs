//! Core language definition for psyl
//!
//! psyl is a small embeddable expression language: S-expressions read into
//! a tree of typed atoms and lists, then evaluated against host bindings.
//! This crate holds the types, the reader/parser, the serializer and the
//! environment. Evaluation lives in the `psyl-runtime` crate.

pub mod environment;
pub mod error;
pub mod interner;
pub mod language;
pub mod lexer;
pub mod native;
pub mod parser;
pub mod serializer;

// Re-export commonly used items for convenience
pub use environment::Environment;
pub use error::{Error, ErrorKind, Result};
pub use interner::{Interner, Symbol};
pub use language::{Arguments, Expr, Keyword, NativeFn, Procedure, Value};
pub use parser::{MAX_NESTING, Reader, classify, expand, parse, parse_with};
pub use serializer::serialize;
