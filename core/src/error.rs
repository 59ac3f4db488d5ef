//! Error type shared by the reader, the parser and both evaluators.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the language can report.
///
/// Host procedures return this same type, so an error raised by the host
/// reaches the caller of `evaluate` exactly as it was produced.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed token stream: unbalanced parentheses, unterminated
    /// string, premature end of input.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A symbol has no binding in the environment.
    #[error("unbound reference: {0}")]
    Unbound(String),

    /// The head of a form is not callable, or its keyword arguments are
    /// malformed.
    #[error("invocation error: {0}")]
    Invocation(String),

    /// Raised by a host procedure.
    #[error("{0}")]
    Host(Arc<dyn std::error::Error + Send + Sync>),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax(message.into())
    }

    pub fn invocation(message: impl Into<String>) -> Self {
        Error::Invocation(message.into())
    }

    /// Wrap any host-side error (or a plain message) for propagation
    /// through the evaluator.
    pub fn host(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Host(Arc::from(error.into()))
    }

    /// Short name of the error kind, handy for hosts that log or map errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Unbound(_) => ErrorKind::Unbound,
            Error::Invocation(_) => ErrorKind::Invocation,
            Error::Host(_) => ErrorKind::Host,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Unbound,
    Invocation,
    Host,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Unbound => "unbound",
            ErrorKind::Invocation => "invocation",
            ErrorKind::Host => "host",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_displays_unchanged() {
        let err = Error::host("division by zero");
        assert_eq!(err.to_string(), "division by zero");
        assert_eq!(err.kind(), ErrorKind::Host);
    }

    #[test]
    fn test_syntax_error_message() {
        let err = Error::syntax("unexpected )");
        assert_eq!(err.to_string(), "syntax error: unexpected )");
        assert_eq!(err.kind().to_string(), "syntax");
    }
}
