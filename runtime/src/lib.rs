//! psyl runtime - evaluators
//!
//! This crate provides the execution engines for psyl:
//! - Sequential tree-walking evaluator
//! - Concurrent fork-join evaluator
//! - Positional/keyword argument splitting shared by both

pub mod arguments;
pub mod concurrent;
pub mod config;
pub mod interpreter;

use psyl::{Environment, Expr, Result, Value, parse_with};

// Re-export evaluator types
pub use arguments::{apply, split_arguments};
pub use concurrent::Concurrent;
pub use config::ConcurrentConfig;
pub use interpreter::{Sequential, eval_tree, evaluate};

/// Common contract of the sequential and concurrent evaluators.
pub trait Evaluator {
    fn eval_tree(&self, tree: &Expr, env: &Environment) -> Result<Value>;

    /// Parse `source` with the environment's interner, then evaluate it.
    fn evaluate(&self, source: &str, env: &Environment) -> Result<Value> {
        let tree = parse_with(source, env.interner())?;
        self.eval_tree(&tree, env)
    }
}
