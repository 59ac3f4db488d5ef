use psyl::{Environment, Error, Expr, Result, Value, parse_with};

use crate::arguments::apply;
use crate::Evaluator;

// ============================================================================
// Evaluator
// ============================================================================

/// Single-threaded tree-walking evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Evaluator for Sequential {
    fn eval_tree(&self, tree: &Expr, env: &Environment) -> Result<Value> {
        eval_tree(tree, env)
    }
}

/// Parse `source` with the environment's interner and evaluate it.
pub fn evaluate(source: &str, env: &Environment) -> Result<Value> {
    let tree = parse_with(source, env.interner())?;
    eval_tree(&tree, env)
}

pub fn eval_tree(expr: &Expr, env: &Environment) -> Result<Value> {
    match expr {
        // Symbol lookup
        Expr::Symbol(symbol) => env.lookup(symbol),

        // Function application: every element is evaluated, head first
        Expr::List(items) => {
            let mut values = items
                .iter()
                .map(|item| eval_tree(item, env))
                .collect::<Result<Vec<_>>>()?;
            if values.is_empty() {
                return Err(Error::invocation("cannot invoke an empty form"));
            }
            let head = values.remove(0);
            log::trace!("applying {} with {} argument value(s)", head, values.len());
            apply(head, values)
        }

        // Self-evaluating forms
        Expr::Keyword(k) => Ok(Value::Keyword(k.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Nil => Ok(Value::Nil),
        Expr::Int(n) => Ok(Value::Int(*n)),
        Expr::Float(x) => Ok(Value::Float(*x)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
    }
}
