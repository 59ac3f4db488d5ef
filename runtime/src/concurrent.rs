//! Fork-join evaluator
//!
//! Evaluation runs in two phases. `resolve` walks the tree once and turns
//! every symbol into its bound value, so the environment is only read up
//! front. `force` then invokes forms bottom-up; a form with enough argument
//! sub-forms hands each of them to a scoped thread and joins them all
//! before calling its head.
//!
//! Branch threads are drawn from one budget per evaluation. A form that
//! finds the budget spent, or whose thread cannot be started, is evaluated
//! on the dispatching thread instead.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, Scope, ScopedJoinHandle};

use psyl::{Environment, Error, Expr, Result, Value, parse_with};

use crate::Evaluator;
use crate::arguments::apply;
use crate::config::ConcurrentConfig;
use crate::interpreter;

/// A tree whose symbols are already bound to values.
#[derive(Debug, Clone)]
enum Resolved {
    Value(Value),
    Form(Vec<Resolved>),
}

/// An argument waiting to be forced, either here or on a branch thread.
type Pending = Mutex<Option<Resolved>>;

fn take(pending: &Pending) -> Resolved {
    pending
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .unwrap_or(Resolved::Value(Value::Nil))
}

fn is_form(pending: &Pending) -> bool {
    matches!(
        *pending.lock().unwrap_or_else(PoisonError::into_inner),
        Some(Resolved::Form(_))
    )
}

enum Slot<'scope> {
    Ready(Result<Value>),
    Running(ScopedJoinHandle<'scope, Result<Value>>),
}

/// Branch threads alive at once within a single evaluation.
struct Budget {
    live: AtomicUsize,
    limit: usize,
}

impl Budget {
    fn new(limit: usize) -> Self {
        Budget {
            live: AtomicUsize::new(0),
            limit,
        }
    }

    fn try_acquire(&self) -> bool {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < self.limit).then_some(live + 1)
            })
            .is_ok()
    }

    fn release(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Evaluator that runs independent argument forms on separate threads.
///
/// Results are identical to the sequential evaluator as long as host
/// procedures reachable from sibling arguments are safe to run
/// concurrently.
#[derive(Debug, Clone, Default)]
pub struct Concurrent {
    config: ConcurrentConfig,
}

impl Concurrent {
    pub fn new(config: ConcurrentConfig) -> Self {
        Concurrent { config }
    }

    pub fn config(&self) -> &ConcurrentConfig {
        &self.config
    }

    fn resolve(&self, expr: &Expr, env: &Environment) -> Result<Resolved> {
        match expr {
            Expr::List(items) => items
                .iter()
                .map(|item| self.resolve(item, env))
                .collect::<Result<Vec<_>>>()
                .map(Resolved::Form),
            atom => interpreter::eval_tree(atom, env).map(Resolved::Value),
        }
    }

    fn force(&self, node: Resolved, budget: &Budget) -> Result<Value> {
        match node {
            Resolved::Value(value) => Ok(value),
            Resolved::Form(items) => self.invoke(items, budget),
        }
    }

    fn invoke(&self, items: Vec<Resolved>, budget: &Budget) -> Result<Value> {
        let mut items = items.into_iter();
        let Some(head) = items.next() else {
            return Err(Error::invocation("cannot invoke an empty form"));
        };
        let head = self.force(head, budget)?;

        let args: Vec<Resolved> = items.collect();
        let branches = args
            .iter()
            .filter(|arg| matches!(arg, Resolved::Form(_)))
            .count();
        // Forking needs at least two branches.
        let values = if branches >= self.config.fork_threshold.max(2) {
            self.fork_join(args, branches, budget)?
        } else {
            args.into_iter()
                .map(|arg| self.force(arg, budget))
                .collect::<Result<Vec<_>>>()?
        };
        apply(head, values)
    }

    fn fork_join(
        &self,
        args: Vec<Resolved>,
        branches: usize,
        budget: &Budget,
    ) -> Result<Vec<Value>> {
        let pending: Vec<Pending> = args.into_iter().map(|arg| Mutex::new(Some(arg))).collect();

        thread::scope(|scope| -> Result<Vec<Value>> {
            let mut spawned = 0;
            let mut slots = Vec::with_capacity(pending.len());
            for arg in &pending {
                let slot = if is_form(arg) && budget.try_acquire() {
                    match self.spawn(scope, arg, budget) {
                        Ok(handle) => {
                            spawned += 1;
                            Slot::Running(handle)
                        }
                        Err(e) => {
                            budget.release();
                            log::warn!("could not start branch thread, evaluating inline: {e}");
                            Slot::Ready(self.force(take(arg), budget))
                        }
                    }
                } else {
                    // Values, and forms the budget has no room for, run
                    // here while the branches make progress.
                    Slot::Ready(self.force(take(arg), budget))
                };
                slots.push(slot);
            }
            log::debug!(
                "forked {spawned} of {branches} argument form(s) across {} argument(s)",
                pending.len()
            );

            let results: Vec<Result<Value>> = slots
                .into_iter()
                .map(|slot| match slot {
                    Slot::Ready(result) => result,
                    Slot::Running(handle) => {
                        let result = handle
                            .join()
                            .unwrap_or_else(|payload| panic::resume_unwind(payload));
                        budget.release();
                        result
                    }
                })
                .collect();
            log::debug!("joined {spawned} branch(es)");

            // Every branch has finished; report the leftmost failure.
            results.into_iter().collect()
        })
    }

    fn spawn<'scope, 'env>(
        &'env self,
        scope: &'scope Scope<'scope, 'env>,
        arg: &'env Pending,
        budget: &'env Budget,
    ) -> std::io::Result<ScopedJoinHandle<'scope, Result<Value>>> {
        thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn_scoped(scope, move || self.force(take(arg), budget))
    }
}

impl Evaluator for Concurrent {
    fn eval_tree(&self, tree: &Expr, env: &Environment) -> Result<Value> {
        let resolved = self.resolve(tree, env)?;
        let budget = Budget::new(self.config.max_branches);
        self.force(resolved, &budget)
    }
}

/// Evaluate `source` with the default concurrent configuration.
pub fn evaluate(source: &str, env: &Environment) -> Result<Value> {
    let tree = parse_with(source, env.interner())?;
    eval_tree(&tree, env)
}

pub fn eval_tree(tree: &Expr, env: &Environment) -> Result<Value> {
    Concurrent::default().eval_tree(tree, env)
}
