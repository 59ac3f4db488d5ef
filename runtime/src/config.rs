use std::num::NonZeroUsize;
use std::thread;

/// Tuning knobs for the concurrent evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrentConfig {
    /// A form forks only when at least this many of its arguments are
    /// themselves unevaluated forms.
    pub fork_threshold: usize,
    /// Upper bound on branch threads alive at once during one evaluation.
    /// Forms that find no room are evaluated on the dispatching thread.
    pub max_branches: usize,
    /// Name given to branch threads.
    pub thread_name: String,
}

impl Default for ConcurrentConfig {
    fn default() -> Self {
        ConcurrentConfig {
            fork_threshold: 2,
            max_branches: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
            thread_name: "psyl-branch".to_string(),
        }
    }
}

impl ConcurrentConfig {
    pub fn fork_threshold(mut self, threshold: usize) -> Self {
        // Forking needs at least two branches.
        self.fork_threshold = threshold.max(2);
        self
    }

    pub fn max_branches(mut self, max: usize) -> Self {
        self.max_branches = max.max(1);
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
