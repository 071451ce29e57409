//! Lifetime-scoped background tasks.
//!
//! A `TaskScope` owns every task spawned on behalf of one screen (or of the
//! whole application). Dropping the scope aborts whatever is still running,
//! so a result arriving after teardown has nowhere to land.

use std::future::Future;

use tokio::task::JoinSet;

#[derive(Debug)]
pub struct TaskScope {
    name: &'static str,
    tasks: JoinSet<()>,
}

impl TaskScope {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tasks: JoinSet::new(),
        }
    }

    /// Spawn `task` on the current runtime, owned by this scope.
    pub fn spawn<F>(&mut self, label: &str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.reap();
        tracing::debug!("{} scope: spawning {}", self.name, label);
        self.tasks.spawn(task);
    }

    /// Number of tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every owned task to finish.
    pub async fn drain(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            self.log_outcome(result);
        }
    }

    /// Collect tasks that already finished so the set does not grow unbounded.
    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            self.log_outcome(result);
        }
    }

    fn log_outcome(&self, result: Result<(), tokio::task::JoinError>) {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::error!("{} scope: task panicked: {}", self.name, e);
            }
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(
                "{} scope: aborting {} outstanding task(s)",
                self.name,
                self.tasks.len()
            );
        }
    }
}
