//! Worker-pool orchestrator draining one task queue.

use crate::config::JobOptions;
use crate::context::Context;
use crate::queue::TaskQueue;

use futures::future;
use log::{debug, info};
use std::sync::Arc;

/// A fixed-size pool of workers that drains a [`TaskQueue`].
///
/// Each worker loops popping one task, running its full attempt chain to
/// completion, then popping the next, until the queue reports empty. The
/// drain is best-effort: emptiness check and pop are separate calls, so a
/// worker may lose a pop race and receive no task. It treats that the same
/// as an empty queue, never as an error. Each task is delivered to exactly
/// one worker; no completion order is promised across tasks.
pub struct Job {
    name: String,
    concurrency: usize,
    queue: Arc<dyn TaskQueue>,
    options: JobOptions,
}

impl Job {
    /// Create a job. `concurrency` is clamped to a minimum of 1.
    pub fn new(
        name: impl Into<String>,
        concurrency: usize,
        queue: Arc<dyn TaskQueue>,
        options: JobOptions,
    ) -> Self {
        Self {
            name: name.into(),
            concurrency: concurrency.max(1),
            queue,
            options,
        }
    }

    /// Run the pool until every worker has observed an empty queue.
    pub async fn run(&self) {
        info!("[{}] starting job with {} workers", self.name, self.concurrency);

        let mut workers = Vec::with_capacity(self.concurrency);
        for n in 0..self.concurrency {
            let queue = Arc::clone(&self.queue);
            let options = self.options.clone();
            workers.push(tokio::spawn(async move {
                debug!("worker {} started", n + 1);
                loop {
                    if queue.is_empty().await {
                        break;
                    }
                    match queue.pop().await {
                        Some(task) => {
                            let mut ctx = Context::new(task, options.clone());
                            ctx.run().await;
                        }
                        // another worker won the pop race
                        None => continue,
                    }
                }
                debug!("worker {} finished", n + 1);
            }));
        }
        future::join_all(workers).await;

        info!("[{}] job done", self.name);
    }
}
