//! Task queue contract and the in-memory implementation.

use crate::task::Task;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// FIFO queue of tasks awaiting execution.
///
/// `pop` on an empty queue returns `None` rather than an error; workers use
/// it as their loop-termination signal. Implementations must hand each
/// queued task to exactly one caller.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Append one task.
    async fn add(&self, task: Task);

    /// Append several tasks, preserving their order.
    async fn add_tasks(&self, tasks: Vec<Task>);

    /// Remove and return the oldest task, or `None` when empty.
    async fn pop(&self) -> Option<Task>;

    /// Discard all queued tasks. Returns `false` when already empty.
    async fn clear(&self) -> bool;

    /// Number of queued tasks.
    async fn size(&self) -> usize;

    /// Whether the queue holds no tasks.
    async fn is_empty(&self) -> bool;
}

/// In-process queue backed by a mutex-guarded deque.
#[derive(Debug, Default)]
pub struct MemQueue {
    list: Mutex<VecDeque<Task>>,
}

impl MemQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskQueue for MemQueue {
    async fn add(&self, task: Task) {
        self.list.lock().push_back(task);
    }

    async fn add_tasks(&self, tasks: Vec<Task>) {
        self.list.lock().extend(tasks);
    }

    async fn pop(&self) -> Option<Task> {
        self.list.lock().pop_front()
    }

    async fn clear(&self) -> bool {
        let mut list = self.list.lock();
        if list.is_empty() {
            return false;
        }
        list.clear();
        true
    }

    async fn size(&self) -> usize {
        self.list.lock().len()
    }

    async fn is_empty(&self) -> bool {
        self.list.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(n: usize) -> Task {
        Task::get(format!("http://example.com/{n}"))
    }

    #[tokio::test]
    async fn pop_returns_tasks_in_insertion_order() {
        let queue = MemQueue::new();
        queue.add(task(0)).await;
        queue.add_tasks(vec![task(1), task(2)]).await;
        queue.add(task(3)).await;

        for n in 0..4 {
            let popped = queue.pop().await.unwrap();
            assert_eq!(popped.url, format!("http://example.com/{n}"));
        }
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn size_and_is_empty_agree() {
        let queue = MemQueue::new();
        assert!(queue.is_empty().await);
        assert_eq!(queue.size().await, 0);

        queue.add(task(1)).await;
        assert!(!queue.is_empty().await);
        assert_eq!(queue.size().await, 1);

        queue.pop().await;
        assert!(queue.is_empty().await);
        assert_eq!(queue.size().await, 0);
    }

    #[tokio::test]
    async fn clear_on_empty_queue_returns_false() {
        let queue = MemQueue::new();
        assert!(!queue.clear().await);
        assert_eq!(queue.size().await, 0);

        queue.add_tasks(vec![task(1), task(2)]).await;
        assert!(queue.clear().await);
        assert_eq!(queue.size().await, 0);
        assert!(!queue.clear().await);
    }

    #[tokio::test]
    async fn concurrent_adds_are_all_delivered() {
        use std::sync::Arc;

        let queue = Arc::new(MemQueue::new());
        let mut handles = Vec::new();
        for n in 0..8 {
            let queue = Arc::clone(&queue);
            handles.push(tokio::spawn(async move {
                for i in 0..25 {
                    queue.add(task(n * 100 + i)).await;
                }
            }));
        }
        futures::future::join_all(handles).await;
        assert_eq!(queue.size().await, 200);
    }
}
