//! Redis-backed task queue.

use crate::queue::TaskQueue;
use crate::task::Task;
use async_trait::async_trait;
use log::error;
use redis::aio::MultiplexedConnection;

/// Task queue persisted in a redis list.
///
/// Tasks are serialized to JSON and pushed to the tail of the list; `pop`
/// takes the head, so FIFO order matches [`MemQueue`](crate::MemQueue).
/// Backend failures (connection loss, malformed stored tasks) are fail-soft:
/// they are logged and the operation reports no task, so a draining job
/// stops instead of crashing. Shared storage is all this provides; there is
/// no lease or exactly-once delivery across processes.
pub struct RedisQueue {
    key: String,
    conn: MultiplexedConnection,
}

impl RedisQueue {
    /// Open a connection to `url` (e.g. `redis://127.0.0.1:6379`) and bind
    /// the queue to the list stored at `key`.
    pub async fn connect(url: &str, key: impl Into<String>) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            key: key.into(),
            conn,
        })
    }
}

#[async_trait]
impl TaskQueue for RedisQueue {
    async fn add(&self, task: Task) {
        let encoded = match serde_json::to_vec(&task) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("failed to serialize task for {}: {e}", self.key);
                return;
            }
        };
        let mut conn = self.conn.clone();
        let pushed: Result<i64, _> = redis::cmd("RPUSH")
            .arg(&self.key)
            .arg(encoded)
            .query_async(&mut conn)
            .await;
        if let Err(e) = pushed {
            error!("failed to push task onto {}: {e}", self.key);
        }
    }

    async fn add_tasks(&self, tasks: Vec<Task>) {
        for task in tasks {
            self.add(task).await;
        }
    }

    async fn pop(&self) -> Option<Task> {
        let mut conn = self.conn.clone();
        let raw: Option<Vec<u8>> = match redis::cmd("LPOP")
            .arg(&self.key)
            .query_async(&mut conn)
            .await
        {
            Ok(value) => value,
            Err(e) => {
                error!("failed to pop task from {}: {e}", self.key);
                return None;
            }
        };
        let raw = raw?;
        match serde_json::from_slice(&raw) {
            Ok(task) => Some(task),
            Err(e) => {
                error!("failed to deserialize task from {}: {e}", self.key);
                None
            }
        }
    }

    async fn clear(&self) -> bool {
        let mut conn = self.conn.clone();
        let removed: Result<i64, _> = redis::cmd("DEL")
            .arg(&self.key)
            .query_async(&mut conn)
            .await;
        match removed {
            Ok(n) => n > 0,
            Err(e) => {
                error!("failed to clear {}: {e}", self.key);
                false
            }
        }
    }

    async fn size(&self) -> usize {
        let mut conn = self.conn.clone();
        let len: Result<i64, _> = redis::cmd("LLEN")
            .arg(&self.key)
            .query_async(&mut conn)
            .await;
        match len {
            Ok(n) => n as usize,
            Err(e) => {
                error!("failed to read length of {}: {e}", self.key);
                0
            }
        }
    }

    async fn is_empty(&self) -> bool {
        self.size().await == 0
    }
}
