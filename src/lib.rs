//! # reqwest-task-pool
//!
//! A concurrent HTTP task execution pool for reqwest.
//!
//! This library drains a FIFO queue of HTTP tasks with a fixed-size pool of
//! workers, classifies each response status as success/retry/fail, and
//! dispatches user callbacks at the start, success, retry, failure and
//! completion points of each task's lifecycle, optionally rotating outbound
//! proxies per attempt. Queues come in two flavors: in-memory, and backed
//! by a redis list for shared storage across producers.

pub mod config;
pub mod context;
pub mod error;
pub mod job;
pub mod queue;
pub mod redis_queue;
pub mod rotator;
pub mod status;
pub mod task;
mod utils;

pub use config::{JobOptions, JobOptionsBuilder};
pub use context::{Callback, Context};
pub use error::TaskError;
pub use job::Job;
pub use queue::{MemQueue, TaskQueue};
pub use redis_queue::RedisQueue;
pub use rotator::{ProxyEndpoint, ProxyRotator};
pub use status::{classify, Outcome};
pub use task::{parse_form_data, parse_header_block, FormData, Task};
