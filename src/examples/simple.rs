//! Simple example of using reqwest-task-pool.

use reqwest_task_pool::{Job, JobOptions, MemQueue, Task, TaskQueue};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    env_logger::init();

    let queue = Arc::new(MemQueue::new());
    queue
        .add_tasks(vec![
            Task::get("https://httpbin.org/status/200"),
            Task::get("https://httpbin.org/json"),
            Task::get("https://httpbin.org/status/503"),
        ])
        .await;

    let options = JobOptions::builder()
        .timeout(Duration::from_secs(10))
        .sleep(Duration::from_millis(100))
        // cap so a permanently-unavailable endpoint cannot spin forever
        .max_attempts(3)
        .on_success(|ctx| {
            println!("{} -> {} bytes", ctx.task.url, ctx.body_bytes().len());
        })
        .on_retry(|ctx| {
            println!("{} retrying (attempt {})", ctx.task.url, ctx.attempt());
        })
        .on_fail(|ctx| {
            println!("{} failed: {:?}", ctx.task.url, ctx.status());
        })
        .on_complete(|ctx| {
            println!("{} done after {} attempt(s)", ctx.task.url, ctx.attempt());
        })
        .build();

    Job::new("httpbin demo", 2, queue, options).run().await;
}
