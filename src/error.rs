//! Error types for the reqwest-task-pool crate.

use thiserror::Error;

/// Errors produced while building or executing a task attempt.
///
/// None of these are fatal to the process: the worst outcome of any variant
/// is that the current attempt terminates and the error is recorded on the
/// [`Context`](crate::Context).
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task URL is empty or cannot be parsed even after scheme repair.
    #[error("invalid request url: {0:?}")]
    InvalidUrl(String),

    /// The task method is not a recognizable HTTP method token.
    #[error("invalid request method: {0:?}")]
    InvalidMethod(String),

    /// Connection, DNS, timeout or body-read failure reported by reqwest.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The connection succeeded but the response body could not be read.
    #[error("response body read failed: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// The response claimed `Content-Encoding: gzip` but did not decompress.
    #[error("gzip decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    /// A body accessor was called before any response was received.
    #[error("response body is not available yet")]
    BodyNotAvailable,

    /// The response body is not valid for the requested decode target.
    #[error("response body decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
