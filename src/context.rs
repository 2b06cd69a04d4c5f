//! Per-task execution context and the attempt lifecycle.

use crate::config::JobOptions;
use crate::error::TaskError;
use crate::status::{classify, Outcome};
use crate::task::Task;
use crate::utils::{normalize_url, unescape_html};

use flate2::read::GzDecoder;
use log::{debug, error, info, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::sync::Arc;

/// Hook invoked at one of the five lifecycle points, free to read the task,
/// inspect the response, and mutate the task's context data.
pub type Callback = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Live state of one task's execution: the bound task, the latest response
/// snapshot, and the attempt counter driving retries.
///
/// A context is built fresh for each popped task and dropped once its
/// callback chain finishes. Each retry re-enters the full lifecycle on the
/// same context, replacing the response snapshot. The on-complete callback
/// fires exactly once per task, after whichever attempt terminates the
/// chain, including a chain the on-retry callback abandons.
pub struct Context {
    /// The task being executed.
    pub task: Task,
    options: JobOptions,
    status: Option<StatusCode>,
    response_headers: HeaderMap,
    body: Option<Vec<u8>>,
    error: Option<TaskError>,
    attempt: u32,
    resubmit: bool,
}

impl Context {
    /// Bind a task to the shared job options.
    pub fn new(task: Task, options: JobOptions) -> Self {
        Self {
            task,
            options,
            status: None,
            response_headers: HeaderMap::new(),
            body: None,
            error: None,
            attempt: 0,
            resubmit: false,
        }
    }

    /// Execute the task's attempt chain to completion.
    ///
    /// Each attempt sleeps the configured duration, fires on-start,
    /// dispatches the request, and classifies the status. A `Retry`
    /// classification loops back for another attempt unless the on-retry
    /// callback called [`stop_retry`](Context::stop_retry), the attempt cap
    /// was reached, or no on-retry callback is registered. A transport
    /// failure fires on-retry (when registered) but never re-dispatches by
    /// itself; resubmission is the callback's decision.
    pub async fn run(&mut self) {
        loop {
            if !self.options.sleep.is_zero() {
                tokio::time::sleep(self.options.sleep).await;
            }
            self.attempt += 1;

            if let Some(cb) = self.options.on_start.clone() {
                cb(self);
            }

            match self.dispatch().await {
                Ok(()) => {
                    if self.options.debug {
                        self.debug_dump();
                    }
                    let code = match self.status {
                        Some(status) => status.as_u16(),
                        None => break,
                    };
                    match classify(code) {
                        Outcome::Success => {
                            info!("[success] {} {} -> {code}", self.task.method, self.task.url);
                            if let Some(cb) = self.options.on_success.clone() {
                                cb(self);
                            }
                        }
                        Outcome::Fail => {
                            error!("[fail] {} {} -> {code}", self.task.method, self.task.url);
                            if let Some(cb) = self.options.on_fail.clone() {
                                cb(self);
                            }
                        }
                        Outcome::Retry => {
                            warn!(
                                "[retry] {} {} -> {code} (attempt {})",
                                self.task.method, self.task.url, self.attempt
                            );
                            if let Some(cb) = self.options.on_retry.clone() {
                                self.resubmit = true;
                                cb(self);
                                let capped = self
                                    .options
                                    .max_attempts
                                    .is_some_and(|max| self.attempt >= max);
                                if self.resubmit && !capped {
                                    continue;
                                }
                            }
                        }
                        Outcome::Unclassified => {
                            warn!("unhandled status code: {code} for {}", self.task.url);
                        }
                    }
                }
                Err(TaskError::Transport(e)) => {
                    error!("request failed for {}: {e}", self.task.url);
                    self.error = Some(TaskError::Transport(e));
                    if let Some(cb) = self.options.on_retry.clone() {
                        cb(self);
                    }
                }
                Err(e) => {
                    error!("attempt abandoned for {}: {e}", self.task.url);
                    self.error = Some(e);
                }
            }
            break;
        }

        if let Some(cb) = self.options.on_complete.clone() {
            cb(self);
        }
    }

    /// Build the per-attempt client, send the request, and capture the
    /// response snapshot.
    async fn dispatch(&mut self) -> Result<(), TaskError> {
        let url = normalize_url(&self.task.url)?;
        let method = Method::from_bytes(self.task.method.as_bytes())
            .map_err(|_| TaskError::InvalidMethod(self.task.method.clone()))?;

        let mut builder = reqwest::Client::builder()
            .timeout(self.options.timeout)
            .cookie_store(true)
            .user_agent(self.options.user_agent.as_str());
        if self.options.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(proxy_url) = self.select_proxy() {
            debug!("using proxy {proxy_url} (attempt {})", self.attempt);
            builder = builder.proxy(reqwest::Proxy::all(&proxy_url)?);
        }
        let client = builder.build()?;

        let mut request = client.request(method, &url);
        for (name, values) in &self.task.header {
            let name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(name) => name,
                Err(_) => {
                    warn!("skipping invalid header name {name:?}");
                    continue;
                }
            };
            for value in values {
                match HeaderValue::from_str(value) {
                    Ok(value) => request = request.header(name.clone(), value),
                    Err(_) => warn!("skipping invalid value for header {name}"),
                }
            }
        }
        if let Some(form) = &self.task.form_data {
            request = request.form(form);
        } else if let Some(payload) = &self.task.payload {
            request = request.body(payload.clone());
        }

        let response = request.send().await?;

        self.status = Some(response.status());
        self.response_headers = response.headers().clone();
        let gzipped = self
            .response_headers
            .get(CONTENT_ENCODING)
            .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"gzip"));

        let raw = response.bytes().await.map_err(TaskError::BodyRead)?;
        self.body = if gzipped {
            let mut decoded = Vec::new();
            GzDecoder::new(raw.as_ref())
                .read_to_end(&mut decoded)
                .map_err(TaskError::Decompress)?;
            Some(decoded)
        } else {
            Some(raw.to_vec())
        };
        Ok(())
    }

    fn select_proxy(&self) -> Option<String> {
        if let Some(rotator) = &self.options.rotator {
            if let Some((url, _)) = rotator.get() {
                return Some(url);
            }
        }
        self.options.proxy.clone()
    }

    fn debug_dump(&self) {
        debug!("{:>15} {}", "URL:", self.task.url);
        debug!("{:>15} {}", "Method:", self.task.method);
        debug!("{:>15} {:?}", "Request Header:", self.task.header);
        debug!("{:>15} {:?}", "Response code:", self.status);
        debug!("{:>15} {:?}", "Response Header:", self.response_headers);
    }

    /// Tell the attempt loop not to re-dispatch after the current on-retry
    /// callback returns.
    pub fn stop_retry(&mut self) {
        self.resubmit = false;
    }

    /// Status of the latest response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Headers of the latest response.
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    /// `Content-Type` of the latest response, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.response_headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// 1-based number of the attempt currently or most recently executed.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// The error that ended the attempt chain, if any.
    pub fn error(&self) -> Option<&TaskError> {
        self.error.as_ref()
    }

    /// Response body as raw bytes; empty before a response exists.
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Response body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.body_bytes()).into_owned()
    }

    /// Response body as text with common HTML entities unescaped.
    pub fn html(&self) -> String {
        unescape_html(&self.text())
    }

    /// Decode the response body as JSON.
    ///
    /// Returns [`TaskError::BodyNotAvailable`] before a response exists and
    /// [`TaskError::Decode`] when the body is not valid for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TaskError> {
        match &self.body {
            Some(body) => Ok(serde_json::from_slice(body)?),
            None => Err(TaskError::BodyNotAvailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_accessors_before_any_response() {
        let ctx = Context::new(Task::get("http://example.com"), JobOptions::default());
        assert!(ctx.body_bytes().is_empty());
        assert_eq!(ctx.text(), "");
        assert!(matches!(
            ctx.json::<serde_json::Value>(),
            Err(TaskError::BodyNotAvailable)
        ));
        assert_eq!(ctx.status(), None);
        assert_eq!(ctx.attempt(), 0);
    }

    #[test]
    fn json_decode_failure_is_an_error_not_a_panic() {
        let mut ctx = Context::new(Task::get("http://example.com"), JobOptions::default());
        ctx.body = Some(b"not json".to_vec());
        assert!(matches!(
            ctx.json::<serde_json::Value>(),
            Err(TaskError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn malformed_url_abandons_the_attempt() {
        let mut ctx = Context::new(Task::get(""), JobOptions::default());
        ctx.run().await;
        assert!(matches!(ctx.error(), Some(TaskError::InvalidUrl(_))));
        assert_eq!(ctx.status(), None);
    }

    #[tokio::test]
    async fn malformed_method_abandons_the_attempt() {
        let mut ctx = Context::new(
            Task::new("http://example.com", "NOT A METHOD"),
            JobOptions::default(),
        );
        ctx.run().await;
        assert!(matches!(ctx.error(), Some(TaskError::InvalidMethod(_))));
    }
}
