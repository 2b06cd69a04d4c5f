//! Configuration shared by every task a job executes.

use crate::context::{Callback, Context};
use crate::rotator::ProxyRotator;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("reqwest-task-pool/", env!("CARGO_PKG_VERSION"));

/// Options applied to every task popped by a job's workers.
#[derive(Clone)]
pub struct JobOptions {
    /// Callback invoked before each attempt is dispatched.
    pub on_start: Option<Callback>,
    /// Callback invoked when a response classifies as success.
    pub on_success: Option<Callback>,
    /// Callback invoked on a retry classification or transport failure.
    pub on_retry: Option<Callback>,
    /// Callback invoked when a response classifies as failure.
    pub on_fail: Option<Callback>,
    /// Callback invoked exactly once per task, after its attempt chain ends.
    pub on_complete: Option<Callback>,
    /// Fixed outbound proxy URL, used when no rotator is set.
    pub proxy: Option<String>,
    /// Round-robin proxy source, consulted once per attempt.
    pub rotator: Option<Arc<ProxyRotator>>,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Pause before each attempt, applied to the executing worker only.
    pub sleep: Duration,
    /// Hard cap on attempts per task; `None` leaves retry termination to
    /// the on-retry callback.
    pub max_attempts: Option<u32>,
    /// Default `User-Agent`, overridable per task via its header map.
    pub user_agent: String,
    /// Skip TLS certificate verification on outbound requests.
    pub accept_invalid_certs: bool,
    /// Dump request/response details after each attempt.
    pub debug: bool,
}

impl JobOptions {
    /// Create a new options builder.
    pub fn builder() -> JobOptionsBuilder {
        JobOptionsBuilder::new()
    }
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            on_start: None,
            on_success: None,
            on_retry: None,
            on_fail: None,
            on_complete: None,
            proxy: None,
            rotator: None,
            timeout: Duration::from_secs(30),
            sleep: Duration::ZERO,
            max_attempts: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
            debug: false,
        }
    }
}

/// Builder for [`JobOptions`].
pub struct JobOptionsBuilder {
    options: JobOptions,
}

impl JobOptionsBuilder {
    /// Create a builder with default values.
    pub fn new() -> Self {
        Self {
            options: JobOptions::default(),
        }
    }

    /// Set the callback invoked before each attempt.
    pub fn on_start(mut self, f: impl Fn(&mut Context) + Send + Sync + 'static) -> Self {
        self.options.on_start = Some(Arc::new(f));
        self
    }

    /// Set the callback invoked on success.
    pub fn on_success(mut self, f: impl Fn(&mut Context) + Send + Sync + 'static) -> Self {
        self.options.on_success = Some(Arc::new(f));
        self
    }

    /// Set the callback invoked on retry classifications and transport
    /// failures.
    pub fn on_retry(mut self, f: impl Fn(&mut Context) + Send + Sync + 'static) -> Self {
        self.options.on_retry = Some(Arc::new(f));
        self
    }

    /// Set the callback invoked on terminal failure.
    pub fn on_fail(mut self, f: impl Fn(&mut Context) + Send + Sync + 'static) -> Self {
        self.options.on_fail = Some(Arc::new(f));
        self
    }

    /// Set the callback invoked once per task after its attempts end.
    pub fn on_complete(mut self, f: impl Fn(&mut Context) + Send + Sync + 'static) -> Self {
        self.options.on_complete = Some(Arc::new(f));
        self
    }

    /// Set a fixed outbound proxy URL.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.options.proxy = Some(url.into());
        self
    }

    /// Set a proxy rotator consulted once per attempt.
    pub fn rotator(mut self, rotator: Arc<ProxyRotator>) -> Self {
        self.options.rotator = Some(rotator);
        self
    }

    /// Set the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the pause applied before each attempt.
    pub fn sleep(mut self, sleep: Duration) -> Self {
        self.options.sleep = sleep;
        self
    }

    /// Cap the number of attempts per task.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.options.max_attempts = Some(attempts);
        self
    }

    /// Override the default `User-Agent`.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = ua.into();
        self
    }

    /// Accept invalid TLS certificates on outbound requests.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.options.accept_invalid_certs = accept;
        self
    }

    /// Enable the per-attempt request/response dump.
    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    /// Build the options.
    pub fn build(self) -> JobOptions {
        self.options
    }
}

impl Default for JobOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
