//! Task description and producer-side helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// URL-encoded form fields submitted as a request body.
pub type FormData = HashMap<String, String>;

/// One unit of HTTP work, queued for execution.
///
/// A task is read-only once popped from a queue, except for the [`data`]
/// map which callbacks may mutate to carry state across retries. Tasks are
/// not deduplicated: pushing the same URL twice executes it twice.
///
/// [`data`]: Task::data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Request address. Required; a missing scheme is repaired to `http://`.
    pub url: String,

    /// Request method, e.g. `GET` or `POST`.
    pub method: String,

    /// Raw request body. Mutually exclusive with `form_data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<u8>>,

    /// URL-encoded form body. Mutually exclusive with `payload`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<FormData>,

    /// Request headers, one or more values per name.
    #[serde(default)]
    pub header: HashMap<String, Vec<String>>,

    /// Free-form context data passed through to callbacks, never
    /// interpreted by the pool itself.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Task {
    /// Create a task with an explicit method.
    pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into().to_uppercase(),
            payload: None,
            form_data: None,
            header: HashMap::new(),
            data: Map::new(),
        }
    }

    /// Create a GET task.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, "GET")
    }

    /// Create a POST task.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url, "POST")
    }

    /// Attach a raw request body.
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Attach a URL-encoded form body.
    pub fn with_form_data(mut self, form: FormData) -> Self {
        self.form_data = Some(form);
        self
    }

    /// Add a request header value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Attach one context-data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

/// Parse a browser-copied header block into a header map.
///
/// Each non-empty line is expected to look like `Name: value`; lines that
/// do not split on `": "` are skipped.
pub fn parse_header_block(block: &str) -> HashMap<String, Vec<String>> {
    let mut header: HashMap<String, Vec<String>> = HashMap::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(": ") {
            header
                .entry(name.trim().to_string())
                .or_default()
                .push(value.trim().to_string());
        }
    }
    header
}

/// Parse query-style text (`page=1&limit=15`) into [`FormData`].
///
/// Pairs without a `=` are skipped; empty values are kept.
pub fn parse_form_data(s: &str) -> FormData {
    let mut form = FormData::new();
    for pair in s.split('&') {
        if pair.is_empty() {
            continue;
        }
        if let Some((key, value)) = pair.split_once('=') {
            form.insert(key.to_string(), value.to_string());
        }
    }
    form
}
