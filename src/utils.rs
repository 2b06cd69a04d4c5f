//! Internal helpers for request construction.

use crate::error::TaskError;
use url::Url;

/// Validate a task URL, repairing a missing scheme to `http://`.
pub(crate) fn normalize_url(raw: &str) -> Result<String, TaskError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TaskError::InvalidUrl(raw.to_string()));
    }
    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    Url::parse(&candidate).map_err(|_| TaskError::InvalidUrl(raw.to_string()))?;
    Ok(candidate)
}

/// Replace the handful of HTML entities that commonly appear in scraped
/// markup with their literal characters.
pub(crate) fn unescape_html(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
}
