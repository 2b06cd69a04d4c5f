//! Response status classification.

/// Outcome of classifying an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The attempt succeeded; the on-success callback fires.
    Success,
    /// The attempt should be retried; the on-retry callback decides.
    Retry,
    /// The attempt failed terminally; the on-fail callback fires.
    Fail,
    /// The code is not in the table; logged and otherwise ignored.
    Unclassified,
}

/// Map an HTTP status code to an [`Outcome`].
///
/// Pure function over a fixed table. Note that redirect codes classify as
/// `Success` (the client follows them before the pool sees the response)
/// and that most 4xx codes worth re-attempting with a different proxy or
/// after a pause classify as `Retry`.
pub fn classify(code: u16) -> Outcome {
    match code {
        200 | 201 | 202 | 203 | 301 | 302 | 307 | 421 => Outcome::Success,
        204 | 400 | 404 | 500 | 501 => Outcome::Fail,
        401 | 402 | 403 | 405 | 406 | 407 | 408 | 502 | 503 | 504 | 505 => Outcome::Retry,
        _ => Outcome::Unclassified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_codes() {
        for code in [200, 201, 202, 203, 301, 302, 307, 421] {
            assert_eq!(classify(code), Outcome::Success, "code {code}");
        }
    }

    #[test]
    fn fail_codes() {
        for code in [204, 400, 404, 500, 501] {
            assert_eq!(classify(code), Outcome::Fail, "code {code}");
        }
    }

    #[test]
    fn retry_codes() {
        for code in [401, 402, 403, 405, 406, 407, 408, 502, 503, 504, 505] {
            assert_eq!(classify(code), Outcome::Retry, "code {code}");
        }
    }

    #[test]
    fn unmapped_codes_are_unclassified() {
        for code in [100, 206, 308, 418, 429, 999] {
            assert_eq!(classify(code), Outcome::Unclassified, "code {code}");
        }
    }

    #[test]
    fn classification_is_stable() {
        // repeated calls with the same code always agree
        assert_eq!(classify(503), classify(503));
        assert_eq!(classify(503), Outcome::Retry);
    }
}
