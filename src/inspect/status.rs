//! Status code to log severity mapping.

/// Severity bucket a response status is logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// 401, 404 and 500. Logged at error level.
    Error,
    /// 301, 303, 307 and 308.
    Redirect,
    /// 205 Reset Content.
    ResetWarning,
    /// Everything else.
    Success,
}

impl Bucket {
    /// Classifies a status code. Unknown codes land in `Success`.
    pub fn classify(status: u16) -> Self {
        match status {
            500 | 404 | 401 => Bucket::Error,
            301 | 303 | 307 | 308 => Bucket::Redirect,
            205 => Bucket::ResetWarning,
            _ => Bucket::Success,
        }
    }

    /// ANSI SGR sequence used to highlight the status in the log line.
    pub fn color(&self) -> &'static str {
        match self {
            Bucket::Error | Bucket::ResetWarning => "\x1b[1;31m",
            Bucket::Redirect => "\x1b[1;34m",
            Bucket::Success => "\x1b[1;32m",
        }
    }
}
