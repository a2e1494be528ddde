//! Policy types controlling how collection reacts to failed requests.

use std::fmt;

/// What a driver does when AQS answers a request with a non-200 status.
///
/// Failed requests are never retried; the policy only decides whether the
/// run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Log the status and move on; the request contributes no rows
    #[default]
    Skip,
    /// Stop the run at the first failed request
    Abort,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailurePolicy::Skip => "skip",
            FailurePolicy::Abort => "abort",
        };
        write!(f, "{}", s)
    }
}
