//! Error types shared by every resource kind

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error code the control-plane APIs use for a missing resource
pub const NOT_FOUND_CODES: &[&str] = &[
    "ResourceNotFoundException",
    "NotFoundException",
    "ParameterNotFound",
];

/// A classified remote API error
///
/// Probers and API clients report failures as an error code plus a message,
/// so callers can tell "not found" apart from every other failure without
/// inspecting SDK-specific types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("ResourceNotFoundException", message)
    }

    /// Whether this error carries exactly the given code
    pub fn code_equals(&self, code: &str) -> bool {
        self.code == code
    }

    /// Whether the remote resource does not exist
    pub fn is_not_found(&self) -> bool {
        NOT_FOUND_CODES.contains(&self.code.as_str())
    }
}

/// Why an operation context stopped
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

/// Resource-reported root cause of a failed lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    pub code: String,
    pub message: String,
}

impl FailureDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

fn last_error_suffix(last_error: &Option<FailureDetail>) -> String {
    match last_error {
        Some(detail) => format!(". last error: {}", detail),
        None => String::new(),
    }
}

/// Terminal failure of a state-change wait
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaitError {
    /// The refresh call itself failed
    #[error("refreshing state: {0}")]
    Refresh(#[source] ApiError),

    /// The resource reported a status outside the pending and target sets
    #[error(
        "unexpected state '{state}', wanted target '{}'{}",
        .expected.join(", "),
        last_error_suffix(.last_error)
    )]
    UnexpectedState {
        state: String,
        expected: Vec<String>,
        last_error: Option<FailureDetail>,
    },

    /// The resource stayed absent for more consecutive polls than allowed
    #[error("couldn't find resource ({checks} retries)")]
    NotFound { checks: u32 },

    /// The total wait time elapsed before a target status was observed
    #[error(
        "timeout while waiting for state to become '{}' (last state: '{last_state}', timeout: {timeout:?}){}",
        .expected.join(", "),
        last_error_suffix(.last_error)
    )]
    Timeout {
        timeout: Duration,
        last_state: String,
        expected: Vec<String>,
        last_error: Option<FailureDetail>,
    },

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl WaitError {
    /// Attach the resource-reported failure detail
    ///
    /// Only unexpected-state and timeout errors carry a failure detail; other
    /// variants are left untouched.
    pub fn set_last_error(&mut self, detail: FailureDetail) {
        match self {
            WaitError::UnexpectedState { last_error, .. } | WaitError::Timeout { last_error, .. } => {
                *last_error = Some(detail);
            }
            _ => {}
        }
    }

    pub fn with_last_error(mut self, detail: FailureDetail) -> Self {
        self.set_last_error(detail);
        self
    }

    /// The failure detail attached by the caller, if any
    pub fn last_error(&self) -> Option<&FailureDetail> {
        match self {
            WaitError::UnexpectedState { last_error, .. } | WaitError::Timeout { last_error, .. } => {
                last_error.as_ref()
            }
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout { .. })
    }

    pub fn is_unexpected_state(&self) -> bool {
        matches!(self, WaitError::UnexpectedState { .. })
    }
}

/// Failure of a bounded retry loop around a mutating call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetryError {
    /// Every attempt failed with a retryable error until time ran out
    #[error("timeout after {timeout:?} retrying: {last_error}")]
    Timeout {
        timeout: Duration,
        last_error: ApiError,
    },

    /// An attempt failed with an error that must not be retried
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl RetryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RetryError::Timeout { .. })
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
