//! Lifecycle phases and handler-level errors
//!
//! A lifecycle operation (create, quiesce-update, delete) runs several
//! mutate/wait steps. When one of them fails the whole operation aborts and
//! the error names the resource type, its identifier and the phase that
//! failed. Partial progress stays on the remote side for the next pass.

use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Step of a lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Creating,
    Reading,
    Starting,
    Stopping,
    Updating,
    UpdatingTags,
    Deleting,
    /// Waiting for the resource to reach the named state
    WaitingFor(&'static str),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Creating => write!(f, "creating"),
            Phase::Reading => write!(f, "reading"),
            Phase::Starting => write!(f, "starting"),
            Phase::Stopping => write!(f, "stopping"),
            Phase::Updating => write!(f, "updating"),
            Phase::UpdatingTags => write!(f, "updating tags for"),
            Phase::Deleting => write!(f, "deleting"),
            Phase::WaitingFor(state) => write!(f, "waiting for {}", state),
        }
    }
}

/// Error surfaced to the host runtime by a resource handler
#[derive(Debug)]
pub struct OperationError {
    pub resource_type: String,
    pub id: String,
    pub phase: Phase,
    pub source: BoxError,
}

impl std::error::Error for OperationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::WaitingFor(state) => write!(
                f,
                "error waiting for {} ({}) to be {}: {}",
                self.resource_type, self.id, state, self.source
            ),
            phase => write!(
                f,
                "error {} {} ({}): {}",
                phase, self.resource_type, self.id, self.source
            ),
        }
    }
}

impl OperationError {
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        phase: Phase,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            phase,
            source: source.into(),
        }
    }

    /// Downcast the underlying cause
    pub fn cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}

/// Attach resource type, identifier and phase to any error
pub trait ResultExt<T> {
    fn phase(self, resource_type: &str, id: &str, phase: Phase) -> Result<T, OperationError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn phase(self, resource_type: &str, id: &str, phase: Phase) -> Result<T, OperationError> {
        self.map_err(|err| OperationError::new(resource_type, id, phase, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, FailureDetail, WaitError};

    #[test]
    fn test_operation_error_message() {
        let err: Result<(), _> = Err(ApiError::new("LimitExceededException", "too many fleets"));
        let err = err
            .phase("AppStream Fleet", "web", Phase::Creating)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "error creating AppStream Fleet (web): LimitExceededException: too many fleets"
        );
        assert!(err.cause::<ApiError>().is_some());
    }

    #[test]
    fn test_waiting_phase_message_keeps_failure_detail() {
        let wait = WaitError::UnexpectedState {
            state: "FAILED".to_string(),
            expected: vec!["ACTIVE".to_string()],
            last_error: None,
        }
        .with_last_error(FailureDetail::new("InternalFailure", "broker launch failed"));

        let err = OperationError::new("MSK Cluster", "arn:cluster", Phase::WaitingFor("active"), wait);
        let message = err.to_string();
        assert!(message.starts_with("error waiting for MSK Cluster (arn:cluster) to be active"));
        assert!(message.contains("InternalFailure: broker launch failed"));
        assert_eq!(
            err.cause::<WaitError>().and_then(|w| w.last_error()).map(|d| d.code.as_str()),
            Some("InternalFailure")
        );
    }
}
