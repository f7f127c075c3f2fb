//! MSK waiters
//!
//! A failed cluster (or cluster operation) reports the root cause in its own
//! snapshot. When a wait ends on such a snapshot, the cause is attached to
//! the returned [`WaitError`] as its last error.

use super::api::KafkaApi;
use super::status::{cluster_operation_state, cluster_state, configuration_state};
use super::types::{
    ClusterInfo, ClusterOperationInfo, ConfigurationInfo, cluster_operation_state as op_state,
    cluster_state as state, configuration_state as config_state,
};
use settle_core::{
    FailureDetail, OperationContext, Polling, StateChangeConf, WaitError, WaitFailure,
};
use std::time::Duration;

fn detail(code: &Option<String>, message: &Option<String>) -> FailureDetail {
    FailureDetail::new(
        code.clone().unwrap_or_default(),
        message.clone().unwrap_or_default(),
    )
}

/// Attach `state_info` of a FAILED cluster to the wait error
fn cluster_failure(failure: WaitFailure<ClusterInfo>) -> WaitError {
    let WaitFailure { mut error, last } = failure;
    if let Some(cluster) = last {
        if cluster.state == state::FAILED {
            if let Some(info) = &cluster.state_info {
                error.set_last_error(detail(&info.code, &info.message));
            }
        }
    }
    error
}

/// Attach `error_info` of an UPDATE_FAILED operation to the wait error
fn operation_failure(failure: WaitFailure<ClusterOperationInfo>) -> WaitError {
    let WaitFailure { mut error, last } = failure;
    if let Some(operation) = last {
        if operation.operation_state == op_state::UPDATE_FAILED {
            if let Some(info) = &operation.error_info {
                error.set_last_error(detail(&info.error_code, &info.error_string));
            }
        }
    }
    error
}

pub async fn cluster_created(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    timeout: Duration,
    polling: &Polling,
) -> Result<Option<ClusterInfo>, WaitError> {
    polling
        .apply(StateChangeConf::new(&[state::CREATING], &[state::ACTIVE], timeout))
        .wait_for_state(ctx, || cluster_state(api, arn))
        .await
        .map_err(cluster_failure)
}

pub async fn cluster_deleted(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    timeout: Duration,
    polling: &Polling,
) -> Result<Option<ClusterInfo>, WaitError> {
    polling
        .apply(StateChangeConf::new(&[state::DELETING], &[], timeout))
        .wait_for_state(ctx, || cluster_state(api, arn))
        .await
        .map_err(cluster_failure)
}

pub async fn cluster_operation_completed(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    timeout: Duration,
    polling: &Polling,
) -> Result<Option<ClusterOperationInfo>, WaitError> {
    polling
        .apply(StateChangeConf::new(
            &[op_state::PENDING, op_state::UPDATE_IN_PROGRESS],
            &[op_state::UPDATE_COMPLETE],
            timeout,
        ))
        .wait_for_state(ctx, || cluster_operation_state(api, arn))
        .await
        .map_err(operation_failure)
}

pub async fn configuration_deleted(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    timeout: Duration,
    polling: &Polling,
) -> Result<Option<ConfigurationInfo>, WaitError> {
    polling
        .apply(StateChangeConf::new(&[config_state::DELETING], &[], timeout))
        .wait_for_state(ctx, || configuration_state(api, arn))
        .await
        .map_err(WaitFailure::into_error)
}
