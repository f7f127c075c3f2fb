//! MSK refresh functions

use super::api::KafkaApi;
use super::finder::{find_cluster_by_arn, find_cluster_operation_by_arn, find_configuration_by_arn};
use super::types::{ClusterInfo, ClusterOperationInfo, ConfigurationInfo};
use settle_core::{ApiError, RefreshResult};

pub async fn cluster_state(
    api: &dyn KafkaApi,
    arn: &str,
) -> Result<RefreshResult<ClusterInfo>, ApiError> {
    Ok(match find_cluster_by_arn(api, arn).await? {
        Some(cluster) => {
            let state = cluster.state.clone();
            RefreshResult::new(cluster, state)
        }
        None => RefreshResult::gone(),
    })
}

pub async fn cluster_operation_state(
    api: &dyn KafkaApi,
    arn: &str,
) -> Result<RefreshResult<ClusterOperationInfo>, ApiError> {
    Ok(match find_cluster_operation_by_arn(api, arn).await? {
        Some(operation) => {
            let state = operation.operation_state.clone();
            RefreshResult::new(operation, state)
        }
        None => RefreshResult::gone(),
    })
}

pub async fn configuration_state(
    api: &dyn KafkaApi,
    arn: &str,
) -> Result<RefreshResult<ConfigurationInfo>, ApiError> {
    Ok(match find_configuration_by_arn(api, arn).await? {
        Some(configuration) => {
            let state = configuration.state.clone();
            RefreshResult::new(configuration, state)
        }
        None => RefreshResult::gone(),
    })
}
