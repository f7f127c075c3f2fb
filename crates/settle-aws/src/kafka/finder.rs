//! MSK lookups; a `NotFoundException` yields `None`

use super::api::KafkaApi;
use super::types::{ClusterInfo, ClusterOperationInfo, ConfigurationInfo};
use settle_core::ApiError;

fn not_found_as_none<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub async fn find_cluster_by_arn(
    api: &dyn KafkaApi,
    arn: &str,
) -> Result<Option<ClusterInfo>, ApiError> {
    not_found_as_none(api.describe_cluster(arn).await)
}

pub async fn find_cluster_operation_by_arn(
    api: &dyn KafkaApi,
    arn: &str,
) -> Result<Option<ClusterOperationInfo>, ApiError> {
    not_found_as_none(api.describe_cluster_operation(arn).await)
}

pub async fn find_configuration_by_arn(
    api: &dyn KafkaApi,
    arn: &str,
) -> Result<Option<ConfigurationInfo>, ApiError> {
    not_found_as_none(api.describe_configuration(arn).await)
}
