//! MSK control-plane client interface

use super::types::{ClusterConfig, ClusterInfo, ClusterOperationInfo, ConfigurationInfo};
use async_trait::async_trait;
use settle_core::ApiError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[async_trait]
pub trait KafkaApi: Send + Sync {
    /// Returns the new cluster's ARN
    async fn create_cluster(&self, input: &ClusterConfig) -> ApiResult<String>;

    async fn describe_cluster(&self, arn: &str) -> ApiResult<ClusterInfo>;

    async fn describe_cluster_operation(&self, arn: &str) -> ApiResult<ClusterOperationInfo>;

    async fn describe_configuration(&self, arn: &str) -> ApiResult<ConfigurationInfo>;

    /// Returns the ARN of the started cluster operation
    async fn update_broker_count(
        &self,
        arn: &str,
        current_version: &str,
        target_number_of_broker_nodes: i32,
    ) -> ApiResult<String>;

    async fn delete_cluster(&self, arn: &str, current_version: Option<&str>) -> ApiResult<()>;

    async fn delete_configuration(&self, arn: &str) -> ApiResult<()>;
}
