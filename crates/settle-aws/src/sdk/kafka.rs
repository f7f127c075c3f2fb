use super::api_error;
use crate::kafka::KafkaApi;
use crate::kafka::api::ApiResult;
use crate::kafka::types::{
    ClusterConfig, ClusterInfo, ClusterOperationInfo, ConfigurationInfo, ErrorInfo, StateInfo,
};
use async_trait::async_trait;
use aws_sdk_kafka::Client;
use aws_sdk_kafka::types as sdk;
use settle_core::ApiError;
use std::collections::HashMap;

pub struct SdkKafka {
    client: Client,
}

impl SdkKafka {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn owned<'a>(value: impl Into<Option<&'a str>>) -> Option<String> {
    value.into().map(str::to_string)
}

fn missing(operation: &str, what: &str) -> ApiError {
    ApiError::new("InvalidResponse", format!("{} returned no {}", operation, what))
}

fn cluster_from_sdk(info: &sdk::ClusterInfo) -> ClusterInfo {
    let state: Option<&sdk::ClusterState> = info.state().into();
    ClusterInfo {
        arn: owned(info.cluster_arn()).unwrap_or_default(),
        cluster_name: owned(info.cluster_name()).unwrap_or_default(),
        state: state.map(|s| s.as_str().to_string()).unwrap_or_default(),
        state_info: info.state_info().map(|s| StateInfo {
            code: owned(s.code()),
            message: owned(s.message()),
        }),
        current_version: owned(info.current_version()),
        kafka_version: info
            .current_broker_software_info()
            .and_then(|software| owned(software.kafka_version())),
        number_of_broker_nodes: info.number_of_broker_nodes(),
    }
}

#[async_trait]
impl KafkaApi for SdkKafka {
    async fn create_cluster(&self, input: &ClusterConfig) -> ApiResult<String> {
        let broker = &input.broker_node_group_info;
        let broker_node_group_info = sdk::BrokerNodeGroupInfo::builder()
            .instance_type(&broker.instance_type)
            .set_client_subnets(Some(broker.client_subnets.clone()))
            .set_security_groups(Some(broker.security_groups.clone()))
            .build();

        let tags: Option<HashMap<String, String>> = if input.tags.is_empty() {
            None
        } else {
            Some(input.tags.clone().into_iter().collect())
        };

        let output = self
            .client
            .create_cluster()
            .cluster_name(&input.cluster_name)
            .kafka_version(&input.kafka_version)
            .number_of_broker_nodes(input.number_of_broker_nodes)
            .broker_node_group_info(broker_node_group_info)
            .set_tags(tags)
            .send()
            .await
            .map_err(api_error)?;

        owned(output.cluster_arn()).ok_or_else(|| missing("CreateCluster", "cluster ARN"))
    }

    async fn describe_cluster(&self, arn: &str) -> ApiResult<ClusterInfo> {
        let output = self
            .client
            .describe_cluster()
            .cluster_arn(arn)
            .send()
            .await
            .map_err(api_error)?;

        output
            .cluster_info()
            .map(cluster_from_sdk)
            .ok_or_else(|| missing("DescribeCluster", "cluster info"))
    }

    async fn describe_cluster_operation(&self, arn: &str) -> ApiResult<ClusterOperationInfo> {
        let output = self
            .client
            .describe_cluster_operation()
            .cluster_operation_arn(arn)
            .send()
            .await
            .map_err(api_error)?;

        let info = output
            .cluster_operation_info()
            .ok_or_else(|| missing("DescribeClusterOperation", "operation info"))?;

        Ok(ClusterOperationInfo {
            arn: owned(info.operation_arn()).unwrap_or_else(|| arn.to_string()),
            cluster_arn: owned(info.cluster_arn()),
            operation_type: owned(info.operation_type()),
            operation_state: owned(info.operation_state()).unwrap_or_default(),
            error_info: info.error_info().map(|e| ErrorInfo {
                error_code: owned(e.error_code()),
                error_string: owned(e.error_string()),
            }),
        })
    }

    async fn describe_configuration(&self, arn: &str) -> ApiResult<ConfigurationInfo> {
        let output = self
            .client
            .describe_configuration()
            .arn(arn)
            .send()
            .await
            .map_err(api_error)?;

        let state: Option<&sdk::ConfigurationState> = output.state().into();
        Ok(ConfigurationInfo {
            arn: owned(output.arn()).unwrap_or_else(|| arn.to_string()),
            name: owned(output.name()).unwrap_or_default(),
            state: state.map(|s| s.as_str().to_string()).unwrap_or_default(),
        })
    }

    async fn update_broker_count(
        &self,
        arn: &str,
        current_version: &str,
        target_number_of_broker_nodes: i32,
    ) -> ApiResult<String> {
        let output = self
            .client
            .update_broker_count()
            .cluster_arn(arn)
            .current_version(current_version)
            .target_number_of_broker_nodes(target_number_of_broker_nodes)
            .send()
            .await
            .map_err(api_error)?;

        owned(output.cluster_operation_arn())
            .ok_or_else(|| missing("UpdateBrokerCount", "cluster operation ARN"))
    }

    async fn delete_cluster(&self, arn: &str, current_version: Option<&str>) -> ApiResult<()> {
        self.client
            .delete_cluster()
            .cluster_arn(arn)
            .set_current_version(current_version.map(str::to_string))
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn delete_configuration(&self, arn: &str) -> ApiResult<()> {
        self.client
            .delete_configuration()
            .arn(arn)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }
}
