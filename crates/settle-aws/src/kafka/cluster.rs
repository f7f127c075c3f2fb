//! MSK lifecycle operations and the `aws_msk_cluster` resource handler

use super::api::KafkaApi;
use super::finder::find_cluster_by_arn;
use super::types::{ClusterConfig, ClusterInfo, ClusterOperationInfo};
use super::waiter::{
    cluster_created, cluster_deleted, cluster_operation_completed, configuration_deleted,
};
use async_trait::async_trait;
use settle_core::{
    ApiError, AttributeMap, HandlerResult, OperationContext, OperationError, Phase, Polling,
    ProviderConfig, ResourceData, ResourceHandler, ResultExt, Timeouts,
};
use std::sync::Arc;
use std::time::Duration;

pub const CLUSTER_RESOURCE_TYPE: &str = "aws_msk_cluster";

const CLUSTER: &str = "MSK Cluster";
const CONFIGURATION: &str = "MSK Configuration";

/// Issue CreateCluster and return the new cluster's ARN without waiting
pub async fn request_cluster(api: &dyn KafkaApi, input: &ClusterConfig) -> HandlerResult<String> {
    tracing::info!(resource = CLUSTER, name = %input.cluster_name, "creating cluster");
    api.create_cluster(input)
        .await
        .phase(CLUSTER, &input.cluster_name, Phase::Creating)
}

async fn wait_cluster_created(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    timeout: Duration,
    polling: &Polling,
) -> HandlerResult {
    cluster_created(ctx, api, arn, timeout, polling)
        .await
        .phase(CLUSTER, arn, Phase::WaitingFor("created"))?;
    Ok(())
}

/// Create a cluster and wait until it is ACTIVE
pub async fn create_cluster(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    input: &ClusterConfig,
    timeout: Duration,
    polling: &Polling,
) -> HandlerResult<String> {
    let arn = request_cluster(api, input).await?;
    wait_cluster_created(ctx, api, &arn, timeout, polling).await?;
    Ok(arn)
}

/// Resize the broker set and wait for the cluster operation to complete
pub async fn update_broker_count(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    current_version: &str,
    target: i32,
    timeout: Duration,
    polling: &Polling,
) -> HandlerResult<Option<ClusterOperationInfo>> {
    tracing::info!(resource = CLUSTER, arn, target, "updating broker count");
    let operation_arn = api
        .update_broker_count(arn, current_version, target)
        .await
        .phase(CLUSTER, arn, Phase::Updating)?;

    cluster_operation_completed(ctx, api, &operation_arn, timeout, polling)
        .await
        .phase(CLUSTER, arn, Phase::WaitingFor("updated"))
}

/// Delete a cluster and wait until it is gone; an absent cluster is success
pub async fn delete_cluster(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    current_version: Option<&str>,
    timeout: Duration,
    polling: &Polling,
) -> HandlerResult {
    tracing::info!(resource = CLUSTER, arn, "deleting cluster");
    match api.delete_cluster(arn, current_version).await {
        Ok(()) => {}
        Err(err) if err.is_not_found() => return Ok(()),
        Err(err) => return Err(OperationError::new(CLUSTER, arn, Phase::Deleting, err)),
    }

    cluster_deleted(ctx, api, arn, timeout, polling)
        .await
        .phase(CLUSTER, arn, Phase::WaitingFor("deleted"))?;
    Ok(())
}

/// Delete a configuration and wait until it is gone; an absent configuration
/// is success
pub async fn delete_configuration(
    ctx: &OperationContext,
    api: &dyn KafkaApi,
    arn: &str,
    timeout: Duration,
    polling: &Polling,
) -> HandlerResult {
    tracing::info!(resource = CONFIGURATION, arn, "deleting configuration");
    match api.delete_configuration(arn).await {
        Ok(()) => {}
        Err(err) if err.is_not_found() => return Ok(()),
        Err(err) => return Err(OperationError::new(CONFIGURATION, arn, Phase::Deleting, err)),
    }

    configuration_deleted(ctx, api, arn, timeout, polling)
        .await
        .phase(CONFIGURATION, arn, Phase::WaitingFor("deleted"))?;
    Ok(())
}

pub struct ClusterResource {
    api: Arc<dyn KafkaApi>,
    timeouts: Timeouts,
    polling: Polling,
}

impl ClusterResource {
    pub fn new(api: Arc<dyn KafkaApi>, config: &ProviderConfig) -> Self {
        Self {
            api,
            timeouts: config.timeouts.clone(),
            polling: config.polling.clone(),
        }
    }

    fn api(&self) -> &dyn KafkaApi {
        self.api.as_ref()
    }

    async fn describe(&self, arn: &str, phase: Phase) -> HandlerResult<ClusterInfo> {
        match find_cluster_by_arn(self.api(), arn).await {
            Ok(Some(cluster)) => Ok(cluster),
            Ok(None) => Err(OperationError::new(
                CLUSTER,
                arn,
                phase,
                ApiError::new("NotFoundException", format!("cluster {} does not exist", arn)),
            )),
            Err(err) => Err(OperationError::new(CLUSTER, arn, phase, err)),
        }
    }
}

#[async_trait]
impl ResourceHandler for ClusterResource {
    fn type_name(&self) -> &str {
        CLUSTER_RESOURCE_TYPE
    }

    async fn create(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let config: ClusterConfig = data.config().phase(CLUSTER, data.id(), Phase::Creating)?;
        config
            .validate()
            .phase(CLUSTER, &config.cluster_name, Phase::Creating)?;

        let arn = request_cluster(self.api(), &config).await?;
        // 待機に失敗してもクラスタは存在するので先に ID を記録する
        data.set_id(arn.as_str());

        wait_cluster_created(
            ctx,
            self.api(),
            &arn,
            self.timeouts.cluster_create(),
            &self.polling,
        )
        .await?;
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let arn = data.id().to_string();
        if let Some(reason) = ctx.err() {
            return Err(OperationError::new(CLUSTER, &arn, Phase::Reading, reason));
        }

        let cluster = match find_cluster_by_arn(self.api(), &arn).await {
            Ok(Some(cluster)) => cluster,
            Ok(None) if !data.is_new_resource() => {
                tracing::warn!("{} ({}) not found, removing from state", CLUSTER, arn);
                data.clear_id();
                return Ok(());
            }
            Ok(None) => {
                let err = ApiError::new("NotFoundException", format!("cluster {} does not exist", arn));
                return Err(OperationError::new(CLUSTER, &arn, Phase::Reading, err));
            }
            Err(err) => return Err(OperationError::new(CLUSTER, &arn, Phase::Reading, err)),
        };

        let observed = AttributeMap::encode(&cluster).phase(CLUSTER, &arn, Phase::Reading)?;
        data.set_all(observed);
        Ok(())
    }

    async fn update(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let arn = data.id().to_string();
        let config: ClusterConfig = data.config().phase(CLUSTER, &arn, Phase::Updating)?;

        if data.has_change("number_of_broker_nodes") {
            // UpdateBrokerCount は最新の current_version を要求する
            let cluster = self.describe(&arn, Phase::Updating).await?;
            let current_version = cluster.current_version.unwrap_or_default();

            update_broker_count(
                ctx,
                self.api(),
                &arn,
                &current_version,
                config.number_of_broker_nodes,
                self.timeouts.cluster_update(),
                &self.polling,
            )
            .await?;
        }

        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let arn = data.id().to_string();
        delete_cluster(
            ctx,
            self.api(),
            &arn,
            None,
            self.timeouts.cluster_delete(),
            &self.polling,
        )
        .await
    }
}
