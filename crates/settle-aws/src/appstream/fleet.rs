//! `aws_appstream_fleet` resource handler
//!
//! A fleet must be RUNNING to serve sessions, and most of its settings can
//! only be changed while it is STOPPED. Create therefore starts the fleet
//! after creating it, and update brackets the UpdateFleet call with a
//! stop/start cycle whenever a quiesce-only field changed.

use super::api::AppStreamApi;
use super::finder::find_fleet_by_name;
use super::types::{FleetConfig, QUIESCE_KEYS, UpdateFleetInput};
use super::waiter::{fleet_state_running, fleet_state_stopped};
use crate::tags::{self, TagDiff, Tags};
use async_trait::async_trait;
use serde_json::Value;
use settle_core::{
    ApiError, AttributeMap, HandlerResult, OperationContext, OperationError, Phase, Polling,
    ProviderConfig, ResourceData, ResourceHandler, ResultExt, RetryConfig, retry,
};
use std::sync::Arc;
use std::time::Duration;

pub const FLEET_RESOURCE_TYPE: &str = "aws_appstream_fleet";

const RESOURCE: &str = "AppStream Fleet";

/// CreateFleet reports this while the referenced IAM role / image is not
/// visible yet
const RETRYABLE_CREATE_CODE: &str = "ResourceNotFoundException";

fn decode_tags(value: Option<&Value>) -> serde_json::Result<Tags> {
    match value {
        None | Some(Value::Null) => Ok(Tags::new()),
        Some(value) => serde_json::from_value(value.clone()),
    }
}

pub struct FleetResource {
    api: Arc<dyn AppStreamApi>,
    timeout: Duration,
    polling: Polling,
}

impl FleetResource {
    pub fn new(api: Arc<dyn AppStreamApi>, config: &ProviderConfig) -> Self {
        Self {
            api,
            timeout: config.timeouts.fleet_operation(),
            polling: config.polling.clone(),
        }
    }

    fn api(&self) -> &dyn AppStreamApi {
        self.api.as_ref()
    }

    async fn start_and_wait(&self, ctx: &OperationContext, name: &str) -> HandlerResult {
        tracing::info!(resource = RESOURCE, name, "starting fleet");
        self.api()
            .start_fleet(name)
            .await
            .phase(RESOURCE, name, Phase::Starting)?;

        fleet_state_running(ctx, self.api(), name, self.timeout, &self.polling)
            .await
            .phase(RESOURCE, name, Phase::WaitingFor("running"))?;
        Ok(())
    }

    /// Stop the fleet and wait for STOPPED; a missing fleet counts as stopped
    async fn stop_and_wait(&self, ctx: &OperationContext, name: &str) -> HandlerResult {
        tracing::info!(resource = RESOURCE, name, "stopping fleet");
        match self.api().stop_fleet(name).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::debug!(resource = RESOURCE, name, "fleet already gone, nothing to stop");
                return Ok(());
            }
            Err(err) => return Err(OperationError::new(RESOURCE, name, Phase::Stopping, err)),
        }

        fleet_state_stopped(ctx, self.api(), name, self.timeout, &self.polling)
            .await
            .phase(RESOURCE, name, Phase::WaitingFor("stopped"))?;
        Ok(())
    }

    async fn update_tags(&self, arn: &str, name: &str, data: &ResourceData) -> HandlerResult {
        let (old, new) = data.get_change("tags");
        let old = decode_tags(old).phase(RESOURCE, name, Phase::UpdatingTags)?;
        let new = decode_tags(new).phase(RESOURCE, name, Phase::UpdatingTags)?;

        let diff = TagDiff::between(&old, &new);
        if !diff.remove.is_empty() {
            self.api()
                .untag_resource(arn, &diff.remove)
                .await
                .phase(RESOURCE, name, Phase::UpdatingTags)?;
        }
        if !diff.upsert.is_empty() {
            self.api()
                .tag_resource(arn, &diff.upsert)
                .await
                .phase(RESOURCE, name, Phase::UpdatingTags)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceHandler for FleetResource {
    fn type_name(&self) -> &str {
        FLEET_RESOURCE_TYPE
    }

    async fn create(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let config: FleetConfig = data.config().phase(RESOURCE, data.id(), Phase::Creating)?;
        config
            .validate()
            .phase(RESOURCE, &config.name, Phase::Creating)?;

        let input = config.for_create();
        let api = self.api();
        let request = &input;

        tracing::info!(resource = RESOURCE, name = %config.name, "creating fleet");
        let fleet = retry(
            ctx,
            &RetryConfig::with_timeout(self.timeout),
            |err: &ApiError| err.code_equals(RETRYABLE_CREATE_CODE),
            move || api.create_fleet(request),
        )
        .await
        .phase(RESOURCE, &config.name, Phase::Creating)?;

        // 起動に失敗しても fleet は作成済み
        data.set_id(fleet.name.as_str());
        self.start_and_wait(ctx, &fleet.name).await?;

        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let id = data.id().to_string();
        if let Some(reason) = ctx.err() {
            return Err(OperationError::new(RESOURCE, &id, Phase::Reading, reason));
        }

        let fleet = match find_fleet_by_name(self.api(), &id).await {
            Ok(Some(fleet)) => fleet,
            Ok(None) if !data.is_new_resource() => {
                tracing::warn!("{} ({}) not found, removing from state", RESOURCE, id);
                data.clear_id();
                return Ok(());
            }
            Ok(None) => {
                let err = ApiError::not_found(format!("fleet {} does not exist", id));
                return Err(OperationError::new(RESOURCE, &id, Phase::Reading, err));
            }
            Err(err) => return Err(OperationError::new(RESOURCE, &id, Phase::Reading, err)),
        };

        let observed = AttributeMap::encode(&fleet).phase(RESOURCE, &id, Phase::Reading)?;
        data.set_all(observed);

        let tags = self
            .api()
            .list_tags(&fleet.arn)
            .await
            .phase(RESOURCE, &id, Phase::Reading)?;

        match tags {
            Some(tags) => {
                let tags = serde_json::to_value(tags::ignore_aws(&tags))
                    .phase(RESOURCE, &id, Phase::Reading)?;
                data.set("tags", tags.clone());
                data.set("tags_all", tags);
            }
            None => tracing::debug!("{} tags ({}) not found", RESOURCE, id),
        }

        Ok(())
    }

    async fn update(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let name = data.id().to_string();
        let config: FleetConfig = data.config().phase(RESOURCE, &name, Phase::Updating)?;
        config.validate().phase(RESOURCE, &name, Phase::Updating)?;

        // これらの属性は RUNNING 中の fleet には適用できない
        let should_stop = data.has_changes(QUIESCE_KEYS);
        if should_stop {
            self.stop_and_wait(ctx, &name).await?;
        }

        let input = UpdateFleetInput::from_changes(&name, data, &config);
        tracing::info!(resource = RESOURCE, name = %name, should_stop, "updating fleet");
        let fleet = self
            .api()
            .update_fleet(&input)
            .await
            .phase(RESOURCE, &name, Phase::Updating)?;

        if data.has_change("tags") {
            self.update_tags(&fleet.arn, &name, data).await?;
        }

        if should_stop {
            self.start_and_wait(ctx, &name).await?;
        }

        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let name = data.id().to_string();
        self.stop_and_wait(ctx, &name).await?;

        tracing::info!(resource = RESOURCE, name = %name, "deleting fleet");
        match self.api().delete_fleet(&name).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                tracing::debug!(resource = RESOURCE, name = %name, "fleet already deleted");
                Ok(())
            }
            Err(err) => Err(OperationError::new(RESOURCE, &name, Phase::Deleting, err)),
        }
    }
}
