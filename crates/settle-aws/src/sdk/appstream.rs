use super::api_error;
use crate::appstream::AppStreamApi;
use crate::appstream::api::ApiResult;
use crate::appstream::types::{
    ComputeCapacity, ComputeCapacityStatus, DomainJoinInfo, Fleet, FleetConfig, UpdateFleetInput,
    VpcConfig,
};
use crate::tags::Tags;
use async_trait::async_trait;
use aws_sdk_appstream::Client;
use aws_sdk_appstream::types as sdk;
use settle_core::ApiError;
use std::collections::HashMap;

pub struct SdkAppStream {
    client: Client,
}

impl SdkAppStream {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn compute_capacity(capacity: &ComputeCapacity) -> sdk::ComputeCapacity {
    sdk::ComputeCapacity::builder()
        .desired_instances(capacity.desired_instances)
        .build()
}

fn domain_join_info(info: &DomainJoinInfo) -> sdk::DomainJoinInfo {
    sdk::DomainJoinInfo::builder()
        .set_directory_name(info.directory_name.clone())
        .set_organizational_unit_distinguished_name(
            info.organizational_unit_distinguished_name.clone(),
        )
        .build()
}

fn vpc_config(config: &VpcConfig) -> sdk::VpcConfig {
    sdk::VpcConfig::builder()
        .set_subnet_ids(Some(config.subnet_ids.clone()))
        .set_security_group_ids(Some(config.security_group_ids.clone()))
        .build()
}

// 必須/任意でアクセサの戻り値型が変わるので Into<Option<_>> で受ける
fn owned<'a>(value: impl Into<Option<&'a str>>) -> Option<String> {
    value.into().map(str::to_string)
}

fn count(value: impl Into<Option<i32>>) -> i32 {
    value.into().unwrap_or_default()
}

fn fleet_from_sdk(fleet: &sdk::Fleet) -> Fleet {
    let state: Option<&sdk::FleetState> = fleet.state().into();
    let fleet_type: Option<&sdk::FleetType> = fleet.fleet_type().into();
    let stream_view: Option<&sdk::StreamView> = fleet.stream_view().into();
    let status: Option<&sdk::ComputeCapacityStatus> = fleet.compute_capacity_status().into();

    Fleet {
        arn: owned(fleet.arn()).unwrap_or_default(),
        name: owned(fleet.name()).unwrap_or_default(),
        state: state.map(|s| s.as_str().to_string()).unwrap_or_default(),
        instance_type: owned(fleet.instance_type()).unwrap_or_default(),
        compute_capacity: status.map(|status| ComputeCapacityStatus {
            desired_instances: count(status.desired()),
            available: count(status.available()),
            in_use: count(status.in_use()),
            running: count(status.running()),
        }),
        created_time: fleet
            .created_time()
            .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
        description: owned(fleet.description()),
        display_name: owned(fleet.display_name()),
        disconnect_timeout_in_seconds: fleet.disconnect_timeout_in_seconds(),
        idle_disconnect_timeout_in_seconds: fleet.idle_disconnect_timeout_in_seconds(),
        domain_join_info: fleet.domain_join_info().map(|info| DomainJoinInfo {
            directory_name: owned(info.directory_name()),
            organizational_unit_distinguished_name: owned(
                info.organizational_unit_distinguished_name(),
            ),
        }),
        enable_default_internet_access: fleet.enable_default_internet_access(),
        fleet_type: fleet_type.map(|t| t.as_str().to_string()),
        iam_role_arn: owned(fleet.iam_role_arn()),
        image_name: owned(fleet.image_name()),
        image_arn: owned(fleet.image_arn()),
        max_user_duration_in_seconds: fleet.max_user_duration_in_seconds(),
        stream_view: stream_view.map(|v| v.as_str().to_string()),
        vpc_config: fleet.vpc_config().map(|vpc| VpcConfig {
            security_group_ids: vpc.security_group_ids().to_vec(),
            subnet_ids: vpc.subnet_ids().to_vec(),
        }),
    }
}

fn missing_fleet(operation: &str) -> ApiError {
    ApiError::new("InvalidResponse", format!("{} returned no fleet", operation))
}

#[async_trait]
impl AppStreamApi for SdkAppStream {
    async fn create_fleet(&self, input: &FleetConfig) -> ApiResult<Fleet> {
        let tags: Option<HashMap<String, String>> = if input.tags.is_empty() {
            None
        } else {
            Some(input.tags.clone().into_iter().collect())
        };

        let output = self
            .client
            .create_fleet()
            .name(&input.name)
            .instance_type(&input.instance_type)
            .compute_capacity(compute_capacity(&input.compute_capacity))
            .set_description(input.description.clone())
            .set_display_name(input.display_name.clone())
            .set_disconnect_timeout_in_seconds(input.disconnect_timeout_in_seconds)
            .set_idle_disconnect_timeout_in_seconds(input.idle_disconnect_timeout_in_seconds)
            .set_domain_join_info(input.domain_join_info.as_ref().map(domain_join_info))
            .set_enable_default_internet_access(input.enable_default_internet_access)
            .set_fleet_type(input.fleet_type.as_deref().map(sdk::FleetType::from))
            .set_iam_role_arn(input.iam_role_arn.clone())
            .set_image_name(input.image_name.clone())
            .set_image_arn(input.image_arn.clone())
            .set_max_user_duration_in_seconds(input.max_user_duration_in_seconds)
            .set_stream_view(input.stream_view.as_deref().map(sdk::StreamView::from))
            .set_vpc_config(input.vpc_config.as_ref().map(vpc_config))
            .set_tags(tags)
            .send()
            .await
            .map_err(api_error)?;

        output
            .fleet()
            .map(fleet_from_sdk)
            .ok_or_else(|| missing_fleet("CreateFleet"))
    }

    async fn describe_fleets(&self, names: &[String]) -> ApiResult<Vec<Fleet>> {
        let output = self
            .client
            .describe_fleets()
            .set_names(Some(names.to_vec()))
            .send()
            .await
            .map_err(api_error)?;

        Ok(output.fleets().iter().map(fleet_from_sdk).collect())
    }

    async fn update_fleet(&self, input: &UpdateFleetInput) -> ApiResult<Fleet> {
        let output = self
            .client
            .update_fleet()
            .name(&input.name)
            .set_compute_capacity(input.compute_capacity.as_ref().map(compute_capacity))
            .set_description(input.description.clone())
            .set_domain_join_info(input.domain_join_info.as_ref().map(domain_join_info))
            .set_disconnect_timeout_in_seconds(input.disconnect_timeout_in_seconds)
            .set_enable_default_internet_access(input.enable_default_internet_access)
            .set_idle_disconnect_timeout_in_seconds(input.idle_disconnect_timeout_in_seconds)
            .set_display_name(input.display_name.clone())
            .set_image_name(input.image_name.clone())
            .set_image_arn(input.image_arn.clone())
            .set_iam_role_arn(input.iam_role_arn.clone())
            .set_stream_view(input.stream_view.as_deref().map(sdk::StreamView::from))
            .set_instance_type(input.instance_type.clone())
            .set_max_user_duration_in_seconds(input.max_user_duration_in_seconds)
            .set_vpc_config(input.vpc_config.as_ref().map(vpc_config))
            .send()
            .await
            .map_err(api_error)?;

        output
            .fleet()
            .map(fleet_from_sdk)
            .ok_or_else(|| missing_fleet("UpdateFleet"))
    }

    async fn start_fleet(&self, name: &str) -> ApiResult<()> {
        self.client
            .start_fleet()
            .name(name)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn stop_fleet(&self, name: &str) -> ApiResult<()> {
        self.client
            .stop_fleet()
            .name(name)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn delete_fleet(&self, name: &str) -> ApiResult<()> {
        self.client
            .delete_fleet()
            .name(name)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn list_tags(&self, arn: &str) -> ApiResult<Option<Tags>> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_arn(arn)
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .tags()
            .map(|tags| tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect()))
    }

    async fn tag_resource(&self, arn: &str, tags: &Tags) -> ApiResult<()> {
        self.client
            .tag_resource()
            .resource_arn(arn)
            .set_tags(Some(tags.clone().into_iter().collect()))
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn untag_resource(&self, arn: &str, keys: &[String]) -> ApiResult<()> {
        self.client
            .untag_resource()
            .resource_arn(arn)
            .set_tag_keys(Some(keys.to_vec()))
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }
}
