//! AppStream fleet model

use crate::error::{AwsError, Result};
use crate::tags::{self, Tags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use settle_core::ResourceData;

/// Fleet lifecycle states reported by DescribeFleets
pub mod fleet_state {
    pub const STARTING: &str = "STARTING";
    pub const RUNNING: &str = "RUNNING";
    pub const STOPPING: &str = "STOPPING";
    pub const STOPPED: &str = "STOPPED";
}

pub const FLEET_TYPES: &[&str] = &["ALWAYS_ON", "ON_DEMAND", "ELASTIC"];
pub const STREAM_VIEWS: &[&str] = &["APP", "DESKTOP"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeCapacity {
    pub desired_instances: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeCapacityStatus {
    pub desired_instances: i32,
    pub available: i32,
    pub in_use: i32,
    pub running: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainJoinInfo {
    #[serde(default)]
    pub directory_name: Option<String>,
    #[serde(default)]
    pub organizational_unit_distinguished_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcConfig {
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
}

/// Desired configuration of an `aws_appstream_fleet`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub name: String,
    pub instance_type: String,
    pub compute_capacity: ComputeCapacity,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub disconnect_timeout_in_seconds: Option<i32>,
    pub idle_disconnect_timeout_in_seconds: Option<i32>,
    pub domain_join_info: Option<DomainJoinInfo>,
    pub enable_default_internet_access: Option<bool>,
    pub fleet_type: Option<String>,
    pub iam_role_arn: Option<String>,
    pub image_name: Option<String>,
    pub image_arn: Option<String>,
    pub max_user_duration_in_seconds: Option<i32>,
    pub stream_view: Option<String>,
    pub vpc_config: Option<VpcConfig>,
    pub tags: Tags,
}

fn check_range(field: &str, value: Option<i32>, min: i32, max: i32) -> Result<()> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(AwsError::InvalidConfig(format!(
            "expected {} to be in the range ({} - {}), got {}",
            field, min, max, v
        ))),
        _ => Ok(()),
    }
}

fn check_len(field: &str, value: &Option<String>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AwsError::InvalidConfig(format!(
            "expected length of {} to be in the range (0 - {}), got {}",
            field, max, v
        ))),
        _ => Ok(()),
    }
}

fn check_one_of(field: &str, value: &Option<String>, allowed: &[&str]) -> Result<()> {
    match value {
        Some(v) if !allowed.contains(&v.as_str()) => Err(AwsError::InvalidConfig(format!(
            "expected {} to be one of {:?}, got {}",
            field, allowed, v
        ))),
        _ => Ok(()),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn non_zero(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != 0)
}

/// Observed state stores the full [`ComputeCapacityStatus`] under
/// `compute_capacity`; only `desired_instances` is configurable
fn desired_instances(value: Option<&Value>) -> Option<i64> {
    value?.get("desired_instances")?.as_i64()
}

impl FleetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(AwsError::InvalidConfig("name is required".to_string()));
        }
        if self.instance_type.is_empty() {
            return Err(AwsError::InvalidConfig(
                "instance_type is required".to_string(),
            ));
        }
        check_len("description", &self.description, 256)?;
        check_len("display_name", &self.display_name, 100)?;
        check_range(
            "disconnect_timeout_in_seconds",
            self.disconnect_timeout_in_seconds,
            60,
            360000,
        )?;
        // 0 はデフォルト値 (無効) 扱い
        check_range(
            "idle_disconnect_timeout_in_seconds",
            non_zero(self.idle_disconnect_timeout_in_seconds),
            60,
            3600,
        )?;
        check_range(
            "max_user_duration_in_seconds",
            self.max_user_duration_in_seconds,
            600,
            360000,
        )?;
        check_one_of("fleet_type", &self.fleet_type, FLEET_TYPES)?;
        check_one_of("stream_view", &self.stream_view, STREAM_VIEWS)?;
        if let Some(arn) = non_empty(&self.iam_role_arn) {
            if !arn.starts_with("arn:") {
                return Err(AwsError::InvalidConfig(format!(
                    "iam_role_arn: invalid ARN ({})",
                    arn
                )));
            }
        }
        Ok(())
    }

    /// CreateFleet request: unset and zero-valued optional fields are omitted,
    /// AWS-managed tags are dropped
    pub fn for_create(&self) -> FleetConfig {
        FleetConfig {
            name: self.name.clone(),
            instance_type: self.instance_type.clone(),
            compute_capacity: self.compute_capacity.clone(),
            description: non_empty(&self.description),
            display_name: non_empty(&self.display_name),
            disconnect_timeout_in_seconds: non_zero(self.disconnect_timeout_in_seconds),
            idle_disconnect_timeout_in_seconds: non_zero(self.idle_disconnect_timeout_in_seconds),
            domain_join_info: self.domain_join_info.clone(),
            enable_default_internet_access: self.enable_default_internet_access.filter(|v| *v),
            fleet_type: non_empty(&self.fleet_type),
            iam_role_arn: non_empty(&self.iam_role_arn),
            image_name: non_empty(&self.image_name),
            // CreateFleet takes either image_name or image_arn
            image_arn: if non_empty(&self.image_name).is_some() {
                None
            } else {
                non_empty(&self.image_arn)
            },
            max_user_duration_in_seconds: non_zero(self.max_user_duration_in_seconds),
            stream_view: non_empty(&self.stream_view),
            vpc_config: self.vpc_config.clone(),
            tags: tags::ignore_aws(&self.tags),
        }
    }
}

/// Fields changing which requires the fleet to be stopped first
pub const QUIESCE_KEYS: &[&str] = &[
    "description",
    "domain_join_info",
    "enable_default_internet_access",
    "iam_role_arn",
    "instance_type",
    "max_user_duration_in_seconds",
    "stream_view",
    "vpc_config",
];

/// UpdateFleet request carrying only the changed fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFleetInput {
    pub name: String,
    pub compute_capacity: Option<ComputeCapacity>,
    pub description: Option<String>,
    pub domain_join_info: Option<DomainJoinInfo>,
    pub disconnect_timeout_in_seconds: Option<i32>,
    pub enable_default_internet_access: Option<bool>,
    pub idle_disconnect_timeout_in_seconds: Option<i32>,
    pub display_name: Option<String>,
    pub image_name: Option<String>,
    pub image_arn: Option<String>,
    pub iam_role_arn: Option<String>,
    pub stream_view: Option<String>,
    pub instance_type: Option<String>,
    pub max_user_duration_in_seconds: Option<i32>,
    pub vpc_config: Option<VpcConfig>,
}

impl UpdateFleetInput {
    pub fn from_changes(name: &str, data: &ResourceData, config: &FleetConfig) -> Self {
        let changed = |key: &str| data.has_change(key);
        let mut input = UpdateFleetInput {
            name: name.to_string(),
            ..Default::default()
        };

        let (old_capacity, new_capacity) = data.get_change("compute_capacity");
        if desired_instances(old_capacity) != desired_instances(new_capacity) {
            input.compute_capacity = Some(config.compute_capacity.clone());
        }
        if changed("description") {
            input.description = Some(config.description.clone().unwrap_or_default());
        }
        if changed("domain_join_info") {
            input.domain_join_info = config.domain_join_info.clone();
        }
        if changed("disconnect_timeout_in_seconds") {
            input.disconnect_timeout_in_seconds = config.disconnect_timeout_in_seconds;
        }
        if changed("enable_default_internet_access") {
            input.enable_default_internet_access =
                Some(config.enable_default_internet_access.unwrap_or(false));
        }
        if changed("idle_disconnect_timeout_in_seconds") {
            input.idle_disconnect_timeout_in_seconds =
                Some(config.idle_disconnect_timeout_in_seconds.unwrap_or(0));
        }
        if changed("display_name") {
            input.display_name = Some(config.display_name.clone().unwrap_or_default());
        }
        if changed("image_name") {
            input.image_name = non_empty(&config.image_name);
        }
        if changed("image_arn") {
            input.image_arn = non_empty(&config.image_arn);
        }
        if changed("iam_role_arn") {
            input.iam_role_arn = non_empty(&config.iam_role_arn);
        }
        if changed("stream_view") {
            input.stream_view = non_empty(&config.stream_view);
        }
        if changed("instance_type") {
            input.instance_type = Some(config.instance_type.clone());
        }
        if changed("max_user_duration_in_seconds") {
            input.max_user_duration_in_seconds = config.max_user_duration_in_seconds;
        }
        if changed("vpc_config") {
            input.vpc_config = config.vpc_config.clone();
        }

        input
    }
}

/// Fleet as reported by DescribeFleets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub arn: String,
    pub name: String,
    pub state: String,
    pub instance_type: String,
    pub compute_capacity: Option<ComputeCapacityStatus>,
    pub created_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub disconnect_timeout_in_seconds: Option<i32>,
    pub idle_disconnect_timeout_in_seconds: Option<i32>,
    pub domain_join_info: Option<DomainJoinInfo>,
    pub enable_default_internet_access: Option<bool>,
    pub fleet_type: Option<String>,
    pub iam_role_arn: Option<String>,
    pub image_name: Option<String>,
    pub image_arn: Option<String>,
    pub max_user_duration_in_seconds: Option<i32>,
    pub stream_view: Option<String>,
    pub vpc_config: Option<VpcConfig>,
}
