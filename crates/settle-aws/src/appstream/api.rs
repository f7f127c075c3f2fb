//! AppStream control-plane client interface

use super::types::{Fleet, FleetConfig, UpdateFleetInput};
use crate::tags::Tags;
use async_trait::async_trait;
use settle_core::ApiError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The subset of the AppStream API the fleet handler needs
#[async_trait]
pub trait AppStreamApi: Send + Sync {
    async fn create_fleet(&self, input: &FleetConfig) -> ApiResult<Fleet>;

    async fn describe_fleets(&self, names: &[String]) -> ApiResult<Vec<Fleet>>;

    async fn update_fleet(&self, input: &UpdateFleetInput) -> ApiResult<Fleet>;

    async fn start_fleet(&self, name: &str) -> ApiResult<()>;

    async fn stop_fleet(&self, name: &str) -> ApiResult<()>;

    async fn delete_fleet(&self, name: &str) -> ApiResult<()>;

    /// `None` when the resource carries no tag set at all
    async fn list_tags(&self, arn: &str) -> ApiResult<Option<Tags>>;

    async fn tag_resource(&self, arn: &str, tags: &Tags) -> ApiResult<()>;

    async fn untag_resource(&self, arn: &str, keys: &[String]) -> ApiResult<()>;
}
