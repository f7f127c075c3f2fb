//! Fleet refresh function

use super::api::AppStreamApi;
use super::finder::find_fleet_by_name;
use super::types::Fleet;
use crate::error::AwsError;
use settle_core::{ApiError, RefreshResult};

/// One poll of the fleet's `State`; a missing fleet is reported as gone
pub async fn fleet_state(
    api: &dyn AppStreamApi,
    name: &str,
) -> Result<RefreshResult<Fleet>, ApiError> {
    match find_fleet_by_name(api, name).await {
        Ok(Some(fleet)) => {
            let state = fleet.state.clone();
            Ok(RefreshResult::new(fleet, state))
        }
        Ok(None) | Err(AwsError::EmptyResult) => Ok(RefreshResult::gone()),
        Err(AwsError::Api(err)) => Err(err),
        Err(other) => Err(ApiError::new("InvalidResponse", other.to_string())),
    }
}
