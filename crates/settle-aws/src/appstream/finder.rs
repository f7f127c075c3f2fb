//! Fleet lookups

use super::api::AppStreamApi;
use super::types::Fleet;
use crate::error::{AwsError, Result};

/// Describe one fleet by name
///
/// A `ResourceNotFoundException` is a data condition and yields `None`.
/// An empty or ambiguous response is an error.
pub async fn find_fleet_by_name(api: &dyn AppStreamApi, name: &str) -> Result<Option<Fleet>> {
    let fleets = match api.describe_fleets(&[name.to_string()]).await {
        Ok(fleets) => fleets,
        Err(err) if err.is_not_found() => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let count = fleets.len();
    let mut fleets = fleets.into_iter();
    match (fleets.next(), count) {
        (None, _) => Err(AwsError::EmptyResult),
        (Some(fleet), 1) => Ok(Some(fleet)),
        (Some(_), n) => Err(AwsError::TooManyResults(n)),
    }
}
