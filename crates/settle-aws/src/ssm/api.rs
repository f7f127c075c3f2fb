//! SSM client interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use settle_core::{ApiError, Page};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub arn: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[async_trait]
pub trait SsmApi: Send + Sync {
    /// One page of GetParametersByPath
    async fn get_parameters_by_path(
        &self,
        path: &str,
        with_decryption: bool,
        next_token: Option<String>,
    ) -> Result<Page<Parameter>, ApiError>;
}
