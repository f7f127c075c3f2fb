use super::api_error;
use crate::ssm::{Parameter, SsmApi};
use async_trait::async_trait;
use aws_sdk_ssm::Client;
use settle_core::{ApiError, Page};

pub struct SdkSsm {
    client: Client,
}

impl SdkSsm {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SsmApi for SdkSsm {
    async fn get_parameters_by_path(
        &self,
        path: &str,
        with_decryption: bool,
        next_token: Option<String>,
    ) -> Result<Page<Parameter>, ApiError> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(path)
            .with_decryption(with_decryption)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(api_error)?;

        let items = output
            .parameters()
            .iter()
            .map(|p| Parameter {
                arn: p.arn().unwrap_or_default().to_string(),
                name: p.name().unwrap_or_default().to_string(),
                kind: p.r#type().map(|t| t.as_str().to_string()).unwrap_or_default(),
                value: p.value().unwrap_or_default().to_string(),
            })
            .collect();

        Ok(Page {
            items,
            next_token: output.next_token().map(str::to_string),
        })
    }
}
