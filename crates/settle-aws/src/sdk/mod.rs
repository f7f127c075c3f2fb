//! Bindings of the API traits to the official AWS SDK clients

mod appstream;
mod kafka;
mod ssm;

pub use appstream::SdkAppStream;
pub use kafka::SdkKafka;
pub use ssm::SdkSsm;

use crate::provider::{AwsClients, AwsProvider};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use settle_core::{ApiError, ProviderConfig};
use std::sync::Arc;

/// Classify an SDK error by its service error code
pub(crate) fn api_error<E>(err: E) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().unwrap_or("Unknown").to_string();
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };
    ApiError::new(code, message)
}

/// Load the shared AWS configuration (region / profile override)
pub async fn load_sdk_config(config: &ProviderConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

impl AwsClients {
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            appstream: Arc::new(SdkAppStream::new(aws_sdk_appstream::Client::new(sdk_config))),
            kafka: Arc::new(SdkKafka::new(aws_sdk_kafka::Client::new(sdk_config))),
            ssm: Arc::new(SdkSsm::new(aws_sdk_ssm::Client::new(sdk_config))),
        }
    }
}

impl AwsProvider {
    /// Provider backed by real SDK clients
    pub async fn from_config(config: ProviderConfig) -> Self {
        let sdk_config = load_sdk_config(&config).await;
        tracing::debug!(region = ?sdk_config.region(), "loaded AWS configuration");
        AwsProvider::new(AwsClients::from_sdk_config(&sdk_config), config)
    }
}
