//! AWS provider: client set and handler registry

use crate::appstream::{AppStreamApi, FLEET_RESOURCE_TYPE, FleetResource};
use crate::kafka::{CLUSTER_RESOURCE_TYPE, ClusterResource, KafkaApi};
use crate::ssm::{PARAMETERS_BY_PATH_DATA_SOURCE_TYPE, ParametersByPathDataSource, SsmApi};
use settle_core::{DataSourceHandler, ProviderConfig, ResourceHandler};
use std::sync::Arc;

/// API clients injected into every handler
#[derive(Clone)]
pub struct AwsClients {
    pub appstream: Arc<dyn AppStreamApi>,
    pub kafka: Arc<dyn KafkaApi>,
    pub ssm: Arc<dyn SsmApi>,
}

pub struct AwsProvider {
    clients: AwsClients,
    config: ProviderConfig,
}

impl AwsProvider {
    pub fn new(clients: AwsClients, config: ProviderConfig) -> Self {
        Self { clients, config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn clients(&self) -> &AwsClients {
        &self.clients
    }

    /// Resource types this provider manages
    pub fn resource_types() -> &'static [&'static str] {
        &[FLEET_RESOURCE_TYPE, CLUSTER_RESOURCE_TYPE]
    }

    pub fn data_source_types() -> &'static [&'static str] {
        &[PARAMETERS_BY_PATH_DATA_SOURCE_TYPE]
    }

    /// Handler for a managed resource type
    pub fn resource(&self, type_name: &str) -> Option<Box<dyn ResourceHandler>> {
        match type_name {
            FLEET_RESOURCE_TYPE => Some(Box::new(FleetResource::new(
                self.clients.appstream.clone(),
                &self.config,
            ))),
            CLUSTER_RESOURCE_TYPE => Some(Box::new(ClusterResource::new(
                self.clients.kafka.clone(),
                &self.config,
            ))),
            _ => None,
        }
    }

    /// Handler for a read-only data source type
    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DataSourceHandler>> {
        match type_name {
            PARAMETERS_BY_PATH_DATA_SOURCE_TYPE => Some(Box::new(
                ParametersByPathDataSource::new(self.clients.ssm.clone()),
            )),
            _ => None,
        }
    }
}
