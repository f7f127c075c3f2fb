//! Amazon MSK (Managed Streaming for Apache Kafka)

pub mod api;
pub mod cluster;
pub mod finder;
pub mod status;
pub mod types;
pub mod waiter;

pub use api::KafkaApi;
pub use cluster::{
    CLUSTER_RESOURCE_TYPE, ClusterResource, create_cluster, delete_cluster, delete_configuration,
    request_cluster, update_broker_count,
};
pub use finder::{find_cluster_by_arn, find_cluster_operation_by_arn, find_configuration_by_arn};
pub use status::{cluster_operation_state, cluster_state, configuration_state};
pub use types::{ClusterConfig, ClusterInfo, ClusterOperationInfo, ConfigurationInfo};
pub use waiter::{cluster_created, cluster_deleted, cluster_operation_completed, configuration_deleted};
