//! MSK cluster, cluster operation and configuration model

use crate::error::{AwsError, Result};
use crate::tags::Tags;
use serde::{Deserialize, Serialize};

pub mod cluster_state {
    pub const ACTIVE: &str = "ACTIVE";
    pub const CREATING: &str = "CREATING";
    pub const DELETING: &str = "DELETING";
    pub const FAILED: &str = "FAILED";
}

pub mod cluster_operation_state {
    pub const PENDING: &str = "PENDING";
    pub const UPDATE_IN_PROGRESS: &str = "UPDATE_IN_PROGRESS";
    pub const UPDATE_COMPLETE: &str = "UPDATE_COMPLETE";
    pub const UPDATE_FAILED: &str = "UPDATE_FAILED";
}

pub mod configuration_state {
    pub const ACTIVE: &str = "ACTIVE";
    pub const DELETING: &str = "DELETING";
    pub const DELETE_FAILED: &str = "DELETE_FAILED";
}

/// Why a cluster ended up FAILED
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateInfo {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub arn: String,
    pub cluster_name: String,
    pub state: String,
    pub state_info: Option<StateInfo>,
    pub current_version: Option<String>,
    pub kafka_version: Option<String>,
    pub number_of_broker_nodes: Option<i32>,
}

/// Why a cluster operation ended up UPDATE_FAILED
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub error_code: Option<String>,
    pub error_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterOperationInfo {
    pub arn: String,
    pub cluster_arn: Option<String>,
    pub operation_type: Option<String>,
    pub operation_state: String,
    pub error_info: Option<ErrorInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationInfo {
    pub arn: String,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerNodeGroupInfo {
    pub instance_type: String,
    pub client_subnets: Vec<String>,
    #[serde(default)]
    pub security_groups: Vec<String>,
}

/// Desired configuration of an `aws_msk_cluster`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub cluster_name: String,
    pub kafka_version: String,
    pub number_of_broker_nodes: i32,
    pub broker_node_group_info: BrokerNodeGroupInfo,
    pub tags: Tags,
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cluster_name.is_empty() {
            return Err(AwsError::InvalidConfig(
                "cluster_name is required".to_string(),
            ));
        }
        if self.kafka_version.is_empty() {
            return Err(AwsError::InvalidConfig(
                "kafka_version is required".to_string(),
            ));
        }
        if self.number_of_broker_nodes < 1 {
            return Err(AwsError::InvalidConfig(format!(
                "number_of_broker_nodes must be positive, got {}",
                self.number_of_broker_nodes
            )));
        }
        let subnets = self.broker_node_group_info.client_subnets.len();
        if subnets == 0 || self.number_of_broker_nodes as usize % subnets != 0 {
            return Err(AwsError::InvalidConfig(format!(
                "number_of_broker_nodes ({}) must be a multiple of the number of client subnets ({})",
                self.number_of_broker_nodes, subnets
            )));
        }
        Ok(())
    }
}
