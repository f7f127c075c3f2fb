//! Scripted in-memory control planes for handler tests

#![allow(dead_code)]

use async_trait::async_trait;
use settle_aws::appstream::types::{ComputeCapacityStatus, Fleet, FleetConfig, UpdateFleetInput, fleet_state};
use settle_aws::appstream::AppStreamApi;
use settle_aws::kafka::types::{ClusterConfig, ClusterInfo, ClusterOperationInfo, ConfigurationInfo};
use settle_aws::kafka::KafkaApi;
use settle_aws::ssm::{Parameter, SsmApi};
use settle_aws::Tags;
use settle_core::{ApiError, Page};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

type ApiResult<T> = Result<T, ApiError>;

/// Single-fleet AppStream fake
///
/// StartFleet / StopFleet move the fleet into STARTING / STOPPING; the next
/// DescribeFleets completes the transition.
#[derive(Default)]
pub struct FakeAppStream {
    pub fleet: Mutex<Option<Fleet>>,
    pub tags: Mutex<Tags>,
    /// CreateFleet fails with ResourceNotFoundException this many times
    pub create_not_found: Mutex<u32>,
    /// StartFleet fails with this error once
    pub start_error: Mutex<Option<ApiError>>,
    pub calls: Mutex<Vec<String>>,
    pub last_update: Mutex<Option<UpdateFleetInput>>,
}

impl FakeAppStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fleet(name: &str, state: &str) -> Self {
        let fake = Self::new();
        *fake.fleet.lock().unwrap() = Some(fleet(name, state));
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than DescribeFleets / ListTagsForResource
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c != "DescribeFleets" && c != "ListTagsForResource")
            .collect()
    }

    pub fn state(&self) -> Option<String> {
        self.fleet.lock().unwrap().as_ref().map(|f| f.state.clone())
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn missing(name: &str) -> ApiError {
        ApiError::not_found(format!("fleet {} not found", name))
    }
}

pub fn fleet(name: &str, state: &str) -> Fleet {
    Fleet {
        arn: format!("arn:aws:appstream:us-east-1:123456789012:fleet/{}", name),
        name: name.to_string(),
        state: state.to_string(),
        instance_type: "stream.standard.small".to_string(),
        compute_capacity: Some(ComputeCapacityStatus {
            desired_instances: 1,
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[async_trait]
impl AppStreamApi for FakeAppStream {
    async fn create_fleet(&self, input: &FleetConfig) -> ApiResult<Fleet> {
        self.record("CreateFleet");
        {
            let mut remaining = self.create_not_found.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ApiError::not_found("role is not visible yet"));
            }
        }

        let mut created = fleet(&input.name, fleet_state::STOPPED);
        created.instance_type = input.instance_type.clone();
        *self.tags.lock().unwrap() = input.tags.clone();
        *self.fleet.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn describe_fleets(&self, names: &[String]) -> ApiResult<Vec<Fleet>> {
        self.record("DescribeFleets");
        let mut guard = self.fleet.lock().unwrap();
        let Some(current) = guard.as_mut() else {
            return Err(Self::missing(&names.join(",")));
        };
        let snapshot = current.clone();
        match current.state.as_str() {
            fleet_state::STARTING => current.state = fleet_state::RUNNING.to_string(),
            fleet_state::STOPPING => current.state = fleet_state::STOPPED.to_string(),
            _ => {}
        }
        Ok(vec![snapshot])
    }

    async fn update_fleet(&self, input: &UpdateFleetInput) -> ApiResult<Fleet> {
        self.record("UpdateFleet");
        *self.last_update.lock().unwrap() = Some(input.clone());
        let mut guard = self.fleet.lock().unwrap();
        let current = guard.as_mut().ok_or_else(|| Self::missing(&input.name))?;
        if let Some(instance_type) = &input.instance_type {
            current.instance_type = instance_type.clone();
        }
        if input.description.is_some() {
            current.description = input.description.clone();
        }
        Ok(current.clone())
    }

    async fn start_fleet(&self, name: &str) -> ApiResult<()> {
        self.record("StartFleet");
        if let Some(err) = self.start_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut guard = self.fleet.lock().unwrap();
        let current = guard.as_mut().ok_or_else(|| Self::missing(name))?;
        current.state = fleet_state::STARTING.to_string();
        Ok(())
    }

    async fn stop_fleet(&self, name: &str) -> ApiResult<()> {
        self.record("StopFleet");
        let mut guard = self.fleet.lock().unwrap();
        let current = guard.as_mut().ok_or_else(|| Self::missing(name))?;
        current.state = fleet_state::STOPPING.to_string();
        Ok(())
    }

    async fn delete_fleet(&self, name: &str) -> ApiResult<()> {
        self.record("DeleteFleet");
        self.fleet
            .lock()
            .unwrap()
            .take()
            .map(|_| ())
            .ok_or_else(|| Self::missing(name))
    }

    async fn list_tags(&self, _arn: &str) -> ApiResult<Option<Tags>> {
        self.record("ListTagsForResource");
        Ok(Some(self.tags.lock().unwrap().clone()))
    }

    async fn tag_resource(&self, _arn: &str, tags: &Tags) -> ApiResult<()> {
        self.record("TagResource");
        self.tags.lock().unwrap().extend(tags.clone());
        Ok(())
    }

    async fn untag_resource(&self, _arn: &str, keys: &[String]) -> ApiResult<()> {
        self.record("UntagResource");
        let mut tags = self.tags.lock().unwrap();
        for key in keys {
            tags.remove(key);
        }
        Ok(())
    }
}

/// Replays a scripted sequence of responses; the final one repeats
pub struct Script<T>(Mutex<VecDeque<ApiResult<T>>>);

impl<T: Clone> Script<T> {
    pub fn new(responses: Vec<ApiResult<T>>) -> Self {
        Self(Mutex::new(responses.into()))
    }

    pub fn next(&self) -> ApiResult<T> {
        let mut queue = self.0.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ApiError::new("NoScript", "nothing scripted")))
        }
    }
}

pub fn cluster(arn: &str, state: &str) -> ClusterInfo {
    ClusterInfo {
        arn: arn.to_string(),
        cluster_name: "events".to_string(),
        state: state.to_string(),
        current_version: Some("K3AEGXETSR30VB".to_string()),
        kafka_version: Some("3.6.0".to_string()),
        number_of_broker_nodes: Some(3),
        ..Default::default()
    }
}

pub fn operation(arn: &str, state: &str) -> ClusterOperationInfo {
    ClusterOperationInfo {
        arn: arn.to_string(),
        operation_state: state.to_string(),
        ..Default::default()
    }
}

pub fn configuration(arn: &str, state: &str) -> ConfigurationInfo {
    ConfigurationInfo {
        arn: arn.to_string(),
        name: "events-config".to_string(),
        state: state.to_string(),
    }
}

pub struct FakeKafka {
    pub clusters: Script<ClusterInfo>,
    pub operations: Script<ClusterOperationInfo>,
    pub configurations: Script<ConfigurationInfo>,
    pub create_result: ApiResult<String>,
    pub update_result: ApiResult<String>,
    pub delete_result: ApiResult<()>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeKafka {
    fn default() -> Self {
        Self {
            clusters: Script::new(vec![]),
            operations: Script::new(vec![]),
            configurations: Script::new(vec![]),
            create_result: Ok(CLUSTER_ARN.to_string()),
            update_result: Ok(OPERATION_ARN.to_string()),
            delete_result: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

pub const CLUSTER_ARN: &str = "arn:aws:kafka:us-east-1:123456789012:cluster/events/abc";
pub const OPERATION_ARN: &str = "arn:aws:kafka:us-east-1:123456789012:cluster-operation/events/abc/op1";
pub const CONFIGURATION_ARN: &str = "arn:aws:kafka:us-east-1:123456789012:configuration/events-config/c1";

impl FakeKafka {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl KafkaApi for FakeKafka {
    async fn create_cluster(&self, input: &ClusterConfig) -> ApiResult<String> {
        self.record(format!("CreateCluster {}", input.cluster_name));
        self.create_result.clone()
    }

    async fn describe_cluster(&self, _arn: &str) -> ApiResult<ClusterInfo> {
        self.record("DescribeCluster");
        self.clusters.next()
    }

    async fn describe_cluster_operation(&self, _arn: &str) -> ApiResult<ClusterOperationInfo> {
        self.record("DescribeClusterOperation");
        self.operations.next()
    }

    async fn describe_configuration(&self, _arn: &str) -> ApiResult<ConfigurationInfo> {
        self.record("DescribeConfiguration");
        self.configurations.next()
    }

    async fn update_broker_count(
        &self,
        _arn: &str,
        current_version: &str,
        target: i32,
    ) -> ApiResult<String> {
        self.record(format!("UpdateBrokerCount {} {}", current_version, target));
        self.update_result.clone()
    }

    async fn delete_cluster(&self, _arn: &str, _current_version: Option<&str>) -> ApiResult<()> {
        self.record("DeleteCluster");
        self.delete_result.clone()
    }

    async fn delete_configuration(&self, _arn: &str) -> ApiResult<()> {
        self.record("DeleteConfiguration");
        self.delete_result.clone()
    }
}

pub fn parameter(name: &str, value: &str) -> Parameter {
    Parameter {
        arn: format!("arn:aws:ssm:us-east-1:123456789012:parameter{}", name),
        name: name.to_string(),
        kind: "SecureString".to_string(),
        value: value.to_string(),
    }
}

/// Pages keyed by the token that requests them (`""` for the first page)
#[derive(Default)]
pub struct FakeSsm {
    pub pages: HashMap<String, ApiResult<Page<Parameter>>>,
    pub requests: Mutex<Vec<(String, bool, Option<String>)>>,
}

impl FakeSsm {
    pub fn with_pages(pages: Vec<(&str, ApiResult<Page<Parameter>>)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(token, page)| (token.to_string(), page))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, bool, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SsmApi for FakeSsm {
    async fn get_parameters_by_path(
        &self,
        path: &str,
        with_decryption: bool,
        next_token: Option<String>,
    ) -> Result<Page<Parameter>, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), with_decryption, next_token.clone()));
        let key = next_token.unwrap_or_default();
        self.pages
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::new("InvalidNextToken", key)))
    }
}
