//! Settle AWS provider
//!
//! AWS resource kinds built on the settle-core waiter and lifecycle
//! machinery.
//!
//! # Supported resources
//!
//! - **AppStream**: `aws_appstream_fleet` (create/start, quiesce update, stop/delete)
//! - **MSK**: `aws_msk_cluster`, plus cluster / cluster-operation / configuration waiters
//! - **SSM**: `aws_ssm_parameters_by_path` data source
//!
//! Handlers talk to AWS through the `AppStreamApi` / `KafkaApi` / `SsmApi`
//! traits. The `sdk` feature binds them to the official `aws-sdk-*` clients.

pub mod appstream;
pub mod error;
pub mod kafka;
pub mod provider;
pub mod ssm;
pub mod tags;

#[cfg(feature = "sdk")]
pub mod sdk;

// Re-exports
pub use appstream::AppStreamApi;
pub use error::{AwsError, Result};
pub use kafka::KafkaApi;
pub use provider::{AwsClients, AwsProvider};
pub use ssm::SsmApi;
pub use tags::{TagDiff, Tags};
