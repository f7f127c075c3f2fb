//! Resource handler traits
//!
//! Every managed resource kind implements [`ResourceHandler`] and every
//! read-only lookup implements [`DataSourceHandler`]. The host runtime drives
//! them with an [`OperationContext`] and a [`ResourceData`]; API clients are
//! owned by the handler itself and injected when it is constructed.

use crate::attributes::ResourceData;
use crate::context::OperationContext;
use crate::lifecycle::OperationError;
use async_trait::async_trait;

pub type HandlerResult<T = ()> = std::result::Result<T, OperationError>;

/// CRUD handler for one resource kind
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Returns the resource type name (e.g., "aws_appstream_fleet")
    fn type_name(&self) -> &str;

    /// Create the resource, wait until it is usable, then read it back
    async fn create(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult;

    /// Refresh the state from the remote API
    ///
    /// When an existing resource is gone the handler clears the id instead of
    /// failing, so the host drops it from its tracked state.
    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult;

    /// Converge the remote resource towards the planned configuration
    async fn update(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult;

    /// Delete the resource; an already-absent resource is not an error
    async fn delete(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult;
}

/// Read-only lookup
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    fn type_name(&self) -> &str;

    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult;
}
