//! Settle reconciliation core
//!
//! Cloud control planes change resources asynchronously: a create call
//! returns right away and the resource walks through transitional states on
//! its own schedule. This crate turns those lifecycles into bounded,
//! cancellable operations that resource handlers can drive one step at a
//! time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Host runtime / settle CLI           │
//! └─────────────────┬───────────────────────────────┘
//!                   │ ResourceHandler / DataSourceHandler
//! ┌─────────────────▼───────────────────────────────┐
//! │                  settle-core                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        Lifecycle (phase + wrap)           │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │    Waiter    │  │    Retry     │            │
//! │  └──────┬───────┘  └──────────────┘            │
//! │         │ refresh()                             │
//! └─────────┼───────────────────────────────────────┘
//!           │
//! ┌─────────▼───────────────────────────────────────┐
//! │   settle-aws (probers, refreshers, handlers)     │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod attributes;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod pagination;
pub mod retry;
pub mod waiter;

// Re-exports
pub use attributes::{AttributeMap, ResourceData};
pub use config::{Polling, ProviderConfig, Timeouts};
pub use context::OperationContext;
pub use error::{ApiError, ConfigError, ContextError, FailureDetail, RetryError, WaitError};
pub use handler::{DataSourceHandler, HandlerResult, ResourceHandler};
pub use lifecycle::{OperationError, Phase, ResultExt};
pub use pagination::{Page, collect_pages, paginate};
pub use retry::{RetryConfig, retry};
pub use waiter::{PollPolicy, RefreshResult, StateChangeConf, WaitFailure};
