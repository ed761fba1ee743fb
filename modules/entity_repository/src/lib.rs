//! Entity Repository Module
//!
//! Generic, capability-driven repository engine over SeaORM. Every entity type
//! gets soft-delete exclusion, audit stamping, tenant isolation and an
//! extension point for narrowing filters without per-entity repository code.

// Public exports
pub mod contract;
pub use contract::{
    client::EntityRepository, error::RepositoryError, OperationContext, PagedResult,
    QueryOptions, SortDirection, TenantContextProvider, UserContextProvider,
};

pub mod module;
pub use module::RepositoryModule;

pub mod config;
pub use config::Config;

pub mod domain;
pub use domain::{
    implements_capability, AuditColumns, Capability, Clock, CustomFilter, EntityCapabilities,
    ManualClock, PagePolicy, Repository, ScopedEntity, SystemClock,
};

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod infra;
