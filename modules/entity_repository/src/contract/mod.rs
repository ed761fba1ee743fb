//! Contract layer - public API consumed by controllers and other modules
//!
//! This layer contains transport-agnostic models, the caller context and the
//! repository trait. NO serde derives on models - these are pure domain types.

pub mod client;
pub mod context;
pub mod error;
pub mod model;

pub use client::{EntityRepository, IdOf};
pub use context::{OperationContext, TenantContextProvider, UserContextProvider};
pub use error::{ErrorKind, RepositoryError};
pub use model::{PagedResult, QueryOptions, SortDirection};
