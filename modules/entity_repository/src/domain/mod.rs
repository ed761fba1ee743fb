pub(crate) mod audit;
pub mod capability;
pub mod clock;
pub mod filter;
pub mod paging;
pub mod service;

#[cfg(test)]
pub(crate) mod test_entities;

pub use capability::{
    capabilities_of, implements_capability, AuditColumns, Capability, CapabilitySet,
    EntityCapabilities, ScopedEntity,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use filter::{CustomFilter, FilterChain, FilterStage};
pub use paging::{PagePolicy, PageWindow};
pub use service::Repository;
