//! Caller context for repository operations
//!
//! Identity and tenancy are passed explicitly with every call instead of being
//! looked up from ambient request state.

use uuid::Uuid;

/// Supplies the identity of the actor performing the current operation
pub trait UserContextProvider: Send + Sync {
    /// Identifier of the acting user, `None` for anonymous/background work
    fn current_actor_id(&self) -> Option<Uuid>;
}

/// Supplies the tenant the current operation runs under
pub trait TenantContextProvider: Send + Sync {
    /// Identifier of the active tenant, `None` when no tenant is active
    fn current_tenant_id(&self) -> Option<Uuid>;
}

/// Per-call snapshot of the actor and tenant
///
/// Built once per logical operation and handed to every repository call.
/// The repository never reads identity or tenancy from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperationContext {
    /// Acting user (stamped into `*_by` audit columns)
    pub actor_id: Option<Uuid>,
    /// Active tenant (restricts reads, stamped on insert)
    pub tenant_id: Option<Uuid>,
}

impl OperationContext {
    /// Create a context from explicit values
    pub fn new(actor_id: Option<Uuid>, tenant_id: Option<Uuid>) -> Self {
        Self {
            actor_id,
            tenant_id,
        }
    }

    /// Context with neither actor nor tenant
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an authenticated actor acting inside a tenant
    pub fn for_tenant(tenant_id: Uuid, actor_id: Uuid) -> Self {
        Self {
            actor_id: Some(actor_id),
            tenant_id: Some(tenant_id),
        }
    }

    /// Replace the actor
    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Replace the tenant
    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Snapshot the current values of arbitrary providers
    pub fn capture(user: &dyn UserContextProvider, tenant: &dyn TenantContextProvider) -> Self {
        Self {
            actor_id: user.current_actor_id(),
            tenant_id: tenant.current_tenant_id(),
        }
    }
}

impl UserContextProvider for OperationContext {
    fn current_actor_id(&self) -> Option<Uuid> {
        self.actor_id
    }
}

impl TenantContextProvider for OperationContext {
    fn current_tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }
}
