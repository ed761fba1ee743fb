//! Query filter chain
//!
//! Every read is narrowed by three stages, always in this order:
//!
//! 1. soft delete: rows with a deletion timestamp are hidden
//! 2. tenant: rows of other tenants are hidden; with no active tenant
//!    nothing is visible
//! 3. custom: caller-registered conditions, AND-ed in registration order
//!
//! Stages are combined with AND, so a later stage can only narrow the result
//! of an earlier one.

use super::capability::{EntityCapabilities, ScopedEntity};
use crate::contract::OperationContext;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select};
use std::fmt;
use std::sync::Arc;

/// Additional narrowing registered on a repository
///
/// Returning `None` leaves the query unchanged for that call.
pub trait CustomFilter<E: EntityTrait>: Send + Sync {
    fn condition(&self, ctx: &OperationContext) -> Option<Condition>;
}

impl<E, F> CustomFilter<E> for F
where
    E: EntityTrait,
    F: Fn(&OperationContext) -> Option<Condition> + Send + Sync,
{
    fn condition(&self, ctx: &OperationContext) -> Option<Condition> {
        self(ctx)
    }
}

/// Stages present in a chain, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    SoftDelete,
    Tenant,
    Custom,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SoftDelete => write!(f, "soft_delete"),
            Self::Tenant => write!(f, "tenant"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Ordered set of filter stages for one entity type
pub struct FilterChain<E: EntityTrait> {
    entity: String,
    deleted_on: Option<E::Column>,
    tenant: Option<E::Column>,
    custom: Vec<Arc<dyn CustomFilter<E>>>,
}

impl<E: EntityTrait> Clone for FilterChain<E> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            deleted_on: self.deleted_on,
            tenant: self.tenant,
            custom: self.custom.clone(),
        }
    }
}

impl<E: EntityTrait> fmt::Debug for FilterChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("entity", &self.entity)
            .field("stages", &self.stages())
            .field("custom_filters", &self.custom.len())
            .finish()
    }
}

impl<E: ScopedEntity> FilterChain<E> {
    /// Build the built-in stages from a validated descriptor
    pub fn new(capabilities: &EntityCapabilities<E>) -> Self {
        Self {
            entity: capabilities.entity_name().to_string(),
            deleted_on: capabilities.deletion().map(|cols| cols.on),
            tenant: capabilities.tenant(),
            custom: Vec::new(),
        }
    }
}

impl<E: EntityTrait> FilterChain<E> {
    /// Register a custom stage; it runs after every earlier registration
    pub fn push(&mut self, filter: Arc<dyn CustomFilter<E>>) {
        self.custom.push(filter);
    }

    pub fn stages(&self) -> Vec<FilterStage> {
        let mut stages = Vec::with_capacity(3);
        if self.deleted_on.is_some() {
            stages.push(FilterStage::SoftDelete);
        }
        if self.tenant.is_some() {
            stages.push(FilterStage::Tenant);
        }
        if !self.custom.is_empty() {
            stages.push(FilterStage::Custom);
        }
        stages
    }

    /// Combined condition of every stage for `ctx`
    pub fn condition(&self, ctx: &OperationContext) -> Condition {
        let mut condition = Condition::all();

        if let Some(deleted_on) = self.deleted_on {
            condition = condition.add(deleted_on.is_null());
        }

        if let Some(tenant_col) = self.tenant {
            condition = match ctx.tenant_id {
                Some(tenant_id) => condition.add(tenant_col.eq(tenant_id)),
                None => {
                    tracing::debug!(
                        entity = %self.entity,
                        "No active tenant for tenant-scoped read; returning no rows"
                    );
                    condition.add(match_nothing())
                }
            };
        }

        for filter in &self.custom {
            if let Some(extra) = filter.condition(ctx) {
                condition = condition.add(extra);
            }
        }

        condition
    }

    /// Narrow `select` by every stage
    pub fn apply(&self, select: Select<E>, ctx: &OperationContext) -> Select<E> {
        select.filter(self.condition(ctx))
    }
}

/// Predicate no row satisfies
fn match_nothing() -> SimpleExpr {
    Expr::val(1).eq(0)
}
