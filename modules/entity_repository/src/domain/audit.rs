//! Audit and tenant stamping of active models
//!
//! Stamped columns are owned by the engine: values the caller put into them
//! are overwritten or left out of the statement.

use super::capability::EntityCapabilities;
use super::clock::Clock;
use crate::contract::{OperationContext, RepositoryError};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Value};
use uuid::Uuid;

fn no_actor() -> Value {
    Option::<Uuid>::None.into()
}

/// Prepare a new row
///
/// Creatable entities require an actor; tenant-scoped entities require an
/// active tenant, which replaces whatever tenant the caller supplied.
/// Modification and deletion columns are left to their column defaults.
pub(crate) fn stamp_insert<E: EntityTrait>(
    capabilities: &EntityCapabilities<E>,
    clock: &dyn Clock,
    ctx: &OperationContext,
    active: &mut E::ActiveModel,
) -> Result<(), RepositoryError> {
    let entity = capabilities.entity_name();

    if let Some(cols) = capabilities.creation() {
        let Some(actor) = ctx.actor_id else {
            tracing::warn!(entity, "Rejected insert without an authenticated actor");
            return Err(RepositoryError::validation(
                entity,
                "cannot create without an authenticated actor",
            ));
        };
        active.set(cols.by, actor.into());
        active.set(cols.on, clock.now().into());
    }

    if let Some(tenant_col) = capabilities.tenant() {
        let Some(tenant) = ctx.tenant_id else {
            tracing::warn!(entity, "Rejected insert without an active tenant");
            return Err(RepositoryError::validation(
                entity,
                "cannot create without an active tenant",
            ));
        };
        active.set(tenant_col, tenant.into());
    }

    for cols in [capabilities.modification(), capabilities.deletion()]
        .into_iter()
        .flatten()
    {
        active.not_set(cols.by);
        active.not_set(cols.on);
    }

    Ok(())
}

/// Prepare an update of an existing row
///
/// Creation, tenant and deletion columns are excluded from the statement so
/// an update can neither move a row between tenants nor rewrite its history.
pub(crate) fn stamp_update<E: EntityTrait>(
    capabilities: &EntityCapabilities<E>,
    clock: &dyn Clock,
    ctx: &OperationContext,
    active: &mut E::ActiveModel,
) {
    for cols in [capabilities.creation(), capabilities.deletion()]
        .into_iter()
        .flatten()
    {
        active.not_set(cols.by);
        active.not_set(cols.on);
    }
    if let Some(tenant_col) = capabilities.tenant() {
        active.not_set(tenant_col);
    }

    if let Some(cols) = capabilities.modification() {
        let actor = ctx.actor_id.map(Value::from).unwrap_or_else(no_actor);
        active.set(cols.by, actor);
        active.set(cols.on, clock.now().into());
    }
}

/// Mark a loaded row as deleted
///
/// Only the deletion columns are marked as changed.
pub(crate) fn stamp_delete<E: EntityTrait>(
    capabilities: &EntityCapabilities<E>,
    clock: &dyn Clock,
    ctx: &OperationContext,
    active: &mut E::ActiveModel,
) {
    if let Some(cols) = capabilities.deletion() {
        let actor = ctx.actor_id.map(Value::from).unwrap_or_else(no_actor);
        let at: DateTime<Utc> = clock.now();
        active.set(cols.by, actor);
        active.set(cols.on, at.into());
    }
}
