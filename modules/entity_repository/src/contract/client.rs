//! Repository trait for in-process consumers
//!
//! Controllers and other modules depend on this trait rather than on the
//! concrete engine, so they can be exercised against test doubles.

use super::{
    context::OperationContext,
    error::RepositoryError,
    model::{PagedResult, QueryOptions},
};
use async_trait::async_trait;
use sea_orm::{Condition, EntityTrait, PrimaryKeyTrait};

/// Identifier type of an entity (its primary key value type)
pub type IdOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Scoped CRUD over one entity type
///
/// Every read goes through the soft-delete, tenant and custom filter stages.
/// Absence is never an error: lookups return `None`, deletes return `false`.
#[async_trait]
pub trait EntityRepository<E>: Send + Sync
where
    E: EntityTrait,
{
    /// Find one entity visible in the caller's scope
    async fn get_by_id(
        &self,
        ctx: &OperationContext,
        id: IdOf<E>,
    ) -> Result<Option<E::Model>, RepositoryError>;

    /// List every visible entity (no limit is imposed)
    async fn get_all(&self, ctx: &OperationContext) -> Result<Vec<E::Model>, RepositoryError>;

    /// List one page of visible entities
    async fn get_page(
        &self,
        ctx: &OperationContext,
        options: &QueryOptions<E>,
    ) -> Result<PagedResult<E::Model>, RepositoryError>;

    /// List visible entities matching an extra condition
    async fn find_by(
        &self,
        ctx: &OperationContext,
        condition: Condition,
    ) -> Result<Vec<E::Model>, RepositoryError>;

    /// Count visible entities
    async fn count(&self, ctx: &OperationContext) -> Result<u64, RepositoryError>;

    /// Check whether an entity is visible in the caller's scope
    async fn exists(&self, ctx: &OperationContext, id: IdOf<E>) -> Result<bool, RepositoryError>;

    /// Insert a new entity, stamping audit and tenant columns
    async fn add(
        &self,
        ctx: &OperationContext,
        entity: E::ActiveModel,
    ) -> Result<E::Model, RepositoryError>;

    /// Update a visible entity; `None` if it is not visible in scope
    async fn update(
        &self,
        ctx: &OperationContext,
        entity: E::ActiveModel,
    ) -> Result<Option<E::Model>, RepositoryError>;

    /// Delete a visible entity (logically when soft-deletable)
    async fn delete(&self, ctx: &OperationContext, id: IdOf<E>) -> Result<bool, RepositoryError>;
}
