//! Generic scoped repository engine

use super::audit;
use super::capability::{Capability, EntityCapabilities, ScopedEntity};
use super::clock::{Clock, SystemClock};
use super::filter::{CustomFilter, FilterChain};
use super::paging;
use crate::config::PagingConfig;
use crate::contract::{
    EntityRepository, IdOf, OperationContext, PagedResult, QueryOptions, RepositoryError,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, Iterable, ModelTrait, PaginatorTrait, PrimaryKeyToColumn, QueryFilter,
    QuerySelect, Select,
};
use std::sync::Arc;

/// Repository over one entity type
///
/// Built once per entity type and shared; the capability declaration is
/// validated in [`Repository::new`] and never re-inspected per call.
pub struct Repository<E: EntityTrait> {
    db: Arc<DatabaseConnection>,
    capabilities: Arc<EntityCapabilities<E>>,
    chain: FilterChain<E>,
    paging: PagingConfig,
    clock: Arc<dyn Clock>,
}

impl<E: EntityTrait> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            capabilities: self.capabilities.clone(),
            chain: self.chain.clone(),
            paging: self.paging.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<E> Repository<E>
where
    E: ScopedEntity + 'static,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
{
    /// Validate the capability declaration of `E` and build the filter chain
    pub fn new(db: Arc<DatabaseConnection>) -> Result<Self, RepositoryError> {
        let capabilities = EntityCapabilities::<E>::resolve()?;
        let chain = FilterChain::new(&capabilities);
        tracing::debug!(
            entity = capabilities.entity_name(),
            stages = ?chain.stages(),
            "Repository created"
        );
        Ok(Self {
            db,
            capabilities: Arc::new(capabilities),
            chain,
            paging: PagingConfig::default(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Register a custom filter stage
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: CustomFilter<E> + 'static,
    {
        self.chain.push(Arc::new(filter));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_paging(mut self, paging: PagingConfig) -> Self {
        self.paging = paging;
        self
    }

    pub fn capabilities(&self) -> &EntityCapabilities<E> {
        &self.capabilities
    }

    pub fn implements(&self, capability: Capability) -> bool {
        self.capabilities.implements(capability)
    }

    /// First page at the configured default size
    pub fn default_options(&self) -> QueryOptions<E> {
        QueryOptions::first_page(self.paging.default_page_size)
    }

    fn entity(&self) -> &str {
        self.capabilities.entity_name()
    }

    fn conn(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    fn scoped(&self, ctx: &OperationContext) -> Select<E> {
        self.chain.apply(E::find(), ctx)
    }

    pub async fn get_by_id(
        &self,
        ctx: &OperationContext,
        id: IdOf<E>,
    ) -> Result<Option<E::Model>, RepositoryError> {
        let found = self
            .chain
            .apply(E::find_by_id(id), ctx)
            .one(self.conn())
            .await?;
        tracing::debug!(entity = self.entity(), found = found.is_some(), "get_by_id");
        Ok(found)
    }

    pub async fn get_all(&self, ctx: &OperationContext) -> Result<Vec<E::Model>, RepositoryError> {
        let rows = paging::apply_ordering(self.scoped(ctx), &[])
            .all(self.conn())
            .await?;
        tracing::debug!(entity = self.entity(), rows = rows.len(), "get_all");
        Ok(rows)
    }

    pub async fn get_page(
        &self,
        ctx: &OperationContext,
        options: &QueryOptions<E>,
    ) -> Result<PagedResult<E::Model>, RepositoryError> {
        let window = paging::resolve_window(
            &self.paging,
            self.entity(),
            options.page_number(),
            options.page_size(),
        )?;

        let mut select = self.scoped(ctx);
        if let Some(condition) = options.condition() {
            select = select.filter(condition.clone());
        }

        let total_count = select.clone().count(self.conn()).await?;
        let items = paging::apply_ordering(select, options.ordering())
            .offset(window.offset())
            .limit(window.limit())
            .all(self.conn())
            .await?;

        tracing::debug!(
            entity = self.entity(),
            page = window.page_number,
            size = window.page_size,
            total_count,
            rows = items.len(),
            "get_page"
        );
        Ok(PagedResult::new(
            items,
            total_count,
            window.page_number,
            window.page_size,
        ))
    }

    pub async fn find_by(
        &self,
        ctx: &OperationContext,
        condition: Condition,
    ) -> Result<Vec<E::Model>, RepositoryError> {
        let rows = paging::apply_ordering(self.scoped(ctx).filter(condition), &[])
            .all(self.conn())
            .await?;
        Ok(rows)
    }

    pub async fn count(&self, ctx: &OperationContext) -> Result<u64, RepositoryError> {
        Ok(self.scoped(ctx).count(self.conn()).await?)
    }

    pub async fn exists(&self, ctx: &OperationContext, id: IdOf<E>) -> Result<bool, RepositoryError> {
        let matches = self
            .chain
            .apply(E::find_by_id(id), ctx)
            .count(self.conn())
            .await?;
        Ok(matches > 0)
    }

    pub async fn add(
        &self,
        ctx: &OperationContext,
        entity: E::ActiveModel,
    ) -> Result<E::Model, RepositoryError> {
        let mut active = entity;
        audit::stamp_insert(&self.capabilities, self.clock.as_ref(), ctx, &mut active)?;

        let model = active.insert(self.conn()).await?;
        tracing::debug!(entity = self.entity(), tenant = ?ctx.tenant_id, "add");
        Ok(model)
    }

    /// Update a row visible in the caller's scope
    ///
    /// The primary key must be set on `entity`. Returns `None` when no such
    /// row is visible, including rows of other tenants and soft-deleted rows.
    pub async fn update(
        &self,
        ctx: &OperationContext,
        entity: E::ActiveModel,
    ) -> Result<Option<E::Model>, RepositoryError> {
        let key = key_of_active::<E>(&entity).ok_or_else(|| {
            RepositoryError::validation(self.entity(), "primary key must be set to update")
        })?;
        let scope = self.chain.condition(ctx);

        let visible = E::find()
            .filter(key)
            .filter(scope.clone())
            .count(self.conn())
            .await?;
        if visible == 0 {
            tracing::debug!(entity = self.entity(), "update target not visible");
            return Ok(None);
        }

        let mut active = entity;
        audit::stamp_update(&self.capabilities, self.clock.as_ref(), ctx, &mut active);

        match E::update(active).filter(scope).exec(self.conn()).await {
            Ok(model) => {
                tracing::debug!(entity = self.entity(), "update");
                Ok(Some(model))
            }
            Err(err) if is_not_updated(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a row visible in the caller's scope
    ///
    /// Soft-deletable entities get their deletion columns stamped and stay in
    /// the store; others are removed. Returns `false` when no visible row
    /// matched, which also covers repeating a delete.
    pub async fn delete(&self, ctx: &OperationContext, id: IdOf<E>) -> Result<bool, RepositoryError> {
        let scope = self.chain.condition(ctx);
        let Some(model) = E::find_by_id(id)
            .filter(scope.clone())
            .one(self.conn())
            .await?
        else {
            tracing::debug!(entity = self.entity(), "delete target not visible");
            return Ok(false);
        };

        if self.implements(Capability::SoftDeletable) {
            let mut active: E::ActiveModel = model.into_active_model();
            audit::stamp_delete(&self.capabilities, self.clock.as_ref(), ctx, &mut active);
            return match E::update(active).filter(scope).exec(self.conn()).await {
                Ok(_) => {
                    tracing::debug!(entity = self.entity(), soft = true, "delete");
                    Ok(true)
                }
                Err(err) if is_not_updated(&err) => Ok(false),
                Err(err) => Err(err.into()),
            };
        }

        let result = E::delete_many()
            .filter(key_of_model::<E>(&model))
            .filter(scope)
            .exec(self.conn())
            .await?;
        tracing::debug!(
            entity = self.entity(),
            soft = false,
            rows = result.rows_affected,
            "delete"
        );
        Ok(result.rows_affected > 0)
    }
}

/// Key condition from the primary key values set on an active model
fn key_of_active<E: EntityTrait>(active: &E::ActiveModel) -> Option<Condition> {
    let mut condition = Condition::all();
    for key in E::PrimaryKey::iter() {
        let column = key.into_column();
        let value = active.get(column).into_value()?;
        condition = condition.add(column.eq(value));
    }
    Some(condition)
}

fn key_of_model<E: EntityTrait>(model: &E::Model) -> Condition {
    E::PrimaryKey::iter().fold(Condition::all(), |condition, key| {
        let column = key.into_column();
        condition.add(column.eq(model.get(column)))
    })
}

/// A scoped single-row update that matched nothing
fn is_not_updated(err: &DbErr) -> bool {
    matches!(err, DbErr::RecordNotUpdated | DbErr::RecordNotFound(_))
}

#[async_trait]
impl<E> EntityRepository<E> for Repository<E>
where
    E: ScopedEntity + 'static,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send,
    E::Column: Send + Sync,
{
    async fn get_by_id(
        &self,
        ctx: &OperationContext,
        id: IdOf<E>,
    ) -> Result<Option<E::Model>, RepositoryError> {
        Repository::get_by_id(self, ctx, id).await
    }

    async fn get_all(&self, ctx: &OperationContext) -> Result<Vec<E::Model>, RepositoryError> {
        Repository::get_all(self, ctx).await
    }

    async fn get_page(
        &self,
        ctx: &OperationContext,
        options: &QueryOptions<E>,
    ) -> Result<PagedResult<E::Model>, RepositoryError> {
        Repository::get_page(self, ctx, options).await
    }

    async fn find_by(
        &self,
        ctx: &OperationContext,
        condition: Condition,
    ) -> Result<Vec<E::Model>, RepositoryError> {
        Repository::find_by(self, ctx, condition).await
    }

    async fn count(&self, ctx: &OperationContext) -> Result<u64, RepositoryError> {
        Repository::count(self, ctx).await
    }

    async fn exists(&self, ctx: &OperationContext, id: IdOf<E>) -> Result<bool, RepositoryError> {
        Repository::exists(self, ctx, id).await
    }

    async fn add(
        &self,
        ctx: &OperationContext,
        entity: E::ActiveModel,
    ) -> Result<E::Model, RepositoryError> {
        Repository::add(self, ctx, entity).await
    }

    async fn update(
        &self,
        ctx: &OperationContext,
        entity: E::ActiveModel,
    ) -> Result<Option<E::Model>, RepositoryError> {
        Repository::update(self, ctx, entity).await
    }

    async fn delete(&self, ctx: &OperationContext, id: IdOf<E>) -> Result<bool, RepositoryError> {
        Repository::delete(self, ctx, id).await
    }
}
