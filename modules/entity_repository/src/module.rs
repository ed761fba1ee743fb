//! Module wiring: configuration, connection and repository construction

use crate::config::Config;
use crate::contract::RepositoryError;
use crate::domain::{Clock, Repository, ScopedEntity, SystemClock};
use crate::infra::storage;
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::{DatabaseConnection, IntoActiveModel};
use std::sync::Arc;

/// Entity repository module
///
/// Owns the shared connection and hands out repositories configured with the
/// module's paging policy and clock.
pub struct RepositoryModule {
    config: RwLock<Config>,
    db: Arc<DatabaseConnection>,
    clock: Arc<dyn Clock>,
}

impl RepositoryModule {
    /// Validate `config` and connect to the configured database
    pub async fn init(config: Config) -> Result<Self> {
        config.validate()?;
        let db = storage::connect(&config.database).await?;
        tracing::info!(
            max_page_size = config.paging.max_page_size,
            policy = ?config.paging.policy,
            "Entity repository module initialized"
        );
        Ok(Self::from_connection(Arc::new(db), config))
    }

    /// Wrap an existing connection
    pub fn from_connection(db: Arc<DatabaseConnection>, config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            db,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for audit timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Swap the configuration; repositories built afterwards pick it up
    pub fn reconfigure(&self, config: Config) -> Result<()> {
        config.validate()?;
        *self.config.write() = config;
        tracing::info!("Entity repository configuration updated");
        Ok(())
    }

    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.db.clone()
    }

    /// Build a repository for `E`
    ///
    /// Fails when the capability declaration of `E` is inconsistent.
    pub fn repository<E>(&self) -> Result<Repository<E>, RepositoryError>
    where
        E: ScopedEntity + 'static,
        E::Model: IntoActiveModel<E::ActiveModel> + Sync,
        E::ActiveModel: Send,
    {
        let paging = self.config.read().paging.clone();
        Ok(Repository::new(self.db.clone())?
            .with_paging(paging)
            .with_clock(self.clock.clone()))
    }
}
