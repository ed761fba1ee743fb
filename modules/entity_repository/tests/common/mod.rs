//! Shared fixtures: test entities, an in-memory store and output helpers
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use entity_repository::config::{Config, DatabaseConfig, PagingConfig};
use entity_repository::{ManualClock, OperationContext, RepositoryModule};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use std::sync::Arc;
use uuid::Uuid;

/// Creatable + Modifiable + SoftDeletable + TenantScoped
pub mod invoice {
    use entity_repository::{AuditColumns, ScopedEntity};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "invoices")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub number: String,
        pub amount: i64,
        pub tenant_id: Uuid,
        pub created_by: Uuid,
        pub created_on: DateTimeUtc,
        pub modified_by: Option<Uuid>,
        pub modified_on: Option<DateTimeUtc>,
        pub deleted_by: Option<Uuid>,
        pub deleted_on: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ScopedEntity for Entity {
        fn creation_cols() -> Option<AuditColumns<Column>> {
            Some(AuditColumns::new(Column::CreatedBy, Column::CreatedOn))
        }

        fn modification_cols() -> Option<AuditColumns<Column>> {
            Some(AuditColumns::new(Column::ModifiedBy, Column::ModifiedOn))
        }

        fn deletion_cols() -> Option<AuditColumns<Column>> {
            Some(AuditColumns::new(Column::DeletedBy, Column::DeletedOn))
        }

        fn tenant_col() -> Option<Column> {
            Some(Column::TenantId)
        }
    }
}

/// No capabilities: plain reads, hard delete
pub mod tag {
    use entity_repository::ScopedEntity;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tags")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub label: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ScopedEntity for Entity {}
}

/// Modifiable + SoftDeletable with a client-assigned UUID key, shared by all tenants
pub mod document {
    use entity_repository::{AuditColumns, ScopedEntity};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "documents")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub title: String,
        pub modified_by: Option<Uuid>,
        pub modified_on: Option<DateTimeUtc>,
        pub deleted_by: Option<Uuid>,
        pub deleted_on: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ScopedEntity for Entity {
        fn modification_cols() -> Option<AuditColumns<Column>> {
            Some(AuditColumns::new(Column::ModifiedBy, Column::ModifiedOn))
        }

        fn deletion_cols() -> Option<AuditColumns<Column>> {
            Some(AuditColumns::new(Column::DeletedBy, Column::DeletedOn))
        }
    }
}

/// Two tenants with one actor each
#[derive(Debug, Clone, Copy)]
pub struct TestTenants {
    pub tenant_a: Uuid,
    pub actor_a: Uuid,
    pub tenant_b: Uuid,
    pub actor_b: Uuid,
}

impl TestTenants {
    pub fn new() -> Self {
        Self {
            tenant_a: Uuid::new_v4(),
            actor_a: Uuid::new_v4(),
            tenant_b: Uuid::new_v4(),
            actor_b: Uuid::new_v4(),
        }
    }

    pub fn ctx_a(&self) -> OperationContext {
        OperationContext::for_tenant(self.tenant_a, self.actor_a)
    }

    pub fn ctx_b(&self) -> OperationContext {
        OperationContext::for_tenant(self.tenant_b, self.actor_b)
    }

    pub fn print_structure(&self) {
        println!("\n📊 Tenants:");
        println!("   ├─ A: {} (actor {})", self.tenant_a, self.actor_a);
        println!("   └─ B: {} (actor {})", self.tenant_b, self.actor_b);
    }
}

impl Default for TestTenants {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestEnv {
    pub module: RepositoryModule,
    pub clock: ManualClock,
}

impl TestEnv {
    pub fn db(&self) -> Arc<DatabaseConnection> {
        self.module.connection()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh in-memory store with every test table, default paging
pub async fn setup() -> TestEnv {
    setup_with(PagingConfig::default()).await
}

pub async fn setup_with(paging: PagingConfig) -> TestEnv {
    init_tracing();

    let config = Config {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..DatabaseConfig::default()
        },
        paging,
    };
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
    let module = RepositoryModule::init(config)
        .await
        .expect("in-memory database")
        .with_clock(Arc::new(clock.clone()));

    let db = module.connection();
    create_table(&db, invoice::Entity).await;
    create_table(&db, tag::Entity).await;
    create_table(&db, document::Entity).await;

    TestEnv { module, clock }
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let backend = db.get_database_backend();
    let stmt = Schema::new(backend).create_table_from_entity(entity);
    db.execute(backend.build(&stmt))
        .await
        .expect("create table");
}

pub fn new_invoice(number: &str, amount: i64) -> invoice::ActiveModel {
    invoice::ActiveModel {
        number: sea_orm::Set(number.to_string()),
        amount: sea_orm::Set(amount),
        ..Default::default()
    }
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}
