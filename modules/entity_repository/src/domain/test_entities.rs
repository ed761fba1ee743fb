//! Entities used by the unit tests of the domain layer

pub mod ledger_entry {
    use crate::domain::capability::{AuditColumns, ScopedEntity};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "ledger_entries")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub memo: String,
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

pub mod plain_note {
    use crate::domain::capability::ScopedEntity;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "plain_notes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub body: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ScopedEntity for Entity {}
}

/// Tenant column declared on an integer column
pub mod misdeclared {
    use crate::domain::capability::ScopedEntity;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "misdeclared")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub tenant_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ScopedEntity for Entity {
        fn tenant_col() -> Option<Column> {
            Some(Column::TenantId)
        }
    }
}

/// Tenant column used as part of a composite key
pub mod tenant_keyed {
    use crate::domain::capability::ScopedEntity;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tenant_keyed")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub tenant_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub code: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ScopedEntity for Entity {
        fn tenant_col() -> Option<Column> {
            Some(Column::TenantId)
        }
    }
}
