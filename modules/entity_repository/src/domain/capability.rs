//! Capability model for scoped entities
//!
//! An entity type declares which of its columns carry creation, modification,
//! deletion and tenant information. The declaration is read once per type:
//! [`implements_capability`] answers from a process-wide cache, and each
//! repository validates and keeps an [`EntityCapabilities`] descriptor from
//! construction onwards.
//!
//! ```rust,ignore
//! impl ScopedEntity for Entity {
//!     fn creation_cols() -> Option<AuditColumns<Column>> {
//!         Some(AuditColumns::new(Column::CreatedBy, Column::CreatedOn))
//!     }
//!     fn deletion_cols() -> Option<AuditColumns<Column>> {
//!         Some(AuditColumns::new(Column::DeletedBy, Column::DeletedOn))
//!     }
//!     fn tenant_col() -> Option<Column> {
//!         Some(Column::TenantId)
//!     }
//! }
//! ```

use crate::contract::RepositoryError;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use sea_orm::sea_query::ColumnType;
use sea_orm::{ColumnTrait, EntityName, EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn};
use std::any::TypeId;
use std::fmt;

/// Optional behaviours an entity type may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Has a primary key (every SeaORM entity)
    Identity,
    /// Tracks creator and creation time
    Creatable,
    /// Tracks last modifier and modification time
    Modifiable,
    /// Deleted logically by stamping deleter and deletion time
    SoftDeletable,
    /// Every row belongs to exactly one tenant
    TenantScoped,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Creatable => write!(f, "creatable"),
            Self::Modifiable => write!(f, "modifiable"),
            Self::SoftDeletable => write!(f, "soft_deletable"),
            Self::TenantScoped => write!(f, "tenant_scoped"),
        }
    }
}

/// "Who" and "when" columns of one audit capability
///
/// `by` holds a `Uuid` (optional for modification and deletion), `on` holds a
/// `DateTimeUtc` (optional for modification and deletion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditColumns<C> {
    pub by: C,
    pub on: C,
}

impl<C> AuditColumns<C> {
    pub fn new(by: C, on: C) -> Self {
        Self { by, on }
    }
}

/// Capability declaration of a SeaORM entity
///
/// Every method defaults to `None`, meaning the capability is absent.
pub trait ScopedEntity: EntityTrait {
    /// Creator / creation-time columns
    fn creation_cols() -> Option<AuditColumns<Self::Column>> {
        None
    }

    /// Last modifier / modification-time columns
    fn modification_cols() -> Option<AuditColumns<Self::Column>> {
        None
    }

    /// Deleter / deletion-time columns; presence enables soft delete
    fn deletion_cols() -> Option<AuditColumns<Self::Column>> {
        None
    }

    /// Tenant column; presence enables tenant isolation
    fn tenant_col() -> Option<Self::Column> {
        None
    }
}

/// Set of capabilities of one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    creatable: bool,
    modifiable: bool,
    soft_deletable: bool,
    tenant_scoped: bool,
}

impl CapabilitySet {
    /// Read the declaration of `E`
    pub fn of<E: ScopedEntity>() -> Self {
        Self {
            creatable: E::creation_cols().is_some(),
            modifiable: E::modification_cols().is_some(),
            soft_deletable: E::deletion_cols().is_some(),
            tenant_scoped: E::tenant_col().is_some(),
        }
    }

    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::Identity => true,
            Capability::Creatable => self.creatable,
            Capability::Modifiable => self.modifiable,
            Capability::SoftDeletable => self.soft_deletable,
            Capability::TenantScoped => self.tenant_scoped,
        }
    }
}

static CAPABILITY_CACHE: Lazy<DashMap<TypeId, CapabilitySet>> = Lazy::new(DashMap::new);

/// Capabilities of `E`, computed on first use and cached for the process
pub fn capabilities_of<E>() -> CapabilitySet
where
    E: ScopedEntity + 'static,
{
    *CAPABILITY_CACHE
        .entry(TypeId::of::<E>())
        .or_insert_with(CapabilitySet::of::<E>)
}

/// Whether entity type `E` implements `capability`
pub fn implements_capability<E>(capability: Capability) -> bool
where
    E: ScopedEntity + 'static,
{
    capabilities_of::<E>().contains(capability)
}

/// Validated capability descriptor held by a repository
#[derive(Debug, Clone)]
pub struct EntityCapabilities<E: EntityTrait> {
    entity: String,
    set: CapabilitySet,
    creation: Option<AuditColumns<E::Column>>,
    modification: Option<AuditColumns<E::Column>>,
    deletion: Option<AuditColumns<E::Column>>,
    tenant: Option<E::Column>,
}

#[derive(Clone, Copy)]
enum ColumnRole {
    Actor,
    Timestamp,
    Tenant,
}

impl<E> EntityCapabilities<E>
where
    E: ScopedEntity + 'static,
{
    /// Read and validate the declaration of `E`
    ///
    /// Rejects declarations whose columns have the wrong SQL type, reuse one
    /// column for two roles, or put the tenant column into the primary key.
    pub fn resolve() -> Result<Self, RepositoryError> {
        let entity = E::default().table_name().to_string();
        let descriptor = Self {
            set: capabilities_of::<E>(),
            creation: E::creation_cols(),
            modification: E::modification_cols(),
            deletion: E::deletion_cols(),
            tenant: E::tenant_col(),
            entity,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        let mut claimed: Vec<(&'static str, E::Column, ColumnRole)> = Vec::new();
        for (name, cols) in [
            ("creation", self.creation),
            ("modification", self.modification),
            ("deletion", self.deletion),
        ] {
            if let Some(cols) = cols {
                claimed.push((name, cols.by, ColumnRole::Actor));
                claimed.push((name, cols.on, ColumnRole::Timestamp));
            }
        }
        if let Some(tenant) = self.tenant {
            claimed.push(("tenant", tenant, ColumnRole::Tenant));
        }

        for (idx, (capability, column, role)) in claimed.iter().enumerate() {
            self.check_type(capability, *column, *role)?;

            if let Some((other, _, _)) = claimed
                .iter()
                .skip(idx + 1)
                .find(|(_, c, _)| c.as_str() == column.as_str())
            {
                return Err(RepositoryError::capability(
                    &self.entity,
                    format!(
                        "column '{}' is declared for both {} and {}",
                        column.as_str(),
                        capability,
                        other
                    ),
                ));
            }
        }

        if let Some(tenant) = self.tenant {
            let in_key = E::PrimaryKey::iter().any(|key| key.into_column().as_str() == tenant.as_str());
            if in_key {
                return Err(RepositoryError::capability(
                    &self.entity,
                    format!("tenant column '{}' must not be part of the primary key", tenant.as_str()),
                ));
            }
        }

        Ok(())
    }

    fn check_type(
        &self,
        capability: &str,
        column: E::Column,
        role: ColumnRole,
    ) -> Result<(), RepositoryError> {
        let def = column.def();
        let column_type = def.get_column_type();
        let (ok, expected) = match role {
            ColumnRole::Actor | ColumnRole::Tenant => {
                (matches!(column_type, ColumnType::Uuid), "a UUID")
            }
            ColumnRole::Timestamp => (
                matches!(column_type, ColumnType::TimestampWithTimeZone),
                "a timestamp with time zone",
            ),
        };
        if ok {
            return Ok(());
        }
        Err(RepositoryError::capability(
            &self.entity,
            format!(
                "{} column '{}' must be {}, found {:?}",
                capability,
                column.as_str(),
                expected,
                column_type
            ),
        ))
    }
}

impl<E: EntityTrait> EntityCapabilities<E> {
    /// Table name, used in errors and logs
    pub fn entity_name(&self) -> &str {
        &self.entity
    }

    pub fn set(&self) -> CapabilitySet {
        self.set
    }

    pub fn implements(&self, capability: Capability) -> bool {
        self.set.contains(capability)
    }

    pub fn creation(&self) -> Option<AuditColumns<E::Column>> {
        self.creation
    }

    pub fn modification(&self) -> Option<AuditColumns<E::Column>> {
        self.modification
    }

    pub fn deletion(&self) -> Option<AuditColumns<E::Column>> {
        self.deletion
    }

    pub fn tenant(&self) -> Option<E::Column> {
        self.tenant
    }
}
