//! Page window resolution and deterministic ordering

use crate::config::PagingConfig;
use crate::contract::{RepositoryError, SortDirection};
use sea_orm::sea_query::Order;
use sea_orm::{EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn, QueryOrder, Select};
use serde::{Deserialize, Serialize};

/// What to do with a page request outside the configured bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePolicy {
    /// Fail with a validation error
    #[default]
    Reject,
    /// Pull the value back into range
    Clamp,
}

/// Largest row offset or page size a store will bind (signed 64-bit)
pub const MAX_ROW_OFFSET: u64 = i64::MAX as u64;

/// Effective page after the policy has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_number: u64,
    pub page_size: u64,
}

impl PageWindow {
    /// Rows to skip
    pub fn offset(&self) -> u64 {
        self.page_number
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }

    /// Rows to take
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Check a requested page against `config`
///
/// Page numbers start at 1. A size of 0 or above `max_page_size` is out of
/// range; under [`PagePolicy::Clamp`] such values become 1 or the maximum.
/// A page whose first row lies past [`MAX_ROW_OFFSET`] is out of range too;
/// clamping moves it to the last addressable page.
pub fn resolve_window(
    config: &PagingConfig,
    entity: &str,
    page_number: u64,
    page_size: u64,
) -> Result<PageWindow, RepositoryError> {
    let max = config.max_page_size.clamp(1, MAX_ROW_OFFSET);
    match config.policy {
        PagePolicy::Reject => {
            if page_number == 0 {
                return Err(RepositoryError::validation(
                    entity,
                    "page number must be at least 1",
                ));
            }
            if page_size == 0 || page_size > max {
                return Err(RepositoryError::validation(
                    entity,
                    format!("page size must be between 1 and {max}, got {page_size}"),
                ));
            }
            if page_number > last_addressable_page(page_size) {
                return Err(RepositoryError::validation(
                    entity,
                    format!(
                        "page {page_number} of size {page_size} is beyond the addressable row range"
                    ),
                ));
            }
            Ok(PageWindow {
                page_number,
                page_size,
            })
        }
        PagePolicy::Clamp => {
            let page_size_clamped = page_size.clamp(1, max);
            let window = PageWindow {
                page_number: page_number.clamp(1, last_addressable_page(page_size_clamped)),
                page_size: page_size_clamped,
            };
            if window.page_number != page_number || window.page_size != page_size {
                tracing::debug!(
                    entity,
                    requested_page = page_number,
                    requested_size = page_size,
                    page = window.page_number,
                    size = window.page_size,
                    "Clamped page request"
                );
            }
            Ok(window)
        }
    }
}

/// Highest page number whose offset still fits [`MAX_ROW_OFFSET`]
fn last_addressable_page(page_size: u64) -> u64 {
    (MAX_ROW_OFFSET / page_size.max(1)).saturating_add(1)
}

/// Apply caller ordering, then every primary key column not already ordered
///
/// Without caller ordering the result is ordered by primary key ascending, so
/// repeated page requests over unchanged data never overlap or skip rows.
pub fn apply_ordering<E: EntityTrait>(
    select: Select<E>,
    ordering: &[(E::Column, SortDirection)],
) -> Select<E> {
    let mut select = select;
    for (column, direction) in ordering {
        select = select.order_by(*column, Order::from(*direction));
    }
    for key in E::PrimaryKey::iter() {
        let column = key.into_column();
        if !ordering.iter().any(|(c, _)| c.as_str() == column.as_str()) {
            select = select.order_by_asc(column);
        }
    }
    select
}
