//! Contract models for repository queries
//!
//! These models are transport-agnostic and constructed per call.

use sea_orm::sea_query::{IntoCondition, Order};
use sea_orm::{Condition, EntityTrait};
use std::fmt;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        }
    }
}

/// Pagination, ordering and extra narrowing for a paged listing
///
/// Page numbers are 1-based. Values are not checked here; the repository
/// applies its configured page policy (reject or clamp) when the options are
/// used, so an invalid request never turns into an unbounded read.
#[derive(Debug, Clone)]
pub struct QueryOptions<E: EntityTrait> {
    page_number: u64,
    page_size: u64,
    ordering: Vec<(E::Column, SortDirection)>,
    condition: Option<Condition>,
}

impl<E: EntityTrait> QueryOptions<E> {
    /// Request page `page_number` (1-based) holding `page_size` items
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
            ordering: Vec::new(),
            condition: None,
        }
    }

    /// Request the first page
    pub fn first_page(page_size: u64) -> Self {
        Self::new(1, page_size)
    }

    /// Append an ordering key; keys apply in the order they were added
    pub fn order_by(mut self, column: E::Column, direction: SortDirection) -> Self {
        self.ordering.push((column, direction));
        self
    }

    /// Append an ascending ordering key
    pub fn order_by_asc(self, column: E::Column) -> Self {
        self.order_by(column, SortDirection::Ascending)
    }

    /// Append a descending ordering key
    pub fn order_by_desc(self, column: E::Column) -> Self {
        self.order_by(column, SortDirection::Descending)
    }

    /// Narrow the listing further; repeated calls are AND-ed
    pub fn filter<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let next = condition.into_condition();
        self.condition = Some(match self.condition.take() {
            Some(existing) => existing.add(next),
            None => Condition::all().add(next),
        });
        self
    }

    /// Requested page number (1-based)
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// Requested page size
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Ordering keys in application order
    pub fn ordering(&self) -> &[(E::Column, SortDirection)] {
        &self.ordering
    }

    /// Caller-supplied narrowing, if any
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<T> {
    items: Vec<T>,
    total_count: u64,
    page_number: u64,
    page_size: u64,
}

impl<T> PagedResult<T> {
    /// Assemble a page; `total_count` is the filtered count before paging
    pub fn new(items: Vec<T>, total_count: u64, page_number: u64, page_size: u64) -> Self {
        Self {
            items,
            total_count,
            page_number,
            page_size,
        }
    }

    /// Items of this page in query order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of matching rows across all pages
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Page number this result was produced for
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// Page size this result was produced with
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// `ceil(total_count / page_size)`
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert every item, keeping the paging metadata
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}
