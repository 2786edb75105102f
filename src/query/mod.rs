//! Filtering, ordering and text search over task collections.
//!
//! Everything here is lenient: unknown names and bad patterns narrow or leave
//! the input alone rather than failing. Strict validation lives in the manager.

pub mod filter;
pub mod search;
pub mod sort;

pub use filter::{DateField, Preset, TagMatch, TaskFilter, TextField};
pub use search::SearchMode;
pub use sort::{SortField, SortOrder};

/// Filter criteria plus the ordering applied to the survivors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: TaskFilter,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for ListQuery {
    /// Everything, newest first.
    fn default() -> Self {
        Self {
            filter: TaskFilter::default(),
            sort_by: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl ListQuery {
    pub fn new(filter: TaskFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_by: SortField, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub mode: SearchMode,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::default(),
            sort_by: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn sorted(mut self, sort_by: SortField, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }
}
