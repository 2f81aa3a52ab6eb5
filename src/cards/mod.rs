//! Card domain: records, persistence gateway and query engine
//!
//! This module provides:
//! - Card and category models with typed drafts and patches
//! - Full-collection persistence over the local key-value store
//! - Pure filtering and sorting of the in-memory collection

pub mod models;
pub mod query;
pub mod storage;

pub use models::*;
pub use query::{filter_and_sort, DateRange, FilterOptions, SortBy, SortOptions, SortOrder};
pub use storage::{CardStorageError, CardsStorage};
