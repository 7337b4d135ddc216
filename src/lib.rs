//! Filtering, sorting and pagination for inventory computer lists.
//!
//! A [`FilterController`] owns the filter state of one list view. It is seeded
//! from the URL query string, replaces the history entry after every change and
//! turns a cached snapshot of [`ComputerRecord`]s into a [`Page`].

pub mod cli;
pub mod engine;
pub mod models;
pub mod query;
pub mod utils;

pub use engine::controller::{FilterController, TablePagination, TableSort};
pub use engine::paginate::Page;
pub use models::computer::{CheckStatus, ComputerRecord};
pub use models::config::FilterConfig;
pub use models::domain::{Domain, DomainLookup};
pub use models::filter::{FilterChange, FilterKey, FilterState, ServerFilter, SortField, SortOrder};
pub use query::history::{History, MemoryHistory};
pub use utils::error::{FilterError, FilterResult};
