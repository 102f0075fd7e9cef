//! Catalog logic that runs over the in-memory book list

pub mod filter;
pub mod fixtures;

pub use filter::{genres, popular, recently_added, CatalogFilter};
