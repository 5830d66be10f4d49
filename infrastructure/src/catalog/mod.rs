//! Agent catalog loading

mod loader;

pub use loader::{CatalogError, CatalogLoader};
