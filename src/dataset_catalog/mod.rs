//! Dataset Catalog
//!
//! Declared datasets and their foreign keys, loaded from YAML. The catalog
//! answers routing questions on top of the dataset graph: the path between
//! two datasets, which datasets a base can reach, and the browse tree of
//! everything joinable from a base.

mod browse;
pub mod catalog;
pub mod errors;

pub use browse::{JoinTreeBranch, JoinTreeNode, DEFAULT_MAX_BROWSE_NODES};
pub use catalog::{CatalogConfig, DatasetCatalog, DatasetDefinition, FieldDefinition};
pub use errors::DatasetCatalogError;
