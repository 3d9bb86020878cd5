//! # Dataset Catalog Error Types
//!
//! - **Routing errors**: two datasets have no foreign-key route between them,
//!   so their fields cannot share a query. This is a user configuration
//!   problem and is reported as such.
//! - **Definition errors**: duplicate names and foreign keys pointing at
//!   fields that do not exist.
//! - **Browse errors**: the join tree from a base would exceed its node budget.
//! - **Configuration errors**: file I/O and YAML parsing.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatasetCatalogError {
    #[error("Datasets `{from}` and `{to}` are not connected by any foreign key; their fields cannot share a query")]
    NoRoute { from: String, to: String },
    #[error("Unknown dataset `{dataset}`")]
    UnknownDataset { dataset: String },
    #[error("Duplicate dataset `{dataset}`")]
    DuplicateDataset { dataset: String },
    #[error("Duplicate field `{fid}` in dataset `{dataset}`")]
    DuplicateField { dataset: String, fid: String },
    #[error("Foreign key `{dataset}.{fid}` references missing field `{target_dataset}.{target_fid}`")]
    DanglingForeignKey {
        dataset: String,
        fid: String,
        target_dataset: String,
        target_fid: String,
    },
    #[error("Browse tree from `{base}` exceeds {limit} nodes; lower the browse depth")]
    BrowseTreeTooLarge { base: String, limit: usize },
    #[error("Failed to read catalog file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse catalog: {error}")]
    ConfigParseError { error: String },
}
