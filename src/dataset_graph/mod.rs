//! Dataset Graph
//!
//! Datasets are nodes, declared foreign keys are edges. This module holds the
//! path primitives, the adjacency index built from a field list, and the
//! breadth-first searches over it.
//!
//! ## Module Structure
//!
//! - `join_path` - [`JoinPath`] hop type, path cancellation and reversal
//! - `adjacency` - [`DatasetGraph`] built from [`DatasetField`] declarations
//! - `search` - shortest path, reachability and browse-hop expansion

pub mod adjacency;
pub mod join_path;
mod search;

pub use adjacency::{DatasetField, DatasetGraph, ForeignKey};
pub use join_path::{is_contiguous, join_paths, merge_paths, reverse_paths, JoinPath};
