//! Joinplan - multi-dataset join planning for chart fields
//!
//! Charts may place fields from several datasets related by declared foreign
//! keys. This crate provides:
//! - Join paths between datasets and the graph built from foreign keys
//! - Deterministic aliases for joined dataset instances
//! - A planner producing ordered join clauses and rewritten field ids
//! - A YAML dataset catalog with routing and join-tree browsing

pub mod config;
pub mod dataset_catalog;
pub mod dataset_graph;
pub mod join_planner;
pub mod view_fields;
