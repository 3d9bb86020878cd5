//! Join Planner
//!
//! Turns the fields referenced by one chart query into a join plan: which
//! datasets are joined, through which foreign keys, under which aliases, and
//! how each field id must be rewritten to address its column in the joined
//! result.
//!
//! ## Module Structure
//!
//! - `alias` - deterministic path aliases ([`encode_path`])
//! - `transformer` - the [`FieldTransformer`] read/write seam to caller fields
//! - `planner` - [`JoinPlanner`] and the produced [`JoinPlan`]
//! - `join_ordering` - [`sort_foreign_keys`] for sequential JOIN syntax
//! - `types` - join clause types
//! - `errors` - [`JoinPlanError`]

pub mod alias;
pub mod errors;
pub mod join_ordering;
pub mod planner;
pub mod transformer;
pub mod types;

pub use alias::{encode_path, qualify_fid, BASE_DATASET_ALIAS};
pub use errors::JoinPlanError;
pub use join_ordering::{sort_foreign_keys, OrderedJoins};
pub use planner::{
    is_reserved_fid, plan_joins, FidRewriter, JoinPlan, JoinPlanner, PlannerOptions, DEFAULT_DATASET,
};
pub use transformer::{FieldRef, FieldSlot, FieldTransformer};
pub use types::{DatasetForeignKeyClause, ForeignKeyRef, JoinType};
