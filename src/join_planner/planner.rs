//! Multi-dataset query planner
//!
//! ## Algorithm
//!
//! ```text
//! base       = min(json([dataset, joinPath]) for each field)
//! base_path  = reverse(base.joinPath)
//! actual(p)  = merge(p ++ base_path)
//! for each field (reserved pseudo fields skipped):
//!     for each suffix of actual(field.joinPath), longest first:
//!         if encode(suffix) not introduced yet:
//!             clause suffix[0].from.fid AS encode(suffix)
//!                 = suffix[0].to.tid AS encode(suffix[1..])
//!     queue rewrite fid -> encode(actual) + "." + fid
//! more than one dataset touched -> order clauses, apply rewrites
//! otherwise                     -> no join, ids untouched
//! ```
//!
//! The base choice only depends on the set of (dataset, path) pairs, so the
//! same view always plans the same way regardless of field order.

use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use serde::Serialize;

use crate::config::PlannerConfig;
use crate::dataset_graph::{join_paths, reverse_paths, JoinPath};

use super::alias::{encode_path, BASE_DATASET_ALIAS};
use super::errors::JoinPlanError;
use super::join_ordering::{sort_foreign_keys, OrderedJoins};
use super::transformer::{FieldRef, FieldTransformer};
use super::types::{DatasetForeignKeyClause, ForeignKeyRef};

/// Dataset assumed for fields that do not name one.
pub const DEFAULT_DATASET: &str = "__GW_DEFAULT_DATASET__";

pub const MEASURE_KEY_FID: &str = "gw_mea_key_fid";
pub const MEASURE_VALUE_FID: &str = "gw_mea_val_fid";
pub const COUNT_FID: &str = "gw_count_fid";
pub const PAINT_FID: &str = "gw_paint_fid";

lazy_static! {
    /// Pseudo fields synthesized by the chart layer; they carry no column and
    /// are never join targets.
    static ref RESERVED_FIDS: HashSet<&'static str> =
        HashSet::from([MEASURE_KEY_FID, MEASURE_VALUE_FID, COUNT_FID, PAINT_FID]);
}

pub fn is_reserved_fid(fid: &str) -> bool {
    RESERVED_FIDS.contains(fid)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerOptions {
    pub default_dataset: String,
    /// Fail instead of returning a truncated clause list when ordering
    /// cannot connect every clause.
    pub strict_join_order: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            default_dataset: DEFAULT_DATASET.to_string(),
            strict_join_order: false,
        }
    }
}

/// Maps raw field ids to their address in the planned query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FidRewriter {
    /// Single-dataset query, ids stay as they are.
    #[default]
    Identity,
    /// Joined query; `base_path` re-roots caller paths at the chosen base.
    Qualified { base_path: Vec<JoinPath> },
}

impl FidRewriter {
    /// Alias prefix for a field reached through `path`, `None` when ids are
    /// not rewritten.
    pub fn prefix(&self, path: Option<&[JoinPath]>) -> Option<String> {
        match self {
            FidRewriter::Identity => None,
            FidRewriter::Qualified { base_path } => {
                Some(encode_path(&join_paths(path.unwrap_or_default(), base_path)))
            }
        }
    }

    pub fn rewrite(&self, path: Option<&[JoinPath]>, fid: &str) -> String {
        match self.prefix(path) {
            Some(prefix) => format!("{}.{}", prefix, fid),
            None => fid.to_string(),
        }
    }

    /// Rewriter bound to one path, for expressions that reference fields
    /// outside the planned transformer list.
    pub fn for_path(&self, path: Option<&[JoinPath]>) -> impl Fn(&str) -> String {
        let prefix = self.prefix(path);
        move |fid: &str| match &prefix {
            Some(prefix) => format!("{}.{}", prefix, fid),
            None => fid.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPlan {
    /// `None` when every field lives in one dataset.
    pub join_clauses: Option<Vec<DatasetForeignKeyClause>>,
    /// Datasets the query touches, base dataset first.
    pub datasets: Vec<String>,
    /// Set when ordering had to drop clauses.
    pub incomplete: bool,
    #[serde(skip)]
    pub rewriter: FidRewriter,
}

impl JoinPlan {
    fn single_dataset(datasets: Vec<String>) -> Self {
        Self {
            join_clauses: None,
            datasets,
            incomplete: false,
            rewriter: FidRewriter::Identity,
        }
    }

    pub fn is_joined(&self) -> bool {
        self.join_clauses.is_some()
    }

    pub fn rewrite(&self, path: Option<&[JoinPath]>, fid: &str) -> String {
        self.rewriter.rewrite(path, fid)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinPlanner {
    options: PlannerOptions,
}

impl JoinPlanner {
    pub fn new(options: PlannerOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(PlannerOptions {
            default_dataset: config.default_dataset.clone(),
            strict_join_order: config.strict_join_order,
        })
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Plan the joins needed to query every field together.
    ///
    /// Field ids are only rewritten when the plan actually joins, and only
    /// after ordering succeeded, so an error leaves the fields untouched.
    /// Since every emitted clause chains back to the base alias, ordering
    /// completes for any input, malformed paths included; see
    /// [`order_clauses`](Self::order_clauses).
    pub fn plan<T: FieldTransformer>(&self, transformers: &mut [T]) -> Result<JoinPlan, JoinPlanError> {
        if transformers.is_empty() {
            return Ok(JoinPlan::single_dataset(vec![self.options.default_dataset.clone()]));
        }

        let fields: Vec<FieldRef> = transformers.iter().map(|t| t.read()).collect();
        let (base_dataset, base_pair_path) = self.select_base(&fields)?;
        let base_path = reverse_paths(&base_pair_path);
        log::debug!(
            "Base dataset '{}' ({} hop(s) from its original base)",
            base_dataset,
            base_pair_path.len()
        );

        let mut introduced: HashSet<String> = HashSet::from([BASE_DATASET_ALIAS.to_string()]);
        let mut used_datasets: Vec<String> = vec![base_dataset];
        let mut clauses: Vec<DatasetForeignKeyClause> = Vec::new();
        let mut pending: Vec<(usize, String)> = Vec::new();

        for (index, field) in fields.iter().enumerate() {
            if is_reserved_fid(&field.fid) {
                continue;
            }
            let actual_path = join_paths(&field.join_path, &base_path);

            for start in 0..actual_path.len() {
                let suffix = &actual_path[start..];
                let alias = encode_path(suffix);
                if !introduced.insert(alias.clone()) {
                    continue;
                }
                let hop = &suffix[0];
                mark_used(&mut used_datasets, &hop.from);
                mark_used(&mut used_datasets, &hop.to);
                log::debug!("🔗 {}.{} AS {} = {}.{}", hop.from, hop.fid, alias, hop.to, hop.tid);
                clauses.push(DatasetForeignKeyClause::inner(
                    ForeignKeyRef::new(&hop.from, &hop.fid, alias),
                    ForeignKeyRef::new(&hop.to, &hop.tid, encode_path(&suffix[1..])),
                ));
            }

            pending.push((index, format!("{}.{}", encode_path(&actual_path), field.fid)));
        }

        if used_datasets.len() <= 1 {
            log::debug!("All fields live in '{}', no join needed", used_datasets[0]);
            return Ok(JoinPlan::single_dataset(used_datasets));
        }

        let ordered = self.order_clauses(clauses)?;

        for (index, fid) in pending {
            transformers[index].write(fid);
        }

        Ok(JoinPlan {
            incomplete: !ordered.is_complete(),
            join_clauses: Some(ordered.clauses),
            datasets: used_datasets,
            rewriter: FidRewriter::Qualified { base_path },
        })
    }

    /// Order clauses so each one joins onto an alias already in scope.
    ///
    /// Clauses built by [`plan`](Self::plan) always form a connected set: each
    /// links `encode(suffix)` to `encode(suffix[1..])`, so every alias chains
    /// back to the base alias. A partial order is therefore only possible for
    /// clause lists assembled elsewhere.
    pub fn order_clauses(&self, clauses: Vec<DatasetForeignKeyClause>) -> Result<OrderedJoins, JoinPlanError> {
        let ordered = sort_foreign_keys(clauses);
        if !ordered.is_complete() && self.options.strict_join_order {
            return Err(JoinPlanError::UnresolvableJoinOrder {
                unresolved: ordered
                    .unresolved
                    .iter()
                    .map(|clause| clause.aliases().join(" = "))
                    .collect(),
            });
        }
        Ok(ordered)
    }

    /// Smallest serialized `[dataset, joinPath]` pair among the fields.
    fn select_base(&self, fields: &[FieldRef]) -> Result<(String, Vec<JoinPath>), JoinPlanError> {
        let mut candidates: BTreeMap<String, (&str, &[JoinPath])> = BTreeMap::new();
        for field in fields {
            let dataset = field.dataset.as_deref().unwrap_or(&self.options.default_dataset);
            let key = serde_json::to_string(&(dataset, &field.join_path))
                .map_err(|e| JoinPlanError::BaseSelection(e.to_string()))?;
            candidates.entry(key).or_insert((dataset, field.join_path.as_slice()));
        }

        candidates
            .into_values()
            .next()
            .map(|(dataset, path)| (dataset.to_string(), path.to_vec()))
            .ok_or_else(|| JoinPlanError::BaseSelection("no fields to plan".to_string()))
    }
}

/// Plan with default options.
pub fn plan_joins<T: FieldTransformer>(transformers: &mut [T]) -> Result<JoinPlan, JoinPlanError> {
    JoinPlanner::default().plan(transformers)
}

fn mark_used(used: &mut Vec<String>, dataset: &str) {
    if !used.iter().any(|d| d == dataset) {
        used.push(dataset.to_string());
    }
}
