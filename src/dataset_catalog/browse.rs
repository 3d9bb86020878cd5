//! Join tree for browsing the fields reachable from a base dataset.
//!
//! Each node is a dataset together with the path that leads from it back to
//! the base, and the alias that path encodes to. A branch never takes the
//! same outgoing hop twice, a child never walks straight back over any hop
//! its parent offered, and a branch never enters a dataset it already passed
//! through. Densely linked catalogs still fan out quickly, so the tree is also
//! capped by depth and by a total node budget.

use std::cell::Cell;
use std::collections::HashSet;

use serde::Serialize;

use crate::dataset_graph::{merge_paths, JoinPath};
use crate::join_planner::encode_path;

use super::catalog::DatasetCatalog;
use super::errors::DatasetCatalogError;

/// Node budget used by [`DatasetCatalog::browse_tree`].
pub const DEFAULT_MAX_BROWSE_NODES: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTreeNode {
    pub dataset: String,
    /// Path from this dataset back to the base
    pub join_path: Vec<JoinPath>,
    pub alias: String,
    pub children: Vec<JoinTreeBranch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinTreeBranch {
    pub hop: JoinPath,
    pub node: JoinTreeNode,
}

impl JoinTreeNode {
    /// Nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node.node_count()).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        self.children.iter().map(|c| c.node.depth() + 1).max().unwrap_or(0)
    }

    /// Pre-order walk.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a JoinTreeNode)) {
        visit(self);
        for child in &self.children {
            child.node.walk(visit);
        }
    }

    /// Whether `dataset` is this node or lies on its path back to the base.
    fn on_branch(&self, dataset: &str) -> bool {
        self.dataset == dataset || self.join_path.iter().any(|hop| hop.to == dataset)
    }
}

struct BrowseState<'a> {
    catalog: &'a DatasetCatalog,
    base: &'a str,
    available: HashSet<String>,
    max_nodes: usize,
    built: Cell<usize>,
}

impl DatasetCatalog {
    pub fn browse_tree(&self, base: &str, max_depth: u32) -> Result<JoinTreeNode, DatasetCatalogError> {
        self.browse_tree_within(base, max_depth, DEFAULT_MAX_BROWSE_NODES)
    }

    /// Like [`browse_tree`](Self::browse_tree), failing with
    /// `BrowseTreeTooLarge` once more than `max_nodes` nodes would be built.
    pub fn browse_tree_within(
        &self,
        base: &str,
        max_depth: u32,
        max_nodes: usize,
    ) -> Result<JoinTreeNode, DatasetCatalogError> {
        self.ensure_dataset(base)?;
        let state = BrowseState {
            catalog: self,
            base,
            available: self.datasets().iter().cloned().collect(),
            max_nodes,
            built: Cell::new(0),
        };
        let tree = state.expand(base, Vec::new(), &[], &[], max_depth)?;
        log::debug!(
            "Browse tree for '{}': {} node(s), depth {}",
            base,
            tree.node_count(),
            tree.depth()
        );
        Ok(tree)
    }
}

impl BrowseState<'_> {
    fn expand(
        &self,
        dataset: &str,
        join_path: Vec<JoinPath>,
        banned: &[JoinPath],
        temp_banned: &[JoinPath],
        depth_left: u32,
    ) -> Result<JoinTreeNode, DatasetCatalogError> {
        let built = self.built.get() + 1;
        if built > self.max_nodes {
            log::warn!("⚠️ Browse tree for '{}' exceeds {} nodes", self.base, self.max_nodes);
            return Err(DatasetCatalogError::BrowseTreeTooLarge {
                base: self.base.to_string(),
                limit: self.max_nodes,
            });
        }
        self.built.set(built);

        let alias = encode_path(&merge_paths(&join_path));
        let mut node = JoinTreeNode {
            dataset: dataset.to_string(),
            join_path,
            alias,
            children: Vec::new(),
        };
        if depth_left == 0 {
            return Ok(node);
        }

        let blocked: Vec<JoinPath> = banned.iter().chain(temp_banned).cloned().collect();
        let hops: Vec<JoinPath> = self
            .catalog
            .graph()
            .next_hops(dataset, &blocked, &self.available)
            .into_iter()
            .filter(|hop| !node.on_branch(&hop.to))
            .collect();
        let back_hops: Vec<JoinPath> = hops.iter().map(JoinPath::reversed).collect();

        for hop in hops {
            let mut child_path = Vec::with_capacity(node.join_path.len() + 1);
            child_path.push(hop.reversed());
            child_path.extend(node.join_path.iter().cloned());

            let mut child_banned = banned.to_vec();
            child_banned.push(hop.clone());

            let child = self.expand(&hop.to, child_path, &child_banned, &back_hops, depth_left - 1)?;
            node.children.push(JoinTreeBranch { hop, node: child });
        }
        Ok(node)
    }
}
