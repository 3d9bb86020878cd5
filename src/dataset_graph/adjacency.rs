//! Dataset adjacency index
//!
//! Turns a flat field list with foreign-key declarations into a bidirectional
//! adjacency map keyed by dataset. Every declaration yields a forward edge on
//! the declaring dataset and a reverse edge on the referenced one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::join_path::JoinPath;

/// Target of a foreign-key declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    pub dataset: String,
    pub fid: String,
}

/// A field as the dataset catalog describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetField {
    pub fid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign: Option<ForeignKey>,
}

impl DatasetField {
    pub fn new(dataset: impl Into<String>, fid: impl Into<String>) -> Self {
        Self {
            fid: fid.into(),
            name: None,
            dataset: Some(dataset.into()),
            foreign: None,
        }
    }

    pub fn with_foreign(mut self, dataset: impl Into<String>, fid: impl Into<String>) -> Self {
        self.foreign = Some(ForeignKey {
            dataset: dataset.into(),
            fid: fid.into(),
        });
        self
    }
}

/// Immutable dataset graph, rebuilt per planning call.
///
/// Datasets that never take part in a foreign key have no entry at all.
/// Multiple declarations between the same pair are all kept, in declaration
/// order, which is the order breadth-first search expands them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetGraph {
    edges: HashMap<String, Vec<JoinPath>>,
}

impl DatasetGraph {
    pub fn build(fields: &[DatasetField]) -> Self {
        let mut edges: HashMap<String, Vec<JoinPath>> = HashMap::new();
        for field in fields {
            let (Some(dataset), Some(foreign)) = (&field.dataset, &field.foreign) else {
                continue;
            };
            let forward = JoinPath::new(dataset, &field.fid, &foreign.dataset, &foreign.fid);
            let reverse = forward.reversed();
            edges.entry(dataset.clone()).or_default().push(forward);
            edges.entry(foreign.dataset.clone()).or_default().push(reverse);
        }
        log::debug!(
            "Built dataset graph: {} datasets, {} directed edges",
            edges.len(),
            edges.values().map(Vec::len).sum::<usize>()
        );
        Self { edges }
    }

    /// Outgoing hops of `dataset`; empty when it has no foreign keys.
    pub fn edges_from(&self, dataset: &str) -> &[JoinPath] {
        self.edges.get(dataset).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, dataset: &str) -> bool {
        self.edges.contains_key(dataset)
    }

    /// Datasets with at least one edge, sorted for stable output.
    pub fn datasets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.edges.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of directed edges (two per declared foreign key).
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn as_map(&self) -> &HashMap<String, Vec<JoinPath>> {
        &self.edges
    }
}
