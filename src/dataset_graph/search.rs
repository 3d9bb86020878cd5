//! Breadth-first search over the dataset graph.

use std::collections::{HashSet, VecDeque};

use super::adjacency::DatasetGraph;
use super::join_path::JoinPath;

impl DatasetGraph {
    /// Shortest hop sequence from `from` to `to`, or `None` when no route exists.
    ///
    /// Each dataset is visited once; the first time a dataset is reached is
    /// the shortest way there. Among equal-length routes the edge declared
    /// first wins, but callers should not depend on which duplicate is taken.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<JoinPath>> {
        let mut queue: VecDeque<(&str, Vec<JoinPath>)> = VecDeque::new();
        let mut visited: HashSet<&str> = HashSet::new();
        queue.push_back((from, Vec::new()));
        visited.insert(from);

        while let Some((current, path)) = queue.pop_front() {
            if current == to {
                return Some(path);
            }
            for edge in self.edges_from(current) {
                if visited.insert(edge.to.as_str()) {
                    let mut next = path.clone();
                    next.push(edge.clone());
                    queue.push_back((edge.to.as_str(), next));
                }
            }
        }

        log::debug!("No route from '{}' to '{}'", from, to);
        None
    }

    /// Every dataset reachable from `from` in zero or more hops.
    pub fn reachable_from(&self, from: &str) -> HashSet<String> {
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut visited: HashSet<&str> = HashSet::new();
        queue.push_back(from);
        visited.insert(from);

        while let Some(current) = queue.pop_front() {
            for edge in self.edges_from(current) {
                if visited.insert(edge.to.as_str()) {
                    queue.push_back(edge.to.as_str());
                }
            }
        }

        visited.into_iter().map(str::to_string).collect()
    }

    /// Hops that can extend a browse path at `dataset`.
    ///
    /// Hops listed in `banned` (only those leaving `dataset` count) are
    /// skipped, at most one hop per source field is kept, and the target must
    /// be one of `available`.
    pub fn next_hops(
        &self,
        dataset: &str,
        banned: &[JoinPath],
        available: &HashSet<String>,
    ) -> Vec<JoinPath> {
        let banned: HashSet<(&str, &str, &str)> = banned
            .iter()
            .filter(|hop| hop.from == dataset)
            .map(|hop| (hop.fid.as_str(), hop.to.as_str(), hop.tid.as_str()))
            .collect();
        let mut seen_fids: HashSet<&str> = HashSet::new();

        self.edges_from(dataset)
            .iter()
            .filter(|edge| !banned.contains(&(edge.fid.as_str(), edge.to.as_str(), edge.tid.as_str())))
            .filter(|edge| seen_fids.insert(edge.fid.as_str()))
            .filter(|edge| available.contains(&edge.to))
            .cloned()
            .collect()
    }
}
