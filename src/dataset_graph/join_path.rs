//! Join path primitives
//!
//! A [`JoinPath`] is one directed foreign-key hop: field `fid` of dataset `from`
//! joins field `tid` of dataset `to`. A path is an ordered slice of hops where
//! each hop's `to` is the next hop's `from`.
//!
//! ```text
//! orders.customer_id -> customers.id -> regions.id
//! [ {orders, customer_id, customers, id}, {customers, region_id, regions, id} ]
//! ```

use serde::{Deserialize, Serialize};

/// One directed hop between two datasets.
///
/// Field order matters: it is the order serde emits keys in, and the planner
/// compares serialized paths when picking a base dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinPath {
    pub from: String,
    pub fid: String,
    pub to: String,
    pub tid: String,
}

impl JoinPath {
    pub fn new(
        from: impl Into<String>,
        fid: impl Into<String>,
        to: impl Into<String>,
        tid: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            fid: fid.into(),
            to: to.into(),
            tid: tid.into(),
        }
    }

    /// The same hop walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            fid: self.tid.clone(),
            to: self.from.clone(),
            tid: self.fid.clone(),
        }
    }

    /// True when `other` walks exactly this hop backwards.
    pub fn is_inverse_of(&self, other: &JoinPath) -> bool {
        self.from == other.to && self.fid == other.tid && self.to == other.from && self.tid == other.fid
    }

    /// `from_fid_to_tid`, the per-hop text that aliases are hashed from.
    pub fn signature(&self) -> String {
        format!("{}_{}_{}_{}", self.from, self.fid, self.to, self.tid)
    }
}

/// Cancel adjacent back-and-forth hops.
///
/// Scans left to right; whenever the last kept hop is the inverse of the next
/// one, both are dropped. The result never contains a redundant round trip.
pub fn merge_paths(path: &[JoinPath]) -> Vec<JoinPath> {
    let mut result: Vec<JoinPath> = Vec::with_capacity(path.len());
    for hop in path {
        if result.last().is_some_and(|last| last.is_inverse_of(hop)) {
            result.pop();
            continue;
        }
        result.push(hop.clone());
    }
    result
}

/// Express "path back to X" as "path from X": reverse the hop order and flip
/// every hop.
pub fn reverse_paths(path: &[JoinPath]) -> Vec<JoinPath> {
    path.iter().rev().map(JoinPath::reversed).collect()
}

/// Concatenate two paths and cancel the round trips at the seam.
pub fn join_paths(head: &[JoinPath], tail: &[JoinPath]) -> Vec<JoinPath> {
    let mut combined = Vec::with_capacity(head.len() + tail.len());
    combined.extend_from_slice(head);
    combined.extend_from_slice(tail);
    merge_paths(&combined)
}

/// Every hop ends where the next one starts.
pub fn is_contiguous(path: &[JoinPath]) -> bool {
    path.windows(2).all(|pair| pair[0].to == pair[1].from)
}
