//! Join clause ordering
//!
//! Sequential JOIN syntax needs every clause after the first to reference an
//! alias some earlier clause already brought into scope. Ordering is a greedy
//! walk over a work queue: accept a clause once one of its aliases is reached,
//! otherwise push it to the back.
//!
//! ```text
//! reached = { clauses[0].keys[0].as }
//! while queue not empty:
//!     clause = pop_front
//!     if clause touches reached: accept (known side first), reach both aliases
//!     else: push_back, stop once a full pass made no progress
//! ```

use std::collections::{HashSet, VecDeque};

use super::types::DatasetForeignKeyClause;

/// Ordered clauses plus whatever could not be connected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedJoins {
    pub clauses: Vec<DatasetForeignKeyClause>,
    /// Clauses dropped because they never share an alias with the ordered
    /// prefix. Empty for every plan built from real join paths.
    pub unresolved: Vec<DatasetForeignKeyClause>,
}

impl OrderedJoins {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

pub fn sort_foreign_keys(clauses: Vec<DatasetForeignKeyClause>) -> OrderedJoins {
    let Some(first) = clauses.first() else {
        return OrderedJoins::default();
    };

    let mut reached: HashSet<String> = HashSet::from([first.keys[0].alias.clone()]);
    let mut queue: VecDeque<DatasetForeignKeyClause> = clauses.into();
    let mut ordered = Vec::with_capacity(queue.len());
    // Requeues since the last accepted clause
    let mut stalled = 0;

    while let Some(clause) = queue.pop_front() {
        match clause.keys.iter().position(|key| reached.contains(&key.alias)) {
            Some(linked) => {
                for key in &clause.keys {
                    reached.insert(key.alias.clone());
                }
                ordered.push(clause.anchored_at(linked));
                stalled = 0;
            }
            None => {
                queue.push_back(clause);
                stalled += 1;
                if stalled >= queue.len() {
                    break;
                }
            }
        }
    }

    let unresolved: Vec<DatasetForeignKeyClause> = queue.into_iter().collect();
    if !unresolved.is_empty() {
        log::warn!(
            "⚠️ Join ordering stopped with {} unconnected clause(s): {:?}",
            unresolved.len(),
            unresolved.iter().map(|c| c.aliases()).collect::<Vec<_>>()
        );
    }

    OrderedJoins {
        clauses: ordered,
        unresolved,
    }
}
