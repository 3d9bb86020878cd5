use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum JoinPlanError {
    #[error("Could not select a base dataset: {0}")]
    BaseSelection(String),

    #[error("Join clauses cannot be ordered, {} clause(s) never connect to the base: {}", .unresolved.len(), .unresolved.join(", "))]
    UnresolvableJoinOrder { unresolved: Vec<String> },
}
