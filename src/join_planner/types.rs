use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
}

/// One side of a join clause: column `field` of `dataset`, addressed as `alias`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub dataset: String,
    pub field: String,
    #[serde(rename = "as")]
    pub alias: String,
}

impl ForeignKeyRef {
    pub fn new(dataset: impl Into<String>, field: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            field: field.into(),
            alias: alias.into(),
        }
    }
}

/// `INNER JOIN keys[1].dataset AS keys[1].alias ON keys[0].alias.field = keys[1].alias.field`
///
/// After ordering, `keys[0]` is always the side whose alias is already in scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetForeignKeyClause {
    #[serde(rename = "type", default)]
    pub join_type: JoinType,
    pub keys: [ForeignKeyRef; 2],
}

impl DatasetForeignKeyClause {
    pub fn inner(left: ForeignKeyRef, right: ForeignKeyRef) -> Self {
        Self {
            join_type: JoinType::Inner,
            keys: [left, right],
        }
    }

    pub fn aliases(&self) -> [&str; 2] {
        [self.keys[0].alias.as_str(), self.keys[1].alias.as_str()]
    }

    pub fn references(&self, alias: &str) -> bool {
        self.keys.iter().any(|key| key.alias == alias)
    }

    /// Put the key at `index` first.
    pub(crate) fn anchored_at(mut self, index: usize) -> Self {
        if index == 1 {
            self.keys.swap(0, 1);
        }
        self
    }
}
