use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dataset_graph::JoinPath;

/// A field placed on a chart channel or used as a filter.
///
/// Only the members the join planner touches are typed; everything else the
/// chart layer stores on a field is carried through `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewField {
    pub fid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub join_path: Vec<JoinPath>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub computed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewField {
    pub fn new(fid: impl Into<String>) -> Self {
        Self {
            fid: fid.into(),
            dataset: None,
            join_path: Vec::new(),
            computed: false,
            expression: None,
            extra: Map::new(),
        }
    }

    pub fn in_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn with_path(mut self, join_path: Vec<JoinPath>) -> Self {
        self.join_path = join_path;
        self
    }

    pub fn computed_as(mut self, expression: Expression) -> Self {
        self.computed = true;
        self.expression = Some(expression);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionOp {
    Bin,
    Log2,
    Log10,
    One,
    BinCount,
    DateTimeDrill,
    DateTimeFeature,
    Log,
    Paint,
    /// Free-form expression, resolved by the expression processor downstream.
    Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub op: ExpressionOp,
    #[serde(default)]
    pub params: Vec<ExpParameter>,
    #[serde(rename = "as")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<f64>,
}

impl Expression {
    pub fn new(op: ExpressionOp, alias: impl Into<String>, params: Vec<ExpParameter>) -> Self {
        Self {
            op,
            params,
            alias: alias.into(),
            num: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ExpParameter {
    /// Reference to another field by id.
    Field(String),
    Value(Value),
    Expression(Box<Expression>),
    Constant(Value),
    Format(String),
    Offset(f64),
    Map(Value),
    Sql(String),
    #[serde(rename = "newmap")]
    NewMap(PaintMap),
    DisplayOffset(f64),
}

/// Painted selection map; each facet lists the dimensions it was painted over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintMap {
    pub facets: Vec<PaintMapFacet>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintMapFacet {
    pub dimensions: Vec<PaintDimension>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A painted dimension is a field in its own right, with its own dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintDimension {
    pub fid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub join_path: Vec<JoinPath>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A channel holds either one field or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewSlot {
    One(ViewField),
    Many(Vec<ViewField>),
}

impl ViewSlot {
    pub fn fields_mut(&mut self) -> std::slice::IterMut<'_, ViewField> {
        match self {
            ViewSlot::One(field) => std::slice::from_mut(field).iter_mut(),
            ViewSlot::Many(fields) => fields.iter_mut(),
        }
    }

    pub fn fields(&self) -> std::slice::Iter<'_, ViewField> {
        match self {
            ViewSlot::One(field) => std::slice::from_ref(field).iter(),
            ViewSlot::Many(fields) => fields.iter(),
        }
    }
}

/// All fields of one chart: its encoding channels and its filters.
///
/// Channels keep their document order; planning visits them in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldsSet {
    #[serde(default)]
    pub views: IndexMap<String, Option<ViewSlot>>,
    #[serde(default)]
    pub filters: Vec<ViewField>,
}

impl FieldsSet {
    /// Every view field then every filter, in planning order.
    pub fn iter_fields(&self) -> impl Iterator<Item = &ViewField> {
        self.views
            .values()
            .flatten()
            .flat_map(ViewSlot::fields)
            .chain(self.filters.iter())
    }
}
