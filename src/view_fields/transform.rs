//! Field slot collection for whole chart views.
//!
//! Every place a field id lives in a view becomes one [`FieldSlot`]:
//!
//! - the field itself
//! - for computed fields, the expression output id, and the operands:
//!   - `expr`: none (the expression processor resolves them later)
//!   - `paint`: every dimension of every painted facet, each with its own dataset
//!   - anything else: every `field` parameter, in the computed field's dataset
//!
//! Computed slots are collected before the owning field's slot.

use serde::Serialize;

use crate::dataset_graph::JoinPath;
use crate::join_planner::{FieldSlot, JoinPlan, JoinPlanError, JoinPlanner};

use super::types::{ExpParameter, Expression, ExpressionOp, FieldsSet, PaintDimension, ViewField};

/// A view after planning: field ids rewritten when the plan joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiDatasetFields {
    pub fields: FieldsSet,
    pub plan: JoinPlan,
}

/// Slots for one field and, when computed, its expression.
pub fn collect_field_slots<'a>(field: &'a mut ViewField, slots: &mut Vec<FieldSlot<'a>>) {
    let ViewField {
        fid,
        dataset,
        join_path,
        computed,
        expression,
        ..
    } = field;
    let dataset: &'a Option<String> = dataset;
    let join_path: &'a Vec<JoinPath> = join_path;

    if *computed {
        if let Some(expression) = expression.as_mut() {
            collect_computed_slots(expression, dataset.as_deref(), join_path, slots);
        }
    }
    slots.push(FieldSlot::new(fid, dataset.as_deref(), join_path));
}

fn collect_computed_slots<'a>(
    expression: &'a mut Expression,
    dataset: Option<&'a str>,
    join_path: &'a [JoinPath],
    slots: &mut Vec<FieldSlot<'a>>,
) {
    let Expression { op, params, alias, .. } = expression;
    slots.push(FieldSlot::new(alias, dataset, join_path));

    match op {
        ExpressionOp::Expr => {}
        ExpressionOp::Paint => {
            for param in params.iter_mut() {
                let ExpParameter::NewMap(map) = param else {
                    continue;
                };
                for facet in map.facets.iter_mut() {
                    for dimension in facet.dimensions.iter_mut() {
                        push_dimension_slot(dimension, slots);
                    }
                }
            }
        }
        _ => {
            for param in params.iter_mut() {
                if let ExpParameter::Field(value) = param {
                    slots.push(FieldSlot::new(value, dataset, join_path));
                }
            }
        }
    }
}

fn push_dimension_slot<'a>(dimension: &'a mut PaintDimension, slots: &mut Vec<FieldSlot<'a>>) {
    let PaintDimension {
        fid,
        dataset,
        join_path,
        ..
    } = dimension;
    let dataset: &'a Option<String> = dataset;
    slots.push(FieldSlot::new(fid, dataset.as_deref(), join_path));
}

/// Plan a whole view and return a rewritten copy; `fields` is left as is.
pub fn transform_multi_dataset_fields(
    fields: &FieldsSet,
    planner: &JoinPlanner,
) -> Result<MultiDatasetFields, JoinPlanError> {
    let mut transformed = fields.clone();
    let plan = {
        let mut slots: Vec<FieldSlot<'_>> = Vec::new();
        let FieldsSet { views, filters } = &mut transformed;
        for slot in views.values_mut().flatten() {
            for field in slot.fields_mut() {
                collect_field_slots(field, &mut slots);
            }
        }
        for filter in filters.iter_mut() {
            collect_field_slots(filter, &mut slots);
        }
        log::debug!("Planning view with {} field slot(s)", slots.len());
        planner.plan(&mut slots)?
    };

    Ok(MultiDatasetFields {
        fields: transformed,
        plan,
    })
}
