//! View Fields
//!
//! The chart-side field model (channels, filters, computed expressions) and
//! its bridge into the join planner. Planning a view collects one
//! [`FieldSlot`](crate::join_planner::FieldSlot) per stored field id,
//! including the ids buried inside computed-field expressions, so those
//! dependencies join exactly like fields placed on the chart.

mod transform;
pub mod types;

pub use transform::{collect_field_slots, transform_multi_dataset_fields, MultiDatasetFields};
pub use types::{
    ExpParameter, Expression, ExpressionOp, FieldsSet, PaintDimension, PaintMap, PaintMapFacet, ViewField, ViewSlot,
};
