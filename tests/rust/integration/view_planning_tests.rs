// Integration tests for planning whole chart views
use joinplan::{
    dataset_graph::JoinPath,
    join_planner::{JoinPlanner, PlannerOptions, BASE_DATASET_ALIAS, DEFAULT_DATASET},
    view_fields::{transform_multi_dataset_fields, FieldsSet, ViewField},
};
use serde_json::json;

const ORDERS_ALIAS: &str = "24ihmn0mjfg";
const REGIONS_ALIAS: &str = "245dvrdnucs";

fn customers_to_orders() -> JoinPath {
    JoinPath::new("customers", "id", "orders", "customer_id")
}

fn regions_to_customers() -> JoinPath {
    JoinPath::new("regions", "id", "customers", "region_id")
}

fn parse_view(value: serde_json::Value) -> FieldsSet {
    serde_json::from_value(value).unwrap()
}

fn fids(fields: &FieldsSet) -> Vec<String> {
    fields.iter_fields().map(|f| f.fid.clone()).collect()
}

#[test]
fn test_two_dataset_view_from_json() {
    let view = parse_view(json!({
        "views": {
            "columns": { "fid": "name", "dataset": "customers", "analyticType": "dimension",
                         "joinPath": [ { "from": "customers", "fid": "id", "to": "orders", "tid": "customer_id" } ] },
            "rows": [ { "fid": "amount", "dataset": "orders", "analyticType": "measure" } ]
        },
        "filters": []
    }));

    let result = transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap();

    // channels keep document order: columns, rows
    assert_eq!(
        fids(&result.fields),
        vec![format!("{}.name", BASE_DATASET_ALIAS), format!("{}.amount", ORDERS_ALIAS)]
    );
    assert_eq!(result.plan.datasets, vec!["customers", "orders"]);

    let output = serde_json::to_value(&result).unwrap();
    let clauses = output["plan"]["joinClauses"].as_array().unwrap();
    assert_eq!(clauses.len(), 1);
    assert_eq!(clauses[0]["type"], "inner");
    assert_eq!(clauses[0]["keys"][0]["as"], ORDERS_ALIAS);
    assert_eq!(clauses[0]["keys"][1]["as"], BASE_DATASET_ALIAS);
    // unknown members survive the round trip
    assert_eq!(output["fields"]["views"]["rows"][0]["analyticType"], "measure");

    // the input view is untouched
    assert_eq!(fids(&view), vec!["name", "amount"]);
}

#[test]
fn test_single_dataset_view_is_not_joined() {
    let view = parse_view(json!({
        "views": {
            "rows": [ { "fid": "amount", "dataset": "orders" }, { "fid": "qty", "dataset": "orders" } ]
        }
    }));

    let result = transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap();
    assert!(result.plan.join_clauses.is_none());
    assert_eq!(result.plan.datasets, vec!["orders"]);
    assert_eq!(fids(&result.fields), vec!["amount", "qty"]);

    let output = serde_json::to_value(&result.plan).unwrap();
    assert!(output["joinClauses"].is_null());
}

#[test]
fn test_empty_view_uses_default_dataset() {
    let result = transform_multi_dataset_fields(&FieldsSet::default(), &JoinPlanner::default()).unwrap();
    assert!(result.plan.join_clauses.is_none());
    assert_eq!(result.plan.datasets, vec![DEFAULT_DATASET]);
}

#[test]
fn test_three_dataset_chain() {
    let mut view = FieldsSet::default();
    view.filters = vec![
        ViewField::new("amount").in_dataset("orders"),
        ViewField::new("name").in_dataset("customers").with_path(vec![customers_to_orders()]),
        ViewField::new("label")
            .in_dataset("regions")
            .with_path(vec![regions_to_customers(), customers_to_orders()]),
    ];

    let result = transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap();
    let clauses = result.plan.join_clauses.clone().unwrap();

    assert_eq!(clauses.len(), 2);
    assert_eq!(result.plan.datasets, vec!["customers", "orders", "regions"]);
    assert_eq!(
        fids(&result.fields),
        vec![
            format!("{}.amount", ORDERS_ALIAS),
            format!("{}.name", BASE_DATASET_ALIAS),
            format!("{}.label", REGIONS_ALIAS),
        ]
    );

    // the second clause hangs off the base alias introduced by the first
    assert_eq!(clauses[1].keys[0].alias, BASE_DATASET_ALIAS);
    assert_eq!(clauses[1].keys[0].field, "region_id");
    assert_eq!(clauses[1].keys[1].alias, REGIONS_ALIAS);
}

#[test]
fn test_field_order_does_not_change_plan() {
    let forward = vec![
        ViewField::new("amount").in_dataset("orders"),
        ViewField::new("label")
            .in_dataset("regions")
            .with_path(vec![regions_to_customers(), customers_to_orders()]),
    ];
    let mut backward = forward.clone();
    backward.reverse();

    let plan_for = |filters: Vec<ViewField>| {
        let view = FieldsSet {
            filters,
            ..Default::default()
        };
        transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap()
    };
    let a = plan_for(forward);
    let b = plan_for(backward);

    let mut a_fids = fids(&a.fields);
    let mut b_fids = fids(&b.fields);
    a_fids.sort();
    b_fids.sort();
    assert_eq!(a_fids, b_fids);
    assert_eq!(a.plan.rewriter, b.plan.rewriter);
}

#[test]
fn test_computed_field_operands_are_joined() {
    let view = parse_view(json!({
        "views": {
            "rows": [ {
                "fid": "amount_bin",
                "dataset": "orders",
                "computed": true,
                "expression": {
                    "op": "bin",
                    "as": "amount_bin",
                    "params": [ { "type": "field", "value": "amount" }, { "type": "value", "value": 10 } ],
                    "num": 10.0
                }
            } ],
            "columns": [ { "fid": "name", "dataset": "customers",
                           "joinPath": [ { "from": "customers", "fid": "id", "to": "orders", "tid": "customer_id" } ] } ]
        }
    }));

    let result = transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap();
    let output = serde_json::to_value(&result.fields).unwrap();
    let binned = &output["views"]["rows"][0];

    assert_eq!(binned["fid"], format!("{}.amount_bin", ORDERS_ALIAS));
    assert_eq!(binned["expression"]["as"], format!("{}.amount_bin", ORDERS_ALIAS));
    assert_eq!(binned["expression"]["params"][0]["value"], format!("{}.amount", ORDERS_ALIAS));
    assert_eq!(binned["expression"]["params"][1]["value"], 10);
}

#[test]
fn test_paint_dimensions_join_their_own_dataset() {
    let view = parse_view(json!({
        "views": {
            "color": {
                "fid": "gw_paint_fid",
                "dataset": "orders",
                "computed": true,
                "expression": {
                    "op": "paint",
                    "as": "gw_paint_fid",
                    "params": [ {
                        "type": "newmap",
                        "value": {
                            "facets": [ {
                                "dimensions": [
                                    { "fid": "amount", "dataset": "orders" },
                                    { "fid": "name", "dataset": "customers",
                                      "joinPath": [ { "from": "customers", "fid": "id", "to": "orders", "tid": "customer_id" } ] }
                                ],
                                "map": "AAAA"
                            } ],
                            "dict": {}
                        }
                    } ]
                }
            }
        }
    }));

    let result = transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap();
    assert!(result.plan.is_joined());

    let output = serde_json::to_value(&result.fields).unwrap();
    let color = &output["views"]["color"];
    // the paint pseudo field itself is never qualified
    assert_eq!(color["fid"], "gw_paint_fid");
    assert_eq!(color["expression"]["as"], "gw_paint_fid");

    let facet = &color["expression"]["params"][0]["value"]["facets"][0];
    assert_eq!(facet["dimensions"][0]["fid"], format!("{}.amount", ORDERS_ALIAS));
    assert_eq!(facet["dimensions"][1]["fid"], format!("{}.name", BASE_DATASET_ALIAS));
    assert_eq!(facet["map"], "AAAA");
}

#[test]
fn test_custom_default_dataset() {
    let planner = JoinPlanner::new(PlannerOptions {
        default_dataset: "events".to_string(),
        ..Default::default()
    });
    let view = FieldsSet {
        filters: vec![ViewField::new("ts")],
        ..Default::default()
    };
    let result = transform_multi_dataset_fields(&view, &planner).unwrap();
    assert_eq!(result.plan.datasets, vec!["events"]);
}

#[test]
fn test_channels_are_planned_in_document_order() {
    // keys deliberately out of alphabetical order
    let view = parse_view(json!({
        "views": {
            "rows": [ { "fid": "label", "dataset": "regions",
                        "joinPath": [ { "from": "regions", "fid": "id", "to": "customers", "tid": "region_id" },
                                      { "from": "customers", "fid": "id", "to": "orders", "tid": "customer_id" } ] } ],
            "columns": [ { "fid": "title", "dataset": "products",
                           "joinPath": [ { "from": "products", "fid": "id", "to": "orders", "tid": "product_id" } ] } ],
            "color": { "fid": "amount", "dataset": "orders" }
        }
    }));
    assert_eq!(view.views.keys().collect::<Vec<_>>(), vec!["rows", "columns", "color"]);

    let result = transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap();

    assert_eq!(result.plan.datasets, vec!["orders", "regions", "customers", "products"]);
    let clauses = result.plan.join_clauses.clone().unwrap();
    assert_eq!(clauses.len(), 3);
    assert_eq!(clauses[0].keys[0].dataset, "regions");
    assert_eq!(clauses[2].keys[1].dataset, "products");

    let planned: Vec<String> = fids(&result.fields)
        .iter()
        .filter_map(|fid| fid.split('.').nth(1).map(str::to_string))
        .collect();
    assert_eq!(planned, vec!["label", "title", "amount"]);

    let output = serde_json::to_string(&result.fields).unwrap();
    let rows_at = output.find("\"rows\"").unwrap();
    let color_at = output.find("\"color\"").unwrap();
    assert!(rows_at < color_at);
}
