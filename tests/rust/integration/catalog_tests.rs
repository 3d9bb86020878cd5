// Integration tests for catalog-driven routing and planning
use std::io::Write;

use joinplan::{
    config::PlannerConfig,
    dataset_catalog::{DatasetCatalog, DatasetCatalogError},
    dataset_graph::is_contiguous,
    join_planner::{JoinPlanner, BASE_DATASET_ALIAS},
    view_fields::{transform_multi_dataset_fields, FieldsSet, ViewField, ViewSlot},
};
use tempfile::NamedTempFile;

const SHOP_CATALOG: &str = r#"
name: shop
datasets:
  - name: orders
    label: Orders
    fields:
      - fid: amount
        name: Amount
      - fid: customer_id
        foreign: { dataset: customers, fid: id }
      - fid: product_id
        foreign: { dataset: products, fid: id }
  - name: customers
    fields:
      - fid: id
      - fid: name
      - fid: region_id
        foreign: { dataset: regions, fid: id }
  - name: regions
    fields:
      - fid: id
      - fid: label
  - name: products
    fields:
      - fid: id
      - fid: title
  - name: audit_log
    fields:
      - fid: entry
"#;

fn write_catalog(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn shop() -> DatasetCatalog {
    let file = write_catalog(SHOP_CATALOG);
    DatasetCatalog::from_yaml_file(file.path()).unwrap()
}

#[test]
fn test_load_from_file() {
    let catalog = shop();
    assert_eq!(catalog.name(), Some("shop"));
    assert_eq!(
        catalog.datasets(),
        &["orders", "customers", "regions", "products", "audit_log"]
    );
    assert_eq!(catalog.fields().len(), 11);
    assert_eq!(catalog.graph().edge_count(), 6);
}

#[test]
fn test_missing_file() {
    let result = DatasetCatalog::from_yaml_file("/nonexistent/catalog.yaml");
    assert!(matches!(result, Err(DatasetCatalogError::ConfigReadError { .. })));
}

#[test]
fn test_routes_are_contiguous_and_shortest() {
    let catalog = shop();
    let path = catalog.route("regions", "products").unwrap();
    assert!(is_contiguous(&path));
    assert_eq!(path.len(), 3);
    assert_eq!(path.first().map(|hop| hop.from.as_str()), Some("regions"));
    assert_eq!(path.last().map(|hop| hop.to.as_str()), Some("products"));

    assert!(catalog.route("orders", "orders").unwrap().is_empty());
}

#[test]
fn test_disconnected_dataset() {
    let catalog = shop();
    let err = catalog.route("audit_log", "orders").unwrap_err();
    assert!(err.to_string().contains("cannot share a query"));
    assert_eq!(catalog.unreached_datasets("orders").unwrap(), vec!["audit_log"]);
    assert_eq!(catalog.reachable_datasets("audit_log").unwrap(), vec!["audit_log"]);
}

#[test]
fn test_routed_view_plans_one_join_per_dataset() {
    let catalog = shop();
    let mut view = FieldsSet::default();
    view.views.insert(
        "rows".to_string(),
        Some(ViewSlot::Many(vec![
            ViewField::new("amount").in_dataset("orders"),
            ViewField::new("name").in_dataset("customers"),
            ViewField::new("label").in_dataset("regions"),
            ViewField::new("title").in_dataset("products"),
        ])),
    );
    view.views.insert("color".to_string(), None);

    catalog.resolve_join_paths(&mut view, "orders").unwrap();
    let result = transform_multi_dataset_fields(&view, &JoinPlanner::default()).unwrap();

    let clauses = result.plan.join_clauses.clone().unwrap();
    assert_eq!(clauses.len(), 3);
    assert!(!result.plan.incomplete);
    assert_eq!(result.plan.datasets.len(), 4);

    let rewritten: Vec<&ViewField> = result.fields.iter_fields().collect();
    assert_eq!(rewritten.len(), 4);
    // every field now lives under exactly one alias
    for field in &rewritten {
        assert_eq!(field.fid.matches('.').count(), 1, "{}", field.fid);
    }
    let aliases: std::collections::HashSet<&str> =
        rewritten.iter().filter_map(|f| f.fid.split('.').next()).collect();
    assert_eq!(aliases.len(), 4);
}

#[test]
fn test_routing_to_unreachable_base() {
    let catalog = shop();
    let mut view = FieldsSet {
        filters: vec![ViewField::new("amount").in_dataset("orders")],
        ..Default::default()
    };
    assert_eq!(
        catalog.resolve_join_paths(&mut view, "audit_log"),
        Err(DatasetCatalogError::NoRoute {
            from: "orders".to_string(),
            to: "audit_log".to_string(),
        })
    );
}

#[test]
fn test_browse_tree_from_file_catalog() {
    let catalog = shop();
    let config = PlannerConfig::default();
    let tree = catalog.browse_tree("orders", config.max_browse_depth).unwrap();

    assert_eq!(tree.alias, BASE_DATASET_ALIAS);
    let children: Vec<&str> = tree.children.iter().map(|c| c.node.dataset.as_str()).collect();
    assert_eq!(children, vec!["customers", "products"]);
    assert!(tree.node_count() >= 4);

    let output = serde_json::to_value(&tree).unwrap();
    assert!(output["children"][0]["node"]["joinPath"].is_array());
    assert!(output["children"][0]["hop"]["fid"].is_string());
}
