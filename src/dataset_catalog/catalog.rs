//! Dataset catalog
//!
//! The catalog lists the datasets a chart can draw from and the foreign keys
//! between them. It is loaded from YAML:
//!
//! ```yaml
//! name: shop
//! datasets:
//!   - name: orders
//!     fields:
//!       - fid: amount
//!       - fid: customer_id
//!         foreign: { dataset: customers, fid: id }
//!   - name: customers
//!     fields:
//!       - fid: id
//!       - fid: name
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset_graph::{DatasetField, DatasetGraph, ForeignKey, JoinPath};
use crate::view_fields::{ExpParameter, FieldsSet, ViewField};

use super::errors::DatasetCatalogError;

/// Catalog file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub datasets: Vec<DatasetDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDefinition {
    pub name: String,
    /// Display name shown in place of the identifier
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub fid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub foreign: Option<ForeignKey>,
}

impl CatalogConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, DatasetCatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| DatasetCatalogError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DatasetCatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| DatasetCatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Names are unique and every foreign key lands on a declared field.
    pub fn validate(&self) -> Result<(), DatasetCatalogError> {
        let mut seen_datasets = HashSet::new();
        let mut declared: HashSet<(&str, &str)> = HashSet::new();
        for dataset in &self.datasets {
            if !seen_datasets.insert(dataset.name.as_str()) {
                return Err(DatasetCatalogError::DuplicateDataset {
                    dataset: dataset.name.clone(),
                });
            }
            for field in &dataset.fields {
                if !declared.insert((dataset.name.as_str(), field.fid.as_str())) {
                    return Err(DatasetCatalogError::DuplicateField {
                        dataset: dataset.name.clone(),
                        fid: field.fid.clone(),
                    });
                }
            }
        }

        for dataset in &self.datasets {
            for field in &dataset.fields {
                let Some(foreign) = &field.foreign else {
                    continue;
                };
                if !declared.contains(&(foreign.dataset.as_str(), foreign.fid.as_str())) {
                    return Err(DatasetCatalogError::DanglingForeignKey {
                        dataset: dataset.name.clone(),
                        fid: field.fid.clone(),
                        target_dataset: foreign.dataset.clone(),
                        target_fid: foreign.fid.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Flatten into the field list the dataset graph is built from.
    pub fn to_fields(&self) -> Vec<DatasetField> {
        self.datasets
            .iter()
            .flat_map(|dataset| {
                dataset.fields.iter().map(|field| DatasetField {
                    fid: field.fid.clone(),
                    name: field.name.clone(),
                    dataset: Some(dataset.name.clone()),
                    foreign: field.foreign.clone(),
                })
            })
            .collect()
    }
}

/// Datasets plus the graph of their foreign keys.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    name: Option<String>,
    datasets: Vec<String>,
    fields: Vec<DatasetField>,
    graph: DatasetGraph,
}

impl DatasetCatalog {
    pub fn from_config(config: &CatalogConfig) -> Result<Self, DatasetCatalogError> {
        config.validate()?;
        let fields = config.to_fields();
        let catalog = Self {
            name: config.name.clone(),
            datasets: config.datasets.iter().map(|d| d.name.clone()).collect(),
            graph: DatasetGraph::build(&fields),
            fields,
        };
        log::info!(
            "Loaded dataset catalog '{}': {} datasets, {} foreign-key edges",
            catalog.name.as_deref().unwrap_or("unnamed"),
            catalog.datasets.len(),
            catalog.graph.edge_count() / 2
        );
        Ok(catalog)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, DatasetCatalogError> {
        Self::from_config(&CatalogConfig::from_yaml_file(path)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DatasetCatalogError> {
        Self::from_config(&CatalogConfig::from_yaml_str(yaml)?)
    }

    /// Catalog over a plain field list; datasets appear in first-seen order.
    pub fn from_fields(fields: Vec<DatasetField>) -> Self {
        let mut datasets: Vec<String> = Vec::new();
        for dataset in fields.iter().filter_map(|f| f.dataset.as_ref()) {
            if !datasets.contains(dataset) {
                datasets.push(dataset.clone());
            }
        }
        let graph = DatasetGraph::build(&fields);
        Self {
            name: None,
            datasets,
            fields,
            graph,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    pub fn fields(&self) -> &[DatasetField] {
        &self.fields
    }

    pub fn graph(&self) -> &DatasetGraph {
        &self.graph
    }

    pub fn contains_dataset(&self, dataset: &str) -> bool {
        self.datasets.iter().any(|d| d == dataset)
    }

    pub(crate) fn ensure_dataset(&self, dataset: &str) -> Result<(), DatasetCatalogError> {
        if self.contains_dataset(dataset) {
            Ok(())
        } else {
            Err(DatasetCatalogError::UnknownDataset {
                dataset: dataset.to_string(),
            })
        }
    }

    /// Shortest join path from `from` to `to`.
    pub fn route(&self, from: &str, to: &str) -> Result<Vec<JoinPath>, DatasetCatalogError> {
        self.ensure_dataset(from)?;
        self.ensure_dataset(to)?;
        let path = self.graph.shortest_path(from, to);
        if let Some(path) = &path {
            log::debug!("Route '{}' -> '{}': {} hop(s)", from, to, path.len());
        }
        path.ok_or_else(|| DatasetCatalogError::NoRoute {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Datasets reachable from `from`, in catalog order.
    pub fn reachable_datasets(&self, from: &str) -> Result<Vec<String>, DatasetCatalogError> {
        self.ensure_dataset(from)?;
        let reached = self.graph.reachable_from(from);
        Ok(self.datasets.iter().filter(|d| reached.contains(*d)).cloned().collect())
    }

    /// Datasets whose fields cannot be combined with fields of `base`.
    pub fn unreached_datasets(&self, base: &str) -> Result<Vec<String>, DatasetCatalogError> {
        self.ensure_dataset(base)?;
        let reached = self.graph.reachable_from(base);
        Ok(self.datasets.iter().filter(|d| !reached.contains(*d)).cloned().collect())
    }

    /// Fill in the join path of every field that names a dataset other than
    /// `base` and carries no path yet. Fields that already have a path, or
    /// no dataset, are left alone.
    pub fn resolve_join_paths(&self, fields: &mut FieldsSet, base: &str) -> Result<(), DatasetCatalogError> {
        self.ensure_dataset(base)?;
        for slot in fields.views.values_mut().flatten() {
            for field in slot.fields_mut() {
                self.resolve_field(field, base)?;
            }
        }
        for filter in fields.filters.iter_mut() {
            self.resolve_field(filter, base)?;
        }
        Ok(())
    }

    fn resolve_field(&self, field: &mut ViewField, base: &str) -> Result<(), DatasetCatalogError> {
        if let Some(path) = self.missing_path(field.dataset.as_deref(), &field.join_path, base)? {
            log::debug!("Routed '{}' through {} hop(s) to '{}'", field.fid, path.len(), base);
            field.join_path = path;
        }

        let Some(expression) = field.expression.as_mut() else {
            return Ok(());
        };
        for param in expression.params.iter_mut() {
            let ExpParameter::NewMap(map) = param else {
                continue;
            };
            for dimension in map.facets.iter_mut().flat_map(|f| f.dimensions.iter_mut()) {
                if let Some(path) = self.missing_path(dimension.dataset.as_deref(), &dimension.join_path, base)? {
                    dimension.join_path = path;
                }
            }
        }
        Ok(())
    }

    fn missing_path(
        &self,
        dataset: Option<&str>,
        current: &[JoinPath],
        base: &str,
    ) -> Result<Option<Vec<JoinPath>>, DatasetCatalogError> {
        match dataset {
            Some(dataset) if dataset != base && current.is_empty() => self.route(dataset, base).map(Some),
            _ => Ok(None),
        }
    }
}
