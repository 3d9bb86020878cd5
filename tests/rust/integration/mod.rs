//! Integration tests - whole views planned end to end, with and without a
//! dataset catalog loaded from YAML.

mod catalog_tests;
mod view_planning_tests;
