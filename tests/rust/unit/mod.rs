//! Unit tests for the public building blocks: path algebra, alias encoding
//! and join-clause ordering.

mod alias_tests;
mod ordering_tests;
