#![allow(dead_code)]

use std::collections::BTreeSet;

pub use cellgraph_test_utils::init_tracing;

pub fn set(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}
