// src/namespace/mod.rs

//! The shared mutable namespace and the instrumentation around it.
//!
//! - [`store`] is the plain name → value map. Values are generic and
//!   never inspected.
//! - [`tracker`] wraps a store and records read/write effects during a
//!   bounded, non-nesting monitored region.

pub mod store;
pub mod tracker;

pub use store::Namespace;
pub use tracker::{EffectTracker, RegionReport, is_hidden_symbol};
