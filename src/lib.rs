//! Comparison dashboard for cluster-level routing exports (RBM 2.0 vs 1.0).
//!
//! The data pipeline under [`data`] is a pure function of the ingested
//! records and the current filter configuration; the egui layer in [`ui`]
//! and [`app`] only renders it and owns the mutable selection state.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
