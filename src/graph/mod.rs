//! Module dependency graph for PyCycle.
//!
//! Provides the symbol registry, the graph itself, cycle detection,
//! and directory scanning/building for the graph.

pub mod builder;
pub mod cycles;
pub mod engine;
pub mod registry;
pub mod types;

pub use builder::{build_graph, ingest, ingest_source, ScanOutcome, ScanStats};
pub use cycles::find_cycles;
pub use engine::{DependencyGraph, ModuleGraph};
pub use registry::SymbolRegistry;
pub use types::{CycleReport, CycleStep, Edge, GraphStats, ModuleId, ModuleNode, ROOT_MODULE};
