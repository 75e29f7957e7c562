//! # PyCycle
//!
//! Circular import detection for Python source trees.
//!
//! PyCycle walks a package hierarchy, turns every `import` / `from ... import`
//! line into an edge between canonical module names, and reports each import
//! cycle as a closed walk with the line of every hop.
//!
//! ## Key Features
//!
//! - **Relative imports**: `from ..core import x` is resolved against the
//!   importing module, with package initializers handled specially
//! - **Full paths**: cycles are reported hop by hop, not just detected
//! - **Deep graphs**: traversal uses an explicit stack, not recursion
//! - **Export**: the whole graph can be written as Graphviz DOT
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pycycle::{build_graph, AnalyzerConfig};
//! use std::path::Path;
//!
//! let outcome = build_graph(Path::new("src"), &AnalyzerConfig::default())?;
//! for cycle in outcome.graph.find_cycles() {
//!     println!("{cycle}");
//! }
//! # Ok::<(), pycycle::PycycleError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod report;
pub mod resolver;

// Re-exports for convenience
pub use config::AnalyzerConfig;
pub use error::{FileError, FileErrorKind, PycycleError, Result};

// Graph re-exports
pub use graph::{
    build_graph, ingest_source, CycleReport, CycleStep, DependencyGraph, GraphStats, ModuleGraph,
    ModuleId, ScanOutcome, ScanStats, SymbolRegistry, ROOT_MODULE,
};
pub use parser::{ImportClause, ImportKind, ModulePath};
pub use report::{
    export_dot, export_dot_or_warn, render_cycle, render_text, write_dot, AnalysisReport,
};
pub use resolver::{resolve_target, Resolver};
