//! Core types for the module dependency graph.
//!
//! Defines module identities, nodes, import edges and the
//! cycle reports produced by the detector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name given to the package that owns the analysis root.
///
/// Empty canonical names (a root-level initializer, or a relative import that
/// climbs past the top package) all materialise as this module. It is not a
/// valid Python identifier, so it cannot collide with a real module.
pub const ROOT_MODULE: &str = "<root>";

/// Stable handle for a canonical module name.
///
/// Issued densely from 0 in first-seen order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(usize);

impl ModuleId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this module in the graph's node storage.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directed import: the owning node imports `target` at `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub target: ModuleId,
    /// 1-indexed line of the import statement in the importing file.
    pub line: usize,
}

/// A module in the graph with its outgoing imports in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Canonical dotted name, e.g. `app.models.user`.
    pub name: String,
    pub edges: Vec<Edge>,
}

impl ModuleNode {
    pub fn new(name: String) -> Self {
        Self {
            name,
            edges: Vec::new(),
        }
    }

    /// Line of the first edge to `target`, if any.
    pub fn first_line_to(&self, target: ModuleId) -> Option<usize> {
        self.edges
            .iter()
            .find(|edge| edge.target == target)
            .map(|edge| edge.line)
    }
}

/// One hop of a cycle: a module and the line of its import of the next hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStep {
    pub module: String,
    pub id: ModuleId,
    /// `None` only on the closing step, which repeats the starting module.
    pub line_to_next: Option<usize>,
}

/// A closed walk through the graph.
///
/// The last step always repeats the first module and carries no line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub steps: Vec<CycleStep>,
}

impl CycleReport {
    /// Number of distinct modules in the loop (a self-import has length 1).
    pub fn len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The modules on the loop, without the closing repeat.
    pub fn modules(&self) -> Vec<&str> {
        self.steps[..self.len()]
            .iter()
            .map(|step| step.module.as_str())
            .collect()
    }

    /// Import lines along the loop, one per hop.
    pub fn lines(&self) -> Vec<usize> {
        self.steps.iter().filter_map(|step| step.line_to_next).collect()
    }

    pub fn start(&self) -> Option<&str> {
        self.steps.first().map(|step| step.module.as_str())
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            match step.line_to_next {
                Some(line) => write!(f, "{} (line {})", step.module, line)?,
                None => write!(f, "{}", step.module)?,
            }
        }
        Ok(())
    }
}

/// Size summary of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub module_count: usize,
    pub edge_count: usize,
    /// Modules that import themselves directly.
    pub self_imports: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} modules, {} imports ({} self-imports)",
            self.module_count, self.edge_count, self.self_imports
        )
    }
}
