//! Import resolution: raw import clauses to canonical module names.
//!
//! Absolute clauses name their target directly. Relative clauses climb the
//! importing module's dotted path: with `d` leading dots a plain module
//! strips `d` trailing segments, while a package initializer strips `d - 1`
//! because its own name already denotes the package. Climbing past the top
//! collapses to the empty path, which is registered as [`ROOT_MODULE`].
//!
//! [`ROOT_MODULE`]: crate::graph::types::ROOT_MODULE

use tracing::trace;

use crate::error::Result;
use crate::graph::types::ModuleId;
use crate::graph::ModuleGraph;
use crate::parser::{canonical_or_root, ImportClause, ImportKind, ModulePath};

/// Canonical dotted target of `clause` imported from `importer`.
///
/// May return the empty string for a relative import that climbs to (or past)
/// the analysis root.
pub fn resolve_target(clause: &ImportClause, importer: &str, is_package_init: bool) -> String {
    match clause.kind {
        ImportKind::Absolute => clause.module.clone(),
        ImportKind::Relative => {
            let dots = clause.module.len() - clause.module.trim_start_matches('.').len();
            let mut suffix = &clause.module[dots..];
            // `from . import x` names submodule `x` of the package
            if suffix.is_empty() {
                suffix = clause.first_name.as_deref().unwrap_or_default();
            }
            let levels = if is_package_init {
                dots.saturating_sub(1)
            } else {
                dots
            };
            join_dotted(strip_segments(importer, levels), suffix)
        }
    }
}

/// Remove up to `levels` trailing segments from a dotted path.
pub fn strip_segments(path: &str, levels: usize) -> &str {
    let mut parent = path;
    for _ in 0..levels {
        match parent.rfind('.') {
            Some(dot) => parent = &parent[..dot],
            None => return "",
        }
    }
    parent
}

fn join_dotted(parent: &str, suffix: &str) -> String {
    match (parent.is_empty(), suffix.is_empty()) {
        (false, false) => format!("{parent}.{suffix}"),
        (false, true) => parent.to_string(),
        _ => suffix.to_string(),
    }
}

/// Resolves import clauses of one file and records them as graph edges.
pub struct Resolver<'g> {
    graph: &'g mut ModuleGraph,
    importer: ModuleId,
    module: &'g ModulePath,
}

impl<'g> Resolver<'g> {
    /// Register the importing module and bind a resolver to it.
    pub fn new(graph: &'g mut ModuleGraph, module: &'g ModulePath) -> Result<Self> {
        let importer = graph.resolve_or_create(module.canonical())?;
        Ok(Self {
            graph,
            importer,
            module,
        })
    }

    pub fn importer(&self) -> ModuleId {
        self.importer
    }

    /// Resolve `clause`, get-or-create its target and add the edge.
    pub fn resolve(&mut self, clause: &ImportClause) -> Result<ModuleId> {
        let target = resolve_target(clause, &self.module.name, self.module.is_package_init);
        let target_id = self.graph.resolve_or_create(canonical_or_root(&target))?;
        self.graph.add_import(self.importer, target_id, clause.line)?;
        trace!(
            from = %self.module.canonical(),
            to = %canonical_or_root(&target),
            line = clause.line,
            "import resolved"
        );
        Ok(target_id)
    }
}
