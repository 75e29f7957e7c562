//! The core graph engine for PyCycle.
//!
//! `DependencyGraph` stores modules and their import edges, addressed by
//! dense [`ModuleId`]s. `ModuleGraph` pairs it with the [`SymbolRegistry`]
//! so every canonical name maps to exactly one node.

use tracing::trace;

use super::cycles;
use super::registry::{SymbolRegistry, DEFAULT_CAPACITY};
use super::types::*;
use crate::error::{PycycleError, Result};

/// Append-only directed graph of modules and imports.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<ModuleNode>,
    edge_count: usize,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            edge_count: 0,
        }
    }

    // ─── Node Operations ────────────────────────────────────────

    /// Append a module node. Returns its identity.
    ///
    /// Names are not deduplicated here; use [`ModuleGraph::resolve_or_create`]
    /// to keep names and nodes one-to-one.
    pub fn add_node(&mut self, name: &str) -> Result<ModuleId> {
        if name.is_empty() {
            return Err(PycycleError::EmptyModuleName);
        }
        self.reserve_node()?;
        let owned = try_owned(name, "module name")?;
        Ok(self.push_reserved(owned))
    }

    /// Make room for one more node without touching existing ones.
    pub(super) fn reserve_node(&mut self) -> Result<()> {
        self.nodes
            .try_reserve(1)
            .map_err(PycycleError::alloc("graph nodes"))
    }

    /// Push a node after [`reserve_node`](Self::reserve_node) succeeded.
    pub(super) fn push_reserved(&mut self, name: String) -> ModuleId {
        let id = ModuleId::new(self.nodes.len());
        self.nodes.push(ModuleNode::new(name));
        id
    }

    // ─── Edge Operations ────────────────────────────────────────

    /// Record that `from` imports `to` at `line`.
    ///
    /// Edges are never deduplicated and self-imports are allowed.
    pub fn add_edge(&mut self, from: ModuleId, to: ModuleId, line: usize) -> Result<()> {
        let len = self.nodes.len();
        for id in [from, to] {
            if id.index() >= len {
                return Err(PycycleError::InvalidIdentity { id, len });
            }
        }

        let node = &mut self.nodes[from.index()];
        node.edges
            .try_reserve(1)
            .map_err(PycycleError::alloc("adjacency list"))?;
        node.edges.push(Edge { target: to, line });
        self.edge_count += 1;

        trace!(from = %node.name, to = %to, line, "edge added");
        Ok(())
    }

    // ─── Query Operations ───────────────────────────────────────

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn node(&self, id: ModuleId) -> Option<&ModuleNode> {
        self.nodes.get(id.index())
    }

    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.node(id).map(|node| node.name.as_str())
    }

    /// Outgoing edges of `id` in insertion order (empty for unknown ids).
    pub fn edges(&self, id: ModuleId) -> &[Edge] {
        self.node(id).map(|node| node.edges.as_slice()).unwrap_or(&[])
    }

    /// All nodes in identity order.
    pub fn nodes(&self) -> impl Iterator<Item = (ModuleId, &ModuleNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (ModuleId::new(index), node))
    }

    /// Every edge as `(source, edge)`, grouped by source in identity order.
    pub fn all_edges(&self) -> impl Iterator<Item = (ModuleId, &Edge)> + '_ {
        self.nodes()
            .flat_map(|(id, node)| node.edges.iter().map(move |edge| (id, edge)))
    }

    /// Get graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            module_count: self.nodes.len(),
            edge_count: self.edge_count,
            self_imports: self
                .nodes()
                .filter(|(id, node)| node.edges.iter().any(|edge| edge.target == *id))
                .count(),
        }
    }

    /// Find every import cycle. See [`cycles::find_cycles`].
    pub fn find_cycles(&self) -> Vec<CycleReport> {
        cycles::find_cycles(self)
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// A dependency graph whose nodes are keyed by canonical module name.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    graph: DependencyGraph,
    registry: SymbolRegistry,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a graph whose registry and node storage start at `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            graph: DependencyGraph::with_capacity(capacity),
            registry: SymbolRegistry::with_capacity(capacity),
        }
    }

    /// Get or create the node for `name`.
    ///
    /// Space for the node is reserved before the name is registered, so a
    /// failed allocation leaves both the registry and the graph as they were.
    pub fn resolve_or_create(&mut self, name: &str) -> Result<ModuleId> {
        if let Some(id) = self.registry.get(name) {
            return Ok(id);
        }
        if name.is_empty() {
            return Err(PycycleError::EmptyModuleName);
        }

        self.graph.reserve_node()?;
        let owned = try_owned(name, "module name")?;
        let id = self.registry.resolve_or_create(name)?;
        let node_id = self.graph.push_reserved(owned);
        debug_assert_eq!(id, node_id, "registry and graph identities diverged");
        Ok(id)
    }

    /// Identity of an already-known module.
    pub fn lookup(&self, name: &str) -> Option<ModuleId> {
        self.registry.get(name)
    }

    pub fn add_import(&mut self, from: ModuleId, to: ModuleId, line: usize) -> Result<()> {
        self.graph.add_edge(from, to, line)
    }

    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.graph.name(id)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    pub fn find_cycles(&self) -> Vec<CycleReport> {
        self.graph.find_cycles()
    }

    /// Access the underlying graph.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy `s` into a fresh `String`, reporting allocation failure.
pub(super) fn try_owned(s: &str, what: &'static str) -> Result<String> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(s.len())
        .map_err(PycycleError::alloc(what))?;
    owned.push_str(s);
    Ok(owned)
}
