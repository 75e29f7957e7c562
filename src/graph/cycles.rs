//! Import cycle detection.
//!
//! Depth-first traversal over every module in identity order, driven by a
//! heap-allocated frame stack so arbitrarily long import chains cannot exhaust
//! the native call stack. Traversal state lives in a per-call array, so the
//! graph itself is never mutated and detection can be repeated freely.

use tracing::{debug, info};

use super::engine::DependencyGraph;
use super::types::{CycleReport, CycleStep, ModuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    /// On the active traversal path.
    OnPath,
    /// Fully processed. Terminal.
    Visited,
}

/// A module being explored and the index of its next edge to follow.
struct Frame {
    module: ModuleId,
    next_edge: usize,
}

/// Find every import cycle reachable in `graph`.
///
/// Each back edge to a module on the current path yields one report, so
/// overlapping cycles are all reported and nothing is deduplicated. Modules
/// already fully processed are pruned, which means a cycle is only reported
/// from the back edge that closes it during this traversal order.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<CycleReport> {
    let mut state = vec![VisitState::Unvisited; graph.len()];
    let mut stack: Vec<Frame> = Vec::new();
    let mut path: Vec<ModuleId> = Vec::new();
    let mut cycles = Vec::new();

    for (root, _) in graph.nodes() {
        if state[root.index()] != VisitState::Unvisited {
            continue;
        }

        state[root.index()] = VisitState::OnPath;
        stack.push(Frame {
            module: root,
            next_edge: 0,
        });
        path.push(root);

        while let Some(frame) = stack.last_mut() {
            let edges = graph.edges(frame.module);
            let Some(edge) = edges.get(frame.next_edge) else {
                // backtrack
                state[frame.module.index()] = VisitState::Visited;
                stack.pop();
                path.pop();
                continue;
            };
            frame.next_edge += 1;

            let target = edge.target;
            match state[target.index()] {
                VisitState::OnPath => {
                    let report = trace_cycle(graph, &path, target);
                    debug!(cycle = %report, "cycle found");
                    cycles.push(report);
                }
                VisitState::Visited => {}
                VisitState::Unvisited => {
                    state[target.index()] = VisitState::OnPath;
                    stack.push(Frame {
                        module: target,
                        next_edge: 0,
                    });
                    path.push(target);
                }
            }
        }
    }

    if !cycles.is_empty() {
        info!(count = cycles.len(), "import cycles detected");
    }
    cycles
}

/// Build the report for the loop that starts where `trigger` sits on `path`.
///
/// Each hop is labelled with the first edge between the pair, so parallel
/// imports report their earliest line.
fn trace_cycle(graph: &DependencyGraph, path: &[ModuleId], trigger: ModuleId) -> CycleReport {
    let start = path
        .iter()
        .rposition(|&id| id == trigger)
        .unwrap_or_default();

    let walk: Vec<ModuleId> = path[start..]
        .iter()
        .copied()
        .chain(std::iter::once(trigger))
        .collect();

    let mut steps: Vec<CycleStep> = walk
        .windows(2)
        .map(|pair| CycleStep {
            module: module_name(graph, pair[0]),
            id: pair[0],
            line_to_next: graph.node(pair[0]).and_then(|node| node.first_line_to(pair[1])),
        })
        .collect();
    steps.push(CycleStep {
        module: module_name(graph, trigger),
        id: trigger,
        line_to_next: None,
    });

    CycleReport { steps }
}

fn module_name(graph: &DependencyGraph, id: ModuleId) -> String {
    graph.name(id).unwrap_or_default().to_string()
}
