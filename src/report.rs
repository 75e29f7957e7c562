//! Rendering of analysis results.
//!
//! - Coloured text traces for each cycle
//! - A JSON report for tooling
//! - A Graphviz DOT export of the full import graph

use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{serialize_path, FileError, PycycleError, Result};
use crate::graph::{CycleReport, DependencyGraph, GraphStats, ScanOutcome, ScanStats};

const RULE: &str = "--------------------------------";

/// Everything a run produced, in serializable form.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(serialize_with = "serialize_path")]
    pub root: PathBuf,
    pub scan: ScanStats,
    pub graph: GraphStats,
    pub cycles: Vec<CycleReport>,
    pub errors: Vec<FileError>,
}

impl AnalysisReport {
    pub fn new(root: &Path, outcome: &ScanOutcome, cycles: Vec<CycleReport>) -> Self {
        Self {
            root: root.to_path_buf(),
            scan: outcome.stats,
            graph: outcome.graph.stats(),
            cycles,
            errors: outcome.errors.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Trace of one cycle, ending with the closing marker.
pub fn render_cycle(cycle: &CycleReport) -> String {
    CycleTrace(cycle).to_string()
}

/// Full text report: every cycle trace followed by a summary.
pub fn render_text(report: &AnalysisReport) -> String {
    TextReport(report).to_string()
}

struct CycleTrace<'a>(&'a CycleReport);

impl fmt::Display for CycleTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycle = self.0;
        writeln!(f, "\n{}", " CIRCULAR DEPENDENCY DETECTED".red().bold())?;
        writeln!(f, "{}", RULE.red())?;
        for step in &cycle.steps[..cycle.len()] {
            let line = step.line_to_next.unwrap_or_default();
            writeln!(
                f,
                "  {} {} {}",
                "->".red(),
                format!("{:<20}", step.module).bold(),
                format!("(line [{line}])").yellow()
            )?;
        }
        if let Some(start) = cycle.start() {
            writeln!(
                f,
                "  {} {} {}",
                "->".red(),
                start.cyan().bold(),
                "(CLOSED LOOP)".red()
            )?;
        }
        writeln!(f, "{}", RULE.red())
    }
}

struct TextReport<'a>(&'a AnalysisReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        for cycle in &report.cycles {
            write!(f, "{}", CycleTrace(cycle))?;
        }
        for error in &report.errors {
            writeln!(f, "{} {}", "skipped:".yellow(), error)?;
        }

        writeln!(f)?;
        writeln!(f, "Modules found: {}", report.graph.module_count)?;
        writeln!(f, "{}", report.scan)?;
        if report.cycles.is_empty() {
            writeln!(f, "{}", "No circular dependencies detected.".green())
        } else {
            writeln!(
                f,
                "Found {} circular dependencies.",
                report.cycles.len().to_string().red().bold()
            )
        }
    }
}

/// Write the full edge set as a Graphviz digraph, one row per edge.
pub fn write_dot<W: Write>(graph: &DependencyGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph PyCycle {{")?;
    writeln!(out, "  rankdir=LR;")?;
    writeln!(out, "  node [shape=box, style=filled, fillcolor=lightgray];")?;
    writeln!(out)?;
    for (from, edge) in graph.all_edges() {
        writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"line {}\"];",
            escape(graph.name(from).unwrap_or_default()),
            escape(graph.name(edge.target).unwrap_or_default()),
            edge.line
        )?;
    }
    writeln!(out, "}}")
}

/// Write the DOT export to `path`.
pub fn export_dot(graph: &DependencyGraph, path: &Path) -> Result<()> {
    let export_failed = |source| PycycleError::ExportFailed {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(export_failed)?;
    let mut writer = BufWriter::new(file);
    write_dot(graph, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(export_failed)?;

    info!(path = %path.display(), edges = graph.edge_count(), "graph exported");
    Ok(())
}

/// Write the DOT export, logging a failure instead of returning it.
///
/// Used once a report has already been produced, where a bad export path
/// must not discard the analysis. Returns whether the file was written.
pub fn export_dot_or_warn(graph: &DependencyGraph, path: &Path) -> bool {
    match export_dot(graph, path) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "graph export failed");
            eprintln!("{} {}", "Export failed:".yellow().bold(), e);
            false
        }
    }
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
