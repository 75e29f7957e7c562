//! Graph builder: scans a directory and builds the module graph.
//!
//! Walks script files (following symlinks, respecting .gitignore unless
//! configured otherwise), reads and scans them in parallel, then resolves
//! every import into the graph on a single thread. Only that second phase touches the registry or
//! the graph, so no locking is needed.

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::engine::ModuleGraph;
use crate::config::AnalyzerConfig;
use crate::error::{FileError, PycycleError, Result};
use crate::parser::{extract_file, is_script_file, scan_source, FileScan, ModulePath};
use crate::resolver::Resolver;

/// Result of scanning a source tree.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub graph: ModuleGraph,
    pub stats: ScanStats,
    /// Files that were skipped or only partially ingested.
    pub errors: Vec<FileError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Script files discovered by the walker.
    pub files_found: usize,
    /// Files fully ingested.
    pub files_scanned: usize,
    pub files_failed: usize,
    /// Import edges recorded.
    pub imports: usize,
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scanned {} of {} script files ({} failed), {} imports",
            self.files_scanned, self.files_found, self.files_failed, self.imports
        )
    }
}

/// Build a module graph from all script files under `root`.
///
/// Fails only when `root` itself cannot be read. Unreadable files are
/// recorded in [`ScanOutcome::errors`] and the scan continues.
pub fn build_graph(root: &Path, config: &AnalyzerConfig) -> Result<ScanOutcome> {
    fs::read_dir(root).map_err(|source| PycycleError::UnreadableRoot {
        path: root.to_path_buf(),
        source,
    })?;
    info!(root = %root.display(), "scanning source tree");

    let files = discover_files(root, config);
    Ok(scan_paths(root, &files, config))
}

/// Read, scan and ingest `files` in order. Failing files are recorded and skipped.
fn scan_paths(root: &Path, files: &[PathBuf], config: &AnalyzerConfig) -> ScanOutcome {
    let scans: Vec<std::result::Result<FileScan, FileError>> = files
        .par_iter()
        .map(|path| read_and_scan(path, root, config))
        .collect();

    let mut graph = ModuleGraph::with_capacity(config.initial_capacity);
    let mut stats = ScanStats {
        files_found: files.len(),
        ..ScanStats::default()
    };
    let mut errors = Vec::new();

    for scan in scans {
        let outcome = scan.and_then(|scan| {
            ingest(&mut graph, &scan).map_err(|e| FileError::new(scan.path.clone(), &e))
        });
        match outcome {
            Ok(imports) => {
                stats.files_scanned += 1;
                stats.imports += imports;
            }
            Err(error) => {
                warn!(path = %error.path.display(), error = %error.message, "skipping file");
                stats.files_failed += 1;
                errors.push(error);
            }
        }
    }

    info!(
        modules = graph.len(),
        imports = graph.edge_count(),
        files = stats.files_scanned,
        failed = stats.files_failed,
        "graph built"
    );

    ScanOutcome {
        graph,
        stats,
        errors,
    }
}

/// Script files under `root`, sorted by name within each directory.
fn discover_files(root: &Path, config: &AnalyzerConfig) -> Vec<PathBuf> {
    WalkBuilder::new(root)
        .hidden(!config.include_hidden)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .ignore(config.respect_gitignore)
        .parents(config.respect_gitignore)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "cannot read directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| is_script_file(entry.path(), &config.extensions))
        .map(|entry| entry.into_path())
        .collect()
}

fn read_and_scan(
    path: &Path,
    root: &Path,
    config: &AnalyzerConfig,
) -> std::result::Result<FileScan, FileError> {
    let bytes = fs::read(path).map_err(|source| {
        let error = PycycleError::UnreadableInput {
            path: path.to_path_buf(),
            source,
        };
        FileError::new(path.to_path_buf(), &error)
    })?;
    let source = String::from_utf8_lossy(&bytes);
    Ok(extract_file(path, root, &source, &config.package_init))
}

/// Resolve every import of a scanned file into `graph`.
///
/// Returns the number of edges added. On error the edges added so far stay
/// in the graph and the rest of the file is skipped.
pub fn ingest(graph: &mut ModuleGraph, scan: &FileScan) -> Result<usize> {
    let mut resolver = Resolver::new(graph, &scan.module)?;
    for clause in &scan.imports {
        resolver.resolve(clause)?;
    }
    debug!(
        path = %scan.path.display(),
        module = %scan.module.canonical(),
        imports = scan.imports.len(),
        "file ingested"
    );
    Ok(scan.imports.len())
}

/// Scan `source` as the text of `module` and add its imports to `graph`.
pub fn ingest_source(graph: &mut ModuleGraph, module: &ModulePath, source: &str) -> Result<usize> {
    let scan = FileScan {
        path: PathBuf::from(module.canonical()),
        module: module.clone(),
        imports: scan_source(source),
    };
    ingest(graph, &scan)
}
