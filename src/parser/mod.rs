//! Script file scanning.
//!
//! Turns a file path and its text into a canonical module name plus the raw
//! import clauses found in it. Resolution of those clauses into graph edges
//! happens in [`crate::resolver`].

pub mod imports;
pub mod module_path;

use std::path::{Path, PathBuf};

pub use imports::{scan_line, scan_source, ImportClause, ImportKind};
pub use module_path::{canonical_or_root, module_name, ModulePath};

/// All extracted information from a single script file.
#[derive(Debug, Clone)]
pub struct FileScan {
    pub path: PathBuf,
    pub module: ModulePath,
    pub imports: Vec<ImportClause>,
}

/// Derive the module name of `path` and scan `source` for imports.
pub fn extract_file(path: &Path, root: &Path, source: &str, package_init: &str) -> FileScan {
    FileScan {
        path: path.to_path_buf(),
        module: module_name(path, root, package_init),
        imports: scan_source(source),
    }
}

/// Whether `path` has one of the configured script extensions.
pub fn is_script_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file() {
        let source = "import os\nfrom . import views\n";
        let scan = extract_file(
            Path::new("proj/app/__init__.py"),
            Path::new("proj"),
            source,
            "__init__",
        );
        assert_eq!(scan.module.name, "app");
        assert!(scan.module.is_package_init);
        assert_eq!(scan.imports.len(), 2);
        assert_eq!(scan.imports[1].kind, ImportKind::Relative);
    }

    #[test]
    fn test_is_script_file() {
        let py = vec!["py".to_string()];
        assert!(is_script_file(Path::new("a/b.py"), &py));
        assert!(!is_script_file(Path::new("a/b.pyc"), &py));
        assert!(!is_script_file(Path::new("a/.py"), &py));
        assert!(!is_script_file(Path::new("Makefile"), &py));

        let both = vec!["py".to_string(), "pyw".to_string()];
        assert!(is_script_file(Path::new("gui.pyw"), &both));
    }
}
