//! Analyzer configuration.
//!
//! Read from `.pycycle.toml` at the analysis root unless a path is given
//! explicitly. Every field has a default, so an empty or missing file is
//! valid.
//!
//! ```toml
//! extensions = ["py", "pyw"]
//! package_init = "__init__"
//! respect_gitignore = true
//! include_hidden = false
//! initial_capacity = 1024
//! export = "graph.dot"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PycycleError, Result};

/// File name looked up at the analysis root.
pub const CONFIG_FILE_NAME: &str = ".pycycle.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// File extensions (without the dot) treated as script files.
    pub extensions: Vec<String>,
    /// Stem of the file that turns a directory into a package.
    pub package_init: String,
    /// Skip files matched by `.gitignore` and friends.
    pub respect_gitignore: bool,
    /// Descend into hidden files and directories.
    pub include_hidden: bool,
    /// Starting capacity of the registry and node storage.
    pub initial_capacity: usize,
    /// Where to write the graph export, if anywhere.
    pub export: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            package_init: "__init__".to_string(),
            respect_gitignore: true,
            include_hidden: false,
            initial_capacity: 1024,
            export: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load config from `path`, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "ignoring config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from `path`, reporting read and parse errors.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PycycleError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| PycycleError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config.normalized())
    }

    /// Config for the project at `root`, from its `.pycycle.toml` if present.
    pub fn discover(root: &Path) -> Self {
        Self::load(&root.join(CONFIG_FILE_NAME))
    }

    /// Strip leading dots from extensions and keep capacities positive.
    fn normalized(mut self) -> Self {
        for ext in &mut self.extensions {
            if let Some(stripped) = ext.strip_prefix('.') {
                *ext = stripped.to_string();
            }
        }
        self.initial_capacity = self.initial_capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AnalyzerConfig::discover(dir.path());
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.extensions, vec!["py"]);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "extensions = [\".py\", \"pyw\"]\nexport = \"deps.dot\"\n").unwrap();

        let config = AnalyzerConfig::try_load(&path).unwrap();
        assert_eq!(config.extensions, vec!["py", "pyw"]);
        assert_eq!(config.export, Some(PathBuf::from("deps.dot")));
        assert_eq!(config.package_init, "__init__");
        assert!(config.respect_gitignore);
    }

    #[test]
    fn test_invalid_file_is_reported_by_try_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "extensions = 3").unwrap();

        assert!(matches!(
            AnalyzerConfig::try_load(&path),
            Err(PycycleError::Config { .. })
        ));
        assert_eq!(AnalyzerConfig::load(&path), AnalyzerConfig::default());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "initial_capacity = 0").unwrap();
        assert_eq!(AnalyzerConfig::try_load(&path).unwrap().initial_capacity, 1);
    }
}
