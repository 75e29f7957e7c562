//! Mapping script file paths to canonical dotted module names.

use std::path::{Component, Path};

use serde::Serialize;

use crate::graph::types::ROOT_MODULE;

/// Canonical name of a scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePath {
    /// Dotted name relative to the analysis root. Empty for a root-level
    /// package initializer.
    pub name: String,
    /// The file is a package initializer, so `name` denotes the package itself.
    pub is_package_init: bool,
}

impl ModulePath {
    /// The name under which this module is registered in the graph.
    pub fn canonical(&self) -> &str {
        canonical_or_root(&self.name)
    }
}

/// Map an empty dotted path to the reserved root module.
pub fn canonical_or_root(name: &str) -> &str {
    if name.is_empty() {
        ROOT_MODULE
    } else {
        name
    }
}

/// Converts `src/app/models.py` under root `src` to `app.models`.
///
/// The root prefix is stripped when present, the trailing extension is
/// dropped from the file name, and a trailing `package_init` segment (e.g.
/// `__init__`) is removed so the name denotes the package.
pub fn module_name(path: &Path, root: &Path, package_init: &str) -> ModulePath {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let mut is_package_init = false;
    if let Some(last) = segments.last_mut() {
        // ".hidden" has no extension to drop
        if let Some(dot) = last.rfind('.').filter(|&dot| dot > 0) {
            last.truncate(dot);
        }
        if last == package_init {
            segments.pop();
            is_package_init = true;
        }
    }

    ModulePath {
        name: segments.join("."),
        is_package_init,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain_module("src/app/models.py", "src", "app.models", false)]
    #[case::package_init("src/app/__init__.py", "src", "app", true)]
    #[case::nested_package_init("src/a/b/c/__init__.py", "src", "a.b.c", true)]
    #[case::deeply_nested("src/a/b/c/d.py", "src", "a.b.c.d", false)]
    #[case::root_level("src/setup.py", "src", "setup", false)]
    #[case::root_with_trailing_slash("src/app/views.py", "src/", "app.views", false)]
    #[case::only_last_extension_dropped("src/pkg/mod.test.py", "src", "pkg.mod.test", false)]
    #[case::outside_root("other/x.py", "src", "other.x", false)]
    #[case::dotted_root("./proj/pkg/a.py", "./proj", "pkg.a", false)]
    fn test_module_name(
        #[case] path: &str,
        #[case] root: &str,
        #[case] expected: &str,
        #[case] is_init: bool,
    ) {
        let module = module_name(Path::new(path), Path::new(root), "__init__");
        assert_eq!(module.name, expected);
        assert_eq!(module.is_package_init, is_init);
    }

    #[test]
    fn test_root_package_init_maps_to_root_module() {
        let module = module_name(Path::new("src/__init__.py"), Path::new("src"), "__init__");
        assert_eq!(module.name, "");
        assert!(module.is_package_init);
        assert_eq!(module.canonical(), ROOT_MODULE);
    }

    #[test]
    fn test_custom_initializer_stem() {
        let module = module_name(Path::new("lib/pkg/__main__.py"), Path::new("lib"), "__main__");
        assert_eq!(module.name, "pkg");
        assert!(module.is_package_init);
    }
}
