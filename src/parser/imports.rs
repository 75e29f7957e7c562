//! Line-oriented import scanning.
//!
//! This is keyword matching, not parsing: each line is checked for a leading
//! `import` or `from` keyword and only the first clause is read. Multi-line
//! imports, conditional imports and aliases are not interpreted.

use serde::Serialize;

/// How an import clause names its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import X` or `from X import ...`.
    Absolute,
    /// `from .X import ...` or `from .. import ...`.
    Relative,
}

/// An import found on one line of a script file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportClause {
    /// 1-indexed line number.
    pub line: usize,
    pub kind: ImportKind,
    /// First token after the keyword, e.g. `os.path`, `.models` or `..`.
    pub module: String,
    /// First name after `import` in a `from` clause, if any.
    pub first_name: Option<String>,
}

/// Scan every line of `source` for import clauses.
pub fn scan_source(source: &str) -> Vec<ImportClause> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, text)| scan_line(text, index + 1))
        .collect()
}

/// Classify one line. Returns `None` for lines that are not imports.
pub fn scan_line(text: &str, line: usize) -> Option<ImportClause> {
    let rest = text.trim_start_matches([' ', '\t']);

    if let Some(after) = strip_keyword(rest, "import") {
        let module = first_token(after)?;
        return Some(ImportClause {
            line,
            kind: ImportKind::Absolute,
            module: module.to_string(),
            first_name: None,
        });
    }

    let after = strip_keyword(rest, "from")?;
    let module = first_token(after)?;
    let kind = if module.starts_with('.') {
        ImportKind::Relative
    } else {
        ImportKind::Absolute
    };

    Some(ImportClause {
        line,
        kind,
        module: module.to_string(),
        first_name: imported_name(&after[module.len()..]).map(str::to_string),
    })
}

/// Strip `keyword` when it is followed by a space or tab.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let after = text.strip_prefix(keyword)?;
    if after.starts_with([' ', '\t']) {
        Some(after.trim_start_matches([' ', '\t']))
    } else {
        None
    }
}

/// Leading token up to whitespace or a comma.
fn first_token(text: &str) -> Option<&str> {
    let end = text
        .find(|c: char| c.is_whitespace() || c == ',')
        .unwrap_or(text.len());
    let token = &text[..end];
    (!token.is_empty()).then_some(token)
}

/// First name in the `import a, b` tail of a `from` clause.
fn imported_name(tail: &str) -> Option<&str> {
    let mut words = tail.split_whitespace();
    words.find(|&word| word == "import")?;
    let word = words.next()?.trim_start_matches('(');
    let end = word.find([',', ')']).unwrap_or(word.len());
    let name = &word[..end];
    (!name.is_empty() && name != "*").then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(text: &str) -> Option<ImportClause> {
        scan_line(text, 1)
    }

    #[test]
    fn test_plain_import_is_absolute() {
        let found = clause("import os.path").unwrap();
        assert_eq!(found.kind, ImportKind::Absolute);
        assert_eq!(found.module, "os.path");
        assert_eq!(found.first_name, None);
    }

    #[test]
    fn test_only_first_target_is_kept() {
        assert_eq!(clause("import os, sys").unwrap().module, "os");
        assert_eq!(clause("import numpy as np").unwrap().module, "numpy");
        assert_eq!(clause("import a,b").unwrap().module, "a");
    }

    #[test]
    fn test_from_import_absolute() {
        let found = clause("from app.models import User").unwrap();
        assert_eq!(found.kind, ImportKind::Absolute);
        assert_eq!(found.module, "app.models");
        assert_eq!(found.first_name.as_deref(), Some("User"));
    }

    #[test]
    fn test_from_import_relative() {
        let found = clause("from .models import User").unwrap();
        assert_eq!(found.kind, ImportKind::Relative);
        assert_eq!(found.module, ".models");

        let found = clause("from .. import (config, settings)").unwrap();
        assert_eq!(found.kind, ImportKind::Relative);
        assert_eq!(found.module, "..");
        assert_eq!(found.first_name.as_deref(), Some("config"));
    }

    #[test]
    fn test_star_import_has_no_first_name() {
        let found = clause("from . import *").unwrap();
        assert_eq!(found.module, ".");
        assert_eq!(found.first_name, None);
    }

    #[test]
    fn test_indented_import_is_found() {
        let found = clause("    \tfrom . import x").unwrap();
        assert_eq!(found.module, ".");
        assert_eq!(found.first_name.as_deref(), Some("x"));
    }

    #[test]
    fn test_non_import_lines_are_ignored() {
        assert_eq!(clause("important = True"), None);
        assert_eq!(clause("fromage = 'brie'"), None);
        assert_eq!(clause("# import os"), None);
        assert_eq!(clause("print('import os')"), None);
        assert_eq!(clause("import"), None);
        assert_eq!(clause("import   "), None);
        assert_eq!(clause(""), None);
    }

    #[test]
    fn test_scan_source_numbers_lines_from_one() {
        let source = "\"\"\"Docs.\"\"\"\nimport os\n\nfrom .b import c\r\nx = 1\n";
        let found = scan_source(source);

        assert_eq!(found.len(), 2);
        assert_eq!((found[0].line, found[0].module.as_str()), (2, "os"));
        assert_eq!((found[1].line, found[1].module.as_str()), (4, ".b"));
    }
}
