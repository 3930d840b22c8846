//! Template discovery
//!
//! Recursively scans a directory for `*.template.json` documents. A file
//! that cannot be read or parsed is skipped with a warning; one bad template
//! never aborts a batch.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct DiscoveredTemplate {
    pub path: PathBuf,
    /// Fallback component name derived from the file stem; the document's
    /// own component metadata wins when present.
    pub name: String,
    /// Raw file contents, kept for cache hashing.
    pub source: String,
    pub document: Value,
}

/// Recursively find all `*.template.json` files under a directory.
pub fn find_template_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).into_iter().flatten() {
        let path = entry.path();
        if path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".template.json"))
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

pub fn load_template(path: &Path) -> Result<DiscoveredTemplate, String> {
    let source =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let document: Value = serde_json::from_str(&source)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    Ok(DiscoveredTemplate {
        name: component_name(path),
        path: path.to_path_buf(),
        source,
        document,
    })
}

/// Discover and load every template under a directory, skipping unreadable
/// or malformed files.
pub fn discover_templates(dir: &Path) -> Vec<DiscoveredTemplate> {
    let mut templates = Vec::new();
    for path in find_template_files(dir) {
        match load_template(&path) {
            Ok(template) => templates.push(template),
            Err(message) => log::warn!("skipping template: {}", message),
        }
    }
    templates
}

/// `button-group.template.json` → `ButtonGroup`.
fn component_name(path: &Path) -> String {
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".template.json"))
        .unwrap_or("Component");

    let mut name = String::with_capacity(stem.len());
    let mut upper_next = true;
    for c in stem.chars() {
        if c == '-' || c == '_' || c == '.' {
            upper_next = true;
        } else if upper_next {
            name.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    if name.is_empty() {
        "Component".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_name_from_stem() {
        assert_eq!(
            component_name(Path::new("src/button-group.template.json")),
            "ButtonGroup"
        );
        assert_eq!(
            component_name(Path::new("user_card.template.json")),
            "UserCard"
        );
    }
}
