//! Extension registry for the weft compiler
//!
//! Validates and stores the three extension kinds, keyed by a unique string
//! per kind. Validation never mutates on failure: a rejected registration
//! leaves the registry exactly as it was.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::extension::{
    ExtensionKind, ExtensionMetadata, FrameworkExtension, StylingExtension, UtilityExtension,
};

lazy_static! {
    /// Lowercase alphanumeric with internal hyphens; no leading/trailing hyphen.
    static ref KEY_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    /// Three-part numeric semantic version.
    static ref VERSION_RE: Regex = Regex::new(r"^\d+\.\d+\.\d+$").unwrap();
}

/// Styling approaches the built-in tooling understands. Anything else is
/// accepted with a warning.
const KNOWN_STYLING_APPROACHES: &[&str] = &["css", "scss", "inline", "utility-classes"];

// ═══════════════════════════════════════════════════════════════════════════════
// VALIDATION REPORT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn finish(mut self) -> Self {
        self.is_valid = self.errors.is_empty();
        self
    }
}

fn validate_metadata(
    metadata: &ExtensionMetadata,
    expected_kind: ExtensionKind,
    report: &mut ValidationReport,
) {
    if metadata.key.is_empty() {
        report.error("metadata.key is required");
    } else if !KEY_RE.is_match(&metadata.key) {
        report.error(format!(
            "metadata.key '{}' must be lowercase alphanumeric with internal hyphens",
            metadata.key
        ));
    }

    if metadata.name.trim().is_empty() {
        report.error("metadata.name is required and must be non-empty");
    }

    if metadata.version.is_empty() {
        report.error("metadata.version is required");
    } else if !VERSION_RE.is_match(&metadata.version) {
        report.error(format!(
            "metadata.version '{}' must be a three-part numeric semantic version",
            metadata.version
        ));
    }

    if metadata.kind != expected_kind {
        report.error(format!(
            "metadata.kind is '{}' but the extension was registered as '{}'",
            metadata.kind, expected_kind
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-mostly after setup. Registration is not synchronized; perform all
/// registration before rendering concurrently against the same instance.
#[derive(Default)]
pub struct ExtensionRegistry {
    frameworks: IndexMap<String, Arc<dyn FrameworkExtension>>,
    styling: IndexMap<String, Arc<dyn StylingExtension>>,
    utilities: IndexMap<String, Arc<dyn UtilityExtension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_framework(&mut self, extension: Arc<dyn FrameworkExtension>) -> ValidationReport {
        let mut report = ValidationReport::default();
        let metadata = extension.metadata().clone();
        validate_metadata(&metadata, ExtensionKind::Framework, &mut report);

        if self.frameworks.contains_key(&metadata.key) {
            report.error(format!(
                "framework extension '{}' is already registered",
                metadata.key
            ));
        }

        let report = report.finish();
        if report.is_valid {
            self.frameworks.insert(metadata.key, extension);
        }
        report
    }

    pub fn register_styling(&mut self, extension: Arc<dyn StylingExtension>) -> ValidationReport {
        let mut report = ValidationReport::default();
        let metadata = extension.metadata().clone();
        validate_metadata(&metadata, ExtensionKind::Styling, &mut report);

        let approach = extension.approach();
        if !KNOWN_STYLING_APPROACHES.contains(&approach) {
            report.warning(format!(
                "styling approach '{}' is not recognized; the extension's own emitters must cover it",
                approach
            ));
        }

        if self.styling.contains_key(&metadata.key) {
            report.error(format!(
                "styling extension '{}' is already registered",
                metadata.key
            ));
        }

        let report = report.finish();
        if report.is_valid {
            self.styling.insert(metadata.key, extension);
        }
        report
    }

    pub fn register_utility(&mut self, extension: Arc<dyn UtilityExtension>) -> ValidationReport {
        let mut report = ValidationReport::default();
        let metadata = extension.metadata().clone();
        validate_metadata(&metadata, ExtensionKind::Utility, &mut report);

        if self.utilities.contains_key(&metadata.key) {
            report.error(format!(
                "utility extension '{}' is already registered",
                metadata.key
            ));
        }

        let report = report.finish();
        if report.is_valid {
            self.utilities.insert(metadata.key, extension);
        }
        report
    }

    pub fn get_framework(&self, key: &str) -> Option<Arc<dyn FrameworkExtension>> {
        self.frameworks.get(key).cloned()
    }

    pub fn get_styling(&self, key: &str) -> Option<Arc<dyn StylingExtension>> {
        self.styling.get(key).cloned()
    }

    pub fn get_utility(&self, key: &str) -> Option<Arc<dyn UtilityExtension>> {
        self.utilities.get(key).cloned()
    }

    pub fn has_framework(&self, key: &str) -> bool {
        self.frameworks.contains_key(key)
    }

    pub fn has_styling(&self, key: &str) -> bool {
        self.styling.contains_key(key)
    }

    pub fn has_utility(&self, key: &str) -> bool {
        self.utilities.contains_key(key)
    }

    pub fn remove_framework(&mut self, key: &str) -> bool {
        self.frameworks.shift_remove(key).is_some()
    }

    pub fn remove_styling(&mut self, key: &str) -> bool {
        self.styling.shift_remove(key).is_some()
    }

    pub fn remove_utility(&mut self, key: &str) -> bool {
        self.utilities.shift_remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.frameworks.clear();
        self.styling.clear();
        self.utilities.clear();
    }

    pub fn framework_keys(&self) -> Vec<String> {
        self.frameworks.keys().cloned().collect()
    }

    pub fn styling_keys(&self) -> Vec<String> {
        self.styling.keys().cloned().collect()
    }

    pub fn utility_keys(&self) -> Vec<String> {
        self.utilities.keys().cloned().collect()
    }

    pub fn count(&self, kind: ExtensionKind) -> usize {
        match kind {
            ExtensionKind::Framework => self.frameworks.len(),
            ExtensionKind::Styling => self.styling.len(),
            ExtensionKind::Utility => self.utilities.len(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.frameworks.len() + self.styling.len() + self.utilities.len()
    }
}
