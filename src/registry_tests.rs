use std::sync::Arc;

use crate::extension::{
    ExtensionKind, ExtensionMetadata, ExtensionResult, StylingExtension, StylingOutput,
    UtilityExtension,
};
use crate::ir::{ComponentConcept, StylingConcept, TemplateNode};
use crate::pipeline::ProcessOptions;
use crate::registry::ExtensionRegistry;
use crate::style::StyleEngine;
use crate::utilities::ConceptTaggerUtility;

struct DummyUtility {
    metadata: ExtensionMetadata,
}

impl DummyUtility {
    fn new(key: &str, version: &str, kind: ExtensionKind) -> Self {
        DummyUtility {
            metadata: ExtensionMetadata::new(key, "Dummy", version, kind),
        }
    }
}

impl UtilityExtension for DummyUtility {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn process(&self, concepts: ComponentConcept) -> ExtensionResult<ComponentConcept> {
        Ok(concepts)
    }
}

struct ExoticStyling {
    metadata: ExtensionMetadata,
}

impl ExoticStyling {
    fn new() -> Self {
        ExoticStyling {
            metadata: ExtensionMetadata::new(
                "atomic-shadows",
                "Atomic Shadows",
                "2.0.0",
                ExtensionKind::Styling,
            ),
        }
    }
}

impl StylingExtension for ExoticStyling {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn approach(&self) -> &str {
        "shadow-atoms"
    }

    fn process_styles(
        &self,
        _engine: &mut StyleEngine,
        styling: &StylingConcept,
        _nodes: &[TemplateNode],
        _options: &ProcessOptions,
    ) -> ExtensionResult<StylingOutput> {
        Ok(StylingOutput {
            styling: styling.clone(),
            stylesheet: String::new(),
        })
    }
}

#[test]
fn valid_registration_stores_and_lists_the_key() {
    let mut registry = ExtensionRegistry::new();
    let report =
        registry.register_utility(Arc::new(DummyUtility::new("lint", "1.0.0", ExtensionKind::Utility)));

    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert!(registry.has_utility("lint"));
    assert_eq!(registry.utility_keys(), vec!["lint"]);
    assert_eq!(registry.count(ExtensionKind::Utility), 1);
}

#[test]
fn duplicate_key_is_rejected_without_mutating() {
    let mut registry = ExtensionRegistry::new();
    registry.register_utility(Arc::new(ConceptTaggerUtility::new()));
    let before = registry.total_count();

    let report = registry.register_utility(Arc::new(DummyUtility::new(
        "concept-tagger",
        "1.0.0",
        ExtensionKind::Utility,
    )));

    assert!(!report.is_valid);
    assert!(report.errors[0].contains("already registered"));
    assert_eq!(registry.total_count(), before);
}

#[test]
fn malformed_key_is_rejected() {
    let mut registry = ExtensionRegistry::new();
    for bad in ["Bad_Key", "UPPER", "-leading", "trailing-", "spa ce"] {
        let report =
            registry.register_utility(Arc::new(DummyUtility::new(bad, "1.0.0", ExtensionKind::Utility)));
        assert!(!report.is_valid, "key '{}' should be rejected", bad);
    }
    assert_eq!(registry.total_count(), 0);
}

#[test]
fn non_semver_version_is_rejected() {
    let mut registry = ExtensionRegistry::new();
    for bad in ["1.0", "v1.0.0", "1.0.0-beta", ""] {
        let report =
            registry.register_utility(Arc::new(DummyUtility::new("lint", bad, ExtensionKind::Utility)));
        assert!(!report.is_valid, "version '{}' should be rejected", bad);
    }
}

#[test]
fn kind_mismatch_is_rejected() {
    let mut registry = ExtensionRegistry::new();
    let report = registry.register_utility(Arc::new(DummyUtility::new(
        "lint",
        "1.0.0",
        ExtensionKind::Framework,
    )));

    assert!(!report.is_valid);
    assert!(report.errors[0].contains("registered as 'utility'"));
}

#[test]
fn unrecognized_styling_approach_warns_but_registers() {
    let mut registry = ExtensionRegistry::new();
    let report = registry.register_styling(Arc::new(ExoticStyling::new()));

    assert!(report.is_valid);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("shadow-atoms"));
    assert!(registry.has_styling("atomic-shadows"));
}

#[test]
fn remove_and_clear() {
    let mut registry = ExtensionRegistry::new();
    crate::register_builtin_extensions(&mut registry);
    assert_eq!(registry.count(ExtensionKind::Framework), 3);
    assert_eq!(registry.count(ExtensionKind::Styling), 2);

    assert!(registry.remove_framework("vue"));
    assert!(!registry.remove_framework("vue"));
    assert!(!registry.has_framework("vue"));
    assert_eq!(registry.framework_keys(), vec!["react", "svelte"]);

    registry.clear();
    assert_eq!(registry.total_count(), 0);
}
