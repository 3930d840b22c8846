//! Extension contract for the weft compiler
//!
//! Three plugin kinds plug into the pipeline: framework extensions turn
//! concepts into one target's source syntax and render the final output,
//! styling extensions turn the styling concept into emitted style output,
//! and utility extensions transform the concept set itself. The required
//! operation set of each kind is a trait, so a registered extension cannot
//! be missing an operation; the registry validates everything the type
//! system cannot express (key format, semver, duplicates).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::TargetSyntax;
use crate::ir::{
    AttributeConcept, ComponentConcept, ComponentMetadata, ConditionalConcept, ElementNode,
    EventConcept, IterationConcept, SlotConcept, StylingConcept, TemplateNode,
};
use crate::pipeline::ProcessOptions;
use crate::style::{StyleDefinition, StyleEngine, StyleFormat, StyleRegistry};

// ═══════════════════════════════════════════════════════════════════════════════
// METADATA
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Framework,
    Styling,
    Utility,
}

impl ExtensionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionKind::Framework => "framework",
            ExtensionKind::Styling => "styling",
            ExtensionKind::Utility => "utility",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMetadata {
    /// Globally unique per kind; lowercase alphanumeric with internal hyphens.
    pub key: String,
    pub name: String,
    /// Three-part numeric semantic version.
    pub version: String,
    pub kind: ExtensionKind,
}

impl ExtensionMetadata {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        kind: ExtensionKind,
    ) -> Self {
        ExtensionMetadata {
            key: key.into(),
            name: name.into(),
            version: version.into(),
            kind,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// A failed extension operation. The pipeline records the fault against the
/// extension's key and continues with the last good value; faults never
/// abort a `process` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionFault {
    pub message: String,
}

impl ExtensionFault {
    pub fn new(message: impl Into<String>) -> Self {
        ExtensionFault {
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtensionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExtensionFault {}

impl From<String> for ExtensionFault {
    fn from(message: String) -> Self {
        ExtensionFault { message }
    }
}

impl From<&str> for ExtensionFault {
    fn from(message: &str) -> Self {
        ExtensionFault {
            message: message.to_string(),
        }
    }
}

pub type ExtensionResult<T> = Result<T, ExtensionFault>;

// ═══════════════════════════════════════════════════════════════════════════════
// RENDER CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything a framework extension sees at render time: the original node
/// tree, the caller's component metadata and options, and the pass-scoped
/// style engine for inline-style lookup.
pub struct RenderContext<'a> {
    pub nodes: &'a [TemplateNode],
    pub component: Option<&'a ComponentMetadata>,
    pub options: &'a ProcessOptions,
    pub style_engine: &'a StyleEngine,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXTENSION TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Turns concepts into one target framework's source syntax and performs the
/// final code generation. At most one is active per `process` invocation.
pub trait FrameworkExtension: Send + Sync {
    fn metadata(&self) -> &ExtensionMetadata;
    fn target_syntax(&self) -> TargetSyntax;

    fn process_events(&self, events: &[EventConcept]) -> ExtensionResult<Vec<EventConcept>>;
    fn process_conditionals(
        &self,
        conditionals: &[ConditionalConcept],
    ) -> ExtensionResult<Vec<ConditionalConcept>>;
    fn process_iterations(
        &self,
        iterations: &[IterationConcept],
    ) -> ExtensionResult<Vec<IterationConcept>>;
    fn process_slots(&self, slots: &[SlotConcept]) -> ExtensionResult<Vec<SlotConcept>>;
    fn process_attributes(
        &self,
        attributes: &[AttributeConcept],
    ) -> ExtensionResult<Vec<AttributeConcept>>;

    fn render_component(
        &self,
        concepts: &ComponentConcept,
        context: &RenderContext,
    ) -> ExtensionResult<String>;

    /// Hook run by the output layer on the final text immediately before it
    /// is written. Return `None` to leave the text untouched.
    fn post_process(&self, output: &str) -> Option<String> {
        let _ = output;
        None
    }
}

/// Output of a styling extension: the (possibly rewritten) styling concept
/// plus the emitted stylesheet for this pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylingOutput {
    pub styling: StylingConcept,
    pub stylesheet: String,
}

/// Turns the styling concept into emitted style output, internally driven by
/// the pipeline-owned [`StyleEngine`].
pub trait StylingExtension: Send + Sync {
    fn metadata(&self) -> &ExtensionMetadata;
    /// Styling-approach identifier, e.g. `css` or `utility-classes`. An
    /// unrecognized identifier is a registration warning, not an error.
    fn approach(&self) -> &str;

    fn process_styles(
        &self,
        engine: &mut StyleEngine,
        styling: &StylingConcept,
        nodes: &[TemplateNode],
        options: &ProcessOptions,
    ) -> ExtensionResult<StylingOutput>;

    /// Rewrite a resolved selector before it is stored in the registry.
    fn rewrite_selector(&self, selector: &str, element: &ElementNode) -> Option<String> {
        let _ = (selector, element);
        None
    }

    /// Whole-output emission hook; non-empty output is used verbatim and the
    /// built-in generators are skipped.
    fn emit(&self, registry: &StyleRegistry, format: StyleFormat) -> Option<String> {
        let _ = (registry, format);
        None
    }

    /// Selector-level emission hook; when any rule is produced the built-in
    /// generators are skipped and the plugin rules are used verbatim.
    fn emit_rule(
        &self,
        selector: &str,
        definition: &StyleDefinition,
        format: StyleFormat,
    ) -> Option<String> {
        let _ = (selector, definition, format);
        None
    }
}

/// Transforms the concept set itself (linting, tagging, rewriting) before
/// framework and styling processing. Applied in array order as a left-fold.
pub trait UtilityExtension: Send + Sync {
    fn metadata(&self) -> &ExtensionMetadata;
    fn process(&self, concepts: ComponentConcept) -> ExtensionResult<ComponentConcept>;
}
