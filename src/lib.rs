//! # Weft Compiler
//!
//! Concept-driven template compilation: a framework-neutral template node
//! tree is analyzed into concepts (events, styling, conditionals,
//! iterations, slots, attributes), transformed by registered extensions,
//! and rendered into one target framework's source syntax.
//!
//! ## Processing Invariants
//!
//! 1. **Never throws**: `Pipeline::process` always returns a full result
//!    envelope. Failures degrade to recorded diagnostics, never panics or
//!    early returns.
//! 2. **Fault isolation**: every extension operation is individually
//!    guarded. A faulting utility is skipped and the fold continues from
//!    the last good concept set; a faulting transform keeps the previous
//!    value of that one category.
//! 3. **One renderer**: at most one framework extension is active per
//!    invocation. Activating a second is an error diagnostic, not a panic.
//! 4. **Deterministic extraction**: the same tree and options always yield
//!    the same concepts, in document order. All concept maps are
//!    insertion-ordered.
//! 5. **Pass-scoped styling**: the style registry belongs to one render
//!    pass and is cleared before the next; selectors resolve class-first,
//!    tag-second.

pub mod analyzer;
pub mod cache;
pub mod diagnostics;
pub mod discovery;
pub mod events;
pub mod extension;
pub mod frameworks;
pub mod ir;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod serializer;
pub mod style;
pub mod styling;
pub mod utilities;

pub use analyzer::{AnalyzerOptions, TemplateAnalyzer};
pub use diagnostics::{Diagnostic, ErrorCollector, Severity, Stage};
pub use events::TargetSyntax;
pub use extension::{
    ExtensionFault, ExtensionKind, ExtensionMetadata, ExtensionResult, FrameworkExtension,
    StylingExtension, StylingOutput, UtilityExtension,
};
pub use ir::{ComponentConcept, ComponentMetadata, TemplateInput, TemplateNode};
pub use pipeline::{Pipeline, ProcessOptions, ProcessingResult};
pub use registry::ExtensionRegistry;
pub use style::{StyleEngine, StyleFormat};

use std::sync::Arc;

/// Register the built-in framework, styling and utility extensions.
pub fn register_builtin_extensions(registry: &mut ExtensionRegistry) {
    // Built-in metadata is statically valid; these reports are always clean.
    registry.register_framework(Arc::new(frameworks::ReactExtension::new()));
    registry.register_framework(Arc::new(frameworks::VueExtension::new()));
    registry.register_framework(Arc::new(frameworks::SvelteExtension::new()));
    registry.register_styling(Arc::new(styling::CssStylingExtension::new()));
    registry.register_styling(Arc::new(styling::UtilityClassStylingExtension::new()));
    registry.register_utility(Arc::new(utilities::ConceptTaggerUtility::new()));
    registry.register_utility(Arc::new(utilities::ClassSorterUtility::new()));
}

#[cfg(test)]
mod analyzer_tests;
#[cfg(test)]
mod events_tests;
#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod serializer_tests;
#[cfg(test)]
mod style_tests;
