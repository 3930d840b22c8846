use crate::extension::{
    ExtensionKind, ExtensionMetadata, ExtensionResult, StylingExtension, StylingOutput,
};
use crate::ir::{StylingConcept, TemplateNode};
use crate::pipeline::ProcessOptions;
use crate::style::StyleEngine;

/// Plain-CSS styling: every structured style declaration in the tree becomes
/// a rule under its resolved selector, emitted in the caller's requested
/// format. The styling concept passes through unchanged.
pub struct CssStylingExtension {
    metadata: ExtensionMetadata,
}

impl CssStylingExtension {
    pub fn new() -> Self {
        CssStylingExtension {
            metadata: ExtensionMetadata::new(
                "css",
                "CSS Styling",
                "1.0.0",
                ExtensionKind::Styling,
            ),
        }
    }
}

impl Default for CssStylingExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl StylingExtension for CssStylingExtension {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn approach(&self) -> &str {
        "css"
    }

    fn process_styles(
        &self,
        engine: &mut StyleEngine,
        styling: &StylingConcept,
        nodes: &[TemplateNode],
        options: &ProcessOptions,
    ) -> ExtensionResult<StylingOutput> {
        engine.process_tree(nodes, Some(self));
        let stylesheet = engine.generate_output(options.style_format, Some(self));
        Ok(StylingOutput {
            styling: styling.clone(),
            stylesheet,
        })
    }
}
