//! Built-in utility extensions
//!
//! Utilities transform the concept set before framework and styling
//! processing. They run in caller order as a left-fold; a faulting utility
//! is skipped and the fold continues from the last good value.

use serde_json::json;

use crate::extension::{ExtensionKind, ExtensionMetadata, ExtensionResult, UtilityExtension};
use crate::ir::{AttributeConcept, ComponentConcept};

/// Annotates the component with a `data-concepts` attribute summarizing what
/// was extracted. Useful when inspecting generated output in the browser.
pub struct ConceptTaggerUtility {
    metadata: ExtensionMetadata,
}

impl ConceptTaggerUtility {
    pub fn new() -> Self {
        ConceptTaggerUtility {
            metadata: ExtensionMetadata::new(
                "concept-tagger",
                "Concept Tagger",
                "1.0.0",
                ExtensionKind::Utility,
            ),
        }
    }
}

impl Default for ConceptTaggerUtility {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilityExtension for ConceptTaggerUtility {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn process(&self, mut concepts: ComponentConcept) -> ExtensionResult<ComponentConcept> {
        let summary = json!({
            "events": concepts.events.len(),
            "conditionals": concepts.conditionals.len(),
            "iterations": concepts.iterations.len(),
            "slots": concepts.slots.len(),
            "attributes": concepts.attributes.len(),
        });
        concepts.attributes.push(AttributeConcept {
            name: "data-concepts".to_string(),
            value: summary,
            is_expression: false,
        });
        Ok(concepts)
    }
}

/// Sorts static class lists so equivalent class sets serialize identically
/// regardless of authoring order.
pub struct ClassSorterUtility {
    metadata: ExtensionMetadata,
}

impl ClassSorterUtility {
    pub fn new() -> Self {
        ClassSorterUtility {
            metadata: ExtensionMetadata::new(
                "class-sorter",
                "Class Sorter",
                "1.0.0",
                ExtensionKind::Utility,
            ),
        }
    }
}

impl Default for ClassSorterUtility {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilityExtension for ClassSorterUtility {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn process(&self, mut concepts: ComponentConcept) -> ExtensionResult<ComponentConcept> {
        concepts.styling.static_classes.sort();
        Ok(concepts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::EventConcept;

    #[test]
    fn tagger_appends_summary_attribute() {
        let mut concepts = ComponentConcept::default();
        concepts.events.push(EventConcept {
            name: "click".to_string(),
            handler: "go".to_string(),
            params: vec![],
            modifiers: vec![],
            node_id: "0".to_string(),
        });

        let tagged = ConceptTaggerUtility::new().process(concepts).unwrap();
        let attr = tagged.attributes.last().unwrap();
        assert_eq!(attr.name, "data-concepts");
        assert_eq!(attr.value["events"], 1);
        assert_eq!(attr.value["slots"], 0);
    }

    #[test]
    fn sorter_orders_static_classes() {
        let mut concepts = ComponentConcept::default();
        concepts.styling.static_classes =
            vec!["zeta".to_string(), "alpha".to_string(), "mid".to_string()];

        let sorted = ClassSorterUtility::new().process(concepts).unwrap();
        assert_eq!(sorted.styling.static_classes, vec!["alpha", "mid", "zeta"]);
    }
}
