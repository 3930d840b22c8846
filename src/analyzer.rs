//! Template analyzer for the weft compiler
//!
//! Walks the node tree once, pre-order, and produces the `ComponentConcept`
//! aggregate: events, styling, conditionals, iterations, slots and generic
//! attributes. Which categories are extracted is caller-configurable. A node
//! missing a required field is omitted with a warning; extraction always
//! continues with its siblings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::{ErrorCollector, Stage};
use crate::events::{match_event_attribute, parse_handler_params, TargetSyntax};
use crate::ir::{
    AttributeConcept, ComponentConcept, ConditionalConcept, ElementNode, EventConcept,
    IterationConcept, SlotConcept, TemplateNode,
};

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerOptions {
    pub extract_events: bool,
    pub extract_styling: bool,
    pub extract_conditionals: bool,
    pub extract_iterations: bool,
    pub extract_slots: bool,
    pub extract_attributes: bool,
    /// Ordered event-syntax pattern list; first match claims the attribute.
    pub event_patterns: Vec<TargetSyntax>,
    /// Attribute names never emitted as generic attribute concepts.
    pub ignore_attributes: Vec<String>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            extract_events: true,
            extract_styling: true,
            extract_conditionals: true,
            extract_iterations: true,
            extract_slots: true,
            extract_attributes: true,
            event_patterns: vec![TargetSyntax::React, TargetSyntax::Vue, TargetSyntax::Svelte],
            ignore_attributes: Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANALYZER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct TemplateAnalyzer {
    errors: ErrorCollector,
}

impl TemplateAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Take the accumulated warnings, leaving the analyzer clean.
    pub fn take_errors(&mut self) -> ErrorCollector {
        std::mem::take(&mut self.errors)
    }

    /// Deterministic for a given tree and option set.
    pub fn extract_concepts(
        &mut self,
        nodes: &[TemplateNode],
        options: &AnalyzerOptions,
    ) -> ComponentConcept {
        let mut concept = ComponentConcept::default();
        self.walk(nodes, "", options, &mut concept);
        concept
    }

    fn walk(
        &mut self,
        nodes: &[TemplateNode],
        path: &str,
        options: &AnalyzerOptions,
        concept: &mut ComponentConcept,
    ) {
        for (index, node) in nodes.iter().enumerate() {
            let (node_id, node_path) = crate::ir::node_identity(node, path, index);

            match node {
                TemplateNode::Element(element) => {
                    self.extract_element(element, &node_id, options, concept);
                    self.walk(&element.children, &node_path, options, concept);
                }
                TemplateNode::Conditional(conditional) => {
                    match &conditional.condition {
                        Some(condition) if !condition.trim().is_empty() => {
                            if options.extract_conditionals {
                                concept.conditionals.push(ConditionalConcept {
                                    condition: condition.clone(),
                                    then_children: conditional.then_children.clone(),
                                    else_children: conditional.else_children.clone(),
                                });
                            }
                        }
                        _ => self.errors.node_warning(
                            Stage::Analysis,
                            node_id,
                            "conditional node is missing its condition; node omitted",
                        ),
                    }
                    self.walk(&conditional.then_children, &node_path, options, concept);
                    if let Some(else_children) = &conditional.else_children {
                        self.walk(else_children, &node_path, options, concept);
                    }
                }
                TemplateNode::Iteration(iteration) => {
                    match (&iteration.items, &iteration.item) {
                        (Some(items), Some(item))
                            if !items.trim().is_empty() && !item.trim().is_empty() =>
                        {
                            if options.extract_iterations {
                                concept.iterations.push(IterationConcept {
                                    items: items.clone(),
                                    item: item.clone(),
                                    index: iteration.index.clone(),
                                    key: iteration.key.clone(),
                                    children: iteration.children.clone(),
                                });
                            }
                        }
                        _ => self.errors.node_warning(
                            Stage::Analysis,
                            node_id,
                            "iteration node is missing its items or item binding; node omitted",
                        ),
                    }
                    self.walk(&iteration.children, &node_path, options, concept);
                }
                TemplateNode::Slot(slot) => {
                    match &slot.name {
                        Some(name) if !name.trim().is_empty() => {
                            if options.extract_slots {
                                concept.slots.push(SlotConcept {
                                    name: name.clone(),
                                    fallback: slot.fallback.clone(),
                                });
                            }
                        }
                        _ => self.errors.node_warning(
                            Stage::Analysis,
                            node_id,
                            "slot node is missing its name; node omitted",
                        ),
                    }
                    if let Some(fallback) = &slot.fallback {
                        self.walk(fallback, &node_path, options, concept);
                    }
                }
                TemplateNode::Fragment(fragment) => {
                    self.walk(&fragment.children, &node_path, options, concept);
                }
                TemplateNode::Text(_) | TemplateNode::Comment(_) => {}
                TemplateNode::Unknown => {
                    self.errors.node_warning(
                        Stage::Analysis,
                        node_id,
                        "unknown node type for structural extraction",
                    );
                }
            }
        }
    }

    /// Claim each element attribute for exactly one category. Recognition is
    /// independent of the gating flags, so disabling a category never spills
    /// its attributes into another one.
    fn extract_element(
        &mut self,
        element: &ElementNode,
        node_id: &str,
        options: &AnalyzerOptions,
        concept: &mut ComponentConcept,
    ) {
        // Static attributes: class and style are styling's; the rest are generic.
        for (name, value) in &element.attributes {
            match name.as_str() {
                "class" => {
                    if options.extract_styling {
                        if let Some(text) = value.as_str() {
                            concept
                                .styling
                                .static_classes
                                .extend(text.split_whitespace().map(str::to_string));
                        }
                    }
                }
                "style" => {
                    if options.extract_styling {
                        if let Some(text) = value.as_str() {
                            parse_inline_style(text, &mut concept.styling.inline_styles);
                        }
                    }
                }
                _ => {
                    if options.extract_attributes
                        && !options.ignore_attributes.iter().any(|n| n == name)
                    {
                        concept.attributes.push(AttributeConcept {
                            name: name.clone(),
                            value: value.clone(),
                            is_expression: false,
                        });
                    }
                }
            }
        }

        // Expression attributes: events first, then class/style bindings,
        // then generic expression attributes.
        let mut winning_class: Option<&String> = None;
        for (name, expression) in &element.expression_attributes {
            if let Some((event_name, modifiers)) =
                match_event_attribute(name, &options.event_patterns)
            {
                if options.extract_events {
                    concept.events.push(EventConcept {
                        name: event_name,
                        handler: expression.clone(),
                        params: parse_handler_params(expression),
                        modifiers,
                        node_id: node_id.to_string(),
                    });
                }
                continue;
            }

            match name.as_str() {
                ":class" | "className" | "class" => {
                    if options.extract_styling {
                        concept.styling.dynamic_classes.push(expression.clone());
                        // Colon-prefixed binding wins the style-binding slot.
                        match (name.as_str(), winning_class) {
                            (":class", _) | (_, None) => winning_class = Some(expression),
                            _ => {}
                        }
                    }
                }
                ":style" | "style" => {
                    if options.extract_styling {
                        concept
                            .styling
                            .style_bindings
                            .insert("style".to_string(), expression.clone());
                    }
                }
                _ => {
                    if options.extract_attributes
                        && !options.ignore_attributes.iter().any(|n| n == name)
                    {
                        concept.attributes.push(AttributeConcept {
                            name: name.clone(),
                            value: Value::String(expression.clone()),
                            is_expression: true,
                        });
                    }
                }
            }
        }

        if options.extract_styling {
            if let Some(winner) = winning_class {
                concept
                    .styling
                    .style_bindings
                    .insert("class".to_string(), winner.clone());
            }
        }
    }
}

/// Parse a semicolon-delimited `prop: value` string into the inline style map.
fn parse_inline_style(text: &str, styles: &mut indexmap::IndexMap<String, String>) {
    for declaration in text.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        if let Some((property, value)) = declaration.split_once(':') {
            let property = property.trim();
            let value = value.trim();
            if !property.is_empty() && !value.is_empty() {
                styles.insert(property.to_string(), value.to_string());
            }
        }
    }
}
