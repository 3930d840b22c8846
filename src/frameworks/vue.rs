//! Vue-like backend
//!
//! Emits a single-file component: `<template>` markup plus an options-object
//! `<script>` block. Directives carry the structural concepts directly, so
//! the transform operations are pass-through and all target-specific
//! spelling happens at render time.

use crate::events::{to_framework_attribute, TargetSyntax};
use crate::extension::{
    ExtensionKind, ExtensionMetadata, ExtensionResult, FrameworkExtension, RenderContext,
};
use crate::ir::{
    node_identity, AttributeConcept, ComponentConcept, ConditionalConcept, ElementNode,
    EventConcept, IterationConcept, SlotConcept, TemplateNode,
};
use crate::style::StyleFormat;

use super::{attribute_text, events_for, is_event_attribute};

pub struct VueExtension {
    metadata: ExtensionMetadata,
}

impl VueExtension {
    pub fn new() -> Self {
        VueExtension {
            metadata: ExtensionMetadata::new(
                "vue",
                "Vue Framework",
                "1.0.0",
                ExtensionKind::Framework,
            ),
        }
    }

    fn render_children(
        &self,
        nodes: &[TemplateNode],
        concepts: &ComponentConcept,
        context: &RenderContext,
        parent_path: &str,
        depth: usize,
    ) -> Vec<String> {
        let mut chunks = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            let (id, path) = node_identity(node, parent_path, index);
            if let Some(chunk) = self.render_node(node, &id, &path, concepts, context, depth) {
                chunks.push(chunk);
            }
        }
        chunks
    }

    fn render_node(
        &self,
        node: &TemplateNode,
        id: &str,
        path: &str,
        concepts: &ComponentConcept,
        context: &RenderContext,
        depth: usize,
    ) -> Option<String> {
        let pad = "  ".repeat(depth);
        match node {
            TemplateNode::Element(element) => {
                Some(self.render_element(element, id, path, concepts, context, depth))
            }
            TemplateNode::Text(text) => {
                let value = text.value.trim();
                if value.is_empty() {
                    None
                } else {
                    Some(format!("{}{}", pad, value))
                }
            }
            TemplateNode::Comment(comment) => {
                Some(format!("{}<!-- {} -->", pad, comment.value.trim()))
            }
            TemplateNode::Conditional(conditional) => {
                let condition = conditional.condition.as_deref()?.trim();
                if condition.is_empty() {
                    return None;
                }
                let then_body =
                    self.render_children(&conditional.then_children, concepts, context, path, depth + 1);
                let mut out = format!(
                    "{pad}<template v-if=\"{condition}\">\n{then}\n{pad}</template>",
                    pad = pad,
                    condition = condition,
                    then = then_body.join("\n"),
                );
                if let Some(else_children) = &conditional.else_children {
                    let else_body =
                        self.render_children(else_children, concepts, context, path, depth + 1);
                    out.push_str(&format!(
                        "\n{pad}<template v-else>\n{body}\n{pad}</template>",
                        pad = pad,
                        body = else_body.join("\n"),
                    ));
                }
                Some(out)
            }
            TemplateNode::Iteration(iteration) => {
                let items = iteration.items.as_deref()?.trim();
                let item = iteration.item.as_deref()?.trim();
                if items.is_empty() || item.is_empty() {
                    return None;
                }
                let binding = match &iteration.index {
                    Some(index) => format!("({}, {}) in {}", item, index, items),
                    None => format!("{} in {}", item, items),
                };
                let key = iteration
                    .key
                    .clone()
                    .or_else(|| iteration.index.clone());
                let key_attr = match key {
                    Some(key) => format!(" :key=\"{}\"", key),
                    None => String::new(),
                };
                let body =
                    self.render_children(&iteration.children, concepts, context, path, depth + 1);
                Some(format!(
                    "{pad}<template v-for=\"{binding}\"{key}>\n{body}\n{pad}</template>",
                    pad = pad,
                    binding = binding,
                    key = key_attr,
                    body = body.join("\n"),
                ))
            }
            TemplateNode::Slot(slot) => {
                let name_attr = match slot.name.as_deref() {
                    Some(name) if name != "default" => format!(" name=\"{}\"", name),
                    _ => String::new(),
                };
                match &slot.fallback {
                    Some(fallback) if !fallback.is_empty() => {
                        let body =
                            self.render_children(fallback, concepts, context, path, depth + 1);
                        Some(format!(
                            "{pad}<slot{name}>\n{body}\n{pad}</slot>",
                            pad = pad,
                            name = name_attr,
                            body = body.join("\n"),
                        ))
                    }
                    _ => Some(format!("{}<slot{} />", pad, name_attr)),
                }
            }
            TemplateNode::Fragment(fragment) => {
                let body = self.render_children(&fragment.children, concepts, context, path, depth + 1);
                Some(format!(
                    "{pad}<template>\n{body}\n{pad}</template>",
                    pad = pad,
                    body = body.join("\n")
                ))
            }
            TemplateNode::Unknown => None,
        }
    }

    fn render_element(
        &self,
        element: &ElementNode,
        id: &str,
        path: &str,
        concepts: &ComponentConcept,
        context: &RenderContext,
        depth: usize,
    ) -> String {
        let pad = "  ".repeat(depth);
        let mut attrs = Vec::new();
        let mut style_parts = Vec::new();

        for (name, value) in &element.attributes {
            if name == "style" {
                style_parts.push(attribute_text(value));
            } else {
                attrs.push(format!("{}=\"{}\"", name, attribute_text(value)));
            }
        }

        if context.options.style_format == StyleFormat::Inline {
            if let Some(inline) = context.style_engine.get_inline_styles(element) {
                style_parts.push(inline);
            }
        }
        if !style_parts.is_empty() {
            attrs.push(format!("style=\"{}\"", style_parts.join("; ")));
        }

        for (name, expression) in &element.expression_attributes {
            if is_event_attribute(name, &context.options.analyzer.event_patterns) {
                continue;
            }
            match name.as_str() {
                ":class" | "className" | "class" => {
                    attrs.push(format!(":class=\"{}\"", expression))
                }
                ":style" | "style" => attrs.push(format!(":style=\"{}\"", expression)),
                other => {
                    let bound = other.strip_prefix(':').unwrap_or(other);
                    attrs.push(format!(":{}=\"{}\"", bound, expression));
                }
            }
        }

        for event in events_for(&concepts.events, id) {
            let normalized = to_framework_attribute(event, TargetSyntax::Vue);
            attrs.push(format!(
                "{}=\"{}\"",
                normalized.attribute_name, event.handler
            ));
        }

        let attr_text = if attrs.is_empty() {
            String::new()
        } else {
            format!(" {}", attrs.join(" "))
        };

        let children = self.render_children(&element.children, concepts, context, path, depth + 1);
        if children.is_empty() {
            format!("{}<{}{} />", pad, element.tag, attr_text)
        } else {
            format!(
                "{pad}<{tag}{attrs}>\n{body}\n{pad}</{tag}>",
                pad = pad,
                tag = element.tag,
                attrs = attr_text,
                body = children.join("\n"),
            )
        }
    }
}

impl Default for VueExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkExtension for VueExtension {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn target_syntax(&self) -> TargetSyntax {
        TargetSyntax::Vue
    }

    fn process_events(&self, events: &[EventConcept]) -> ExtensionResult<Vec<EventConcept>> {
        Ok(events.to_vec())
    }

    fn process_conditionals(
        &self,
        conditionals: &[ConditionalConcept],
    ) -> ExtensionResult<Vec<ConditionalConcept>> {
        Ok(conditionals.to_vec())
    }

    fn process_iterations(
        &self,
        iterations: &[IterationConcept],
    ) -> ExtensionResult<Vec<IterationConcept>> {
        Ok(iterations.to_vec())
    }

    fn process_slots(&self, slots: &[SlotConcept]) -> ExtensionResult<Vec<SlotConcept>> {
        Ok(slots.to_vec())
    }

    fn process_attributes(
        &self,
        attributes: &[AttributeConcept],
    ) -> ExtensionResult<Vec<AttributeConcept>> {
        Ok(attributes.to_vec())
    }

    fn render_component(
        &self,
        concepts: &ComponentConcept,
        context: &RenderContext,
    ) -> ExtensionResult<String> {
        let name = context
            .component
            .map(|c| c.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Component");

        let mut source = String::new();
        source.push_str("<template>\n");
        let body = self.render_children(context.nodes, concepts, context, "", 1);
        source.push_str(&body.join("\n"));
        source.push_str("\n</template>\n\n<script>\n");
        if let Some(component) = context.component {
            for import in &component.imports {
                source.push_str(import);
                source.push('\n');
            }
            if !component.imports.is_empty() {
                source.push('\n');
            }
        }
        source.push_str("export default {\n");
        source.push_str(&format!("  name: '{}',\n", name));
        if let Some(component) = context.component {
            if !component.props.is_empty() {
                let props: Vec<String> = component
                    .props
                    .keys()
                    .map(|key| format!("'{}'", key))
                    .collect();
                source.push_str(&format!("  props: [{}],\n", props.join(", ")));
            }
        }
        source.push_str("};\n");
        if let Some(script) = context.component.and_then(|c| c.script.as_deref()) {
            source.push('\n');
            source.push_str(script.trim_end());
            source.push('\n');
        }
        source.push_str("</script>\n");
        Ok(source)
    }
}
