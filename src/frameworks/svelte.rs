//! Svelte-like backend
//!
//! Emits a `<script>` block with `export let` props followed by template
//! markup with block syntax (`{#if}`, `{#each}`). Event modifiers ride the
//! attribute name, so the transform operations are pass-through.

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

pub struct SvelteExtension {
    metadata: ExtensionMetadata,
}

impl SvelteExtension {
    pub fn new() -> Self {
        SvelteExtension {
            metadata: ExtensionMetadata::new(
                "svelte",
                "Svelte Framework",
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
                    "{pad}{{#if {condition}}}\n{then}",
                    pad = pad,
                    condition = condition,
                    then = then_body.join("\n"),
                );
                if let Some(else_children) = &conditional.else_children {
                    let else_body =
                        self.render_children(else_children, concepts, context, path, depth + 1);
                    out.push_str(&format!(
                        "\n{pad}{{:else}}\n{body}",
                        pad = pad,
                        body = else_body.join("\n"),
                    ));
                }
                out.push_str(&format!("\n{}{{/if}}", pad));
                Some(out)
            }
            TemplateNode::Iteration(iteration) => {
                let items = iteration.items.as_deref()?.trim();
                let item = iteration.item.as_deref()?.trim();
                if items.is_empty() || item.is_empty() {
                    return None;
                }
                let mut head = format!("{} as {}", items, item);
                if let Some(index) = &iteration.index {
                    head.push_str(&format!(", {}", index));
                }
                if let Some(key) = &iteration.key {
                    head.push_str(&format!(" ({})", key));
                }
                let body =
                    self.render_children(&iteration.children, concepts, context, path, depth + 1);
                Some(format!(
                    "{pad}{{#each {head}}}\n{body}\n{pad}{{/each}}",
                    pad = pad,
                    head = head,
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
                let body = self.render_children(&fragment.children, concepts, context, path, depth);
                if body.is_empty() {
                    None
                } else {
                    Some(body.join("\n"))
                }
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
                    attrs.push(format!("class={{{}}}", expression))
                }
                ":style" | "style" => attrs.push(format!("style={{{}}}", expression)),
                other => {
                    let bound = other.strip_prefix(':').unwrap_or(other);
                    attrs.push(format!("{}={{{}}}", bound, expression));
                }
            }
        }

        for event in events_for(&concepts.events, id) {
            let normalized = to_framework_attribute(event, TargetSyntax::Svelte);
            attrs.push(format!(
                "{}={{{}}}",
                normalized.attribute_name,
                svelte_handler(&event.handler)
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

impl Default for SvelteExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkExtension for SvelteExtension {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn target_syntax(&self) -> TargetSyntax {
        TargetSyntax::Svelte
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
        let mut source = String::new();
        let mut script = String::new();
        if let Some(component) = context.component {
            for import in &component.imports {
                script.push_str("  ");
                script.push_str(import);
                script.push('\n');
            }
            for (prop, default) in &component.props {
                if default.is_null() {
                    script.push_str(&format!("  export let {};\n", prop));
                } else {
                    script.push_str(&format!("  export let {} = {};\n", prop, default));
                }
            }
            if let Some(body) = component.script.as_deref() {
                if !script.is_empty() {
                    script.push('\n');
                }
                for line in body.lines() {
                    script.push_str("  ");
                    script.push_str(line);
                    script.push('\n');
                }
            }
        }
        if !script.is_empty() {
            source.push_str("<script>\n");
            source.push_str(&script);
            source.push_str("</script>\n\n");
        }

        let body = self.render_children(context.nodes, concepts, context, "", 0);
        source.push_str(&body.join("\n"));
        source.push('\n');
        Ok(source)
    }
}

/// Svelte handlers must be function values; wrap call expressions.
fn svelte_handler(handler: &str) -> String {
    let trimmed = handler.trim();
    if trimmed.contains("=>") || !trimmed.contains('(') {
        trimmed.to_string()
    } else {
        format!("() => {}", trimmed)
    }
}
