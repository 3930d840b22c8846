//! React-like backend
//!
//! Emits a function component in JSX. Event attribute names come from the
//! normalizer (`click` → `onClick`); modifiers cannot live in a React
//! attribute name, so `process_events` re-encodes them into the handler
//! expression while the modifier list itself is passed through untouched.

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

pub struct ReactExtension {
    metadata: ExtensionMetadata,
}

impl ReactExtension {
    pub fn new() -> Self {
        ReactExtension {
            metadata: ExtensionMetadata::new(
                "react",
                "React Framework",
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
                Some(format!("{}{{/* {} */}}", pad, comment.value.trim()))
            }
            TemplateNode::Conditional(conditional) => {
                let condition = conditional.condition.as_deref()?.trim();
                if condition.is_empty() {
                    return None;
                }
                let then_body =
                    self.render_children(&conditional.then_children, concepts, context, path, depth + 1);
                match &conditional.else_children {
                    Some(else_children) => {
                        let else_body =
                            self.render_children(else_children, concepts, context, path, depth + 1);
                        Some(format!(
                            "{pad}{{{condition} ? (\n{then}\n{pad}) : (\n{otherwise}\n{pad})}}",
                            pad = pad,
                            condition = condition,
                            then = then_body.join("\n"),
                            otherwise = else_body.join("\n"),
                        ))
                    }
                    None => Some(format!(
                        "{pad}{{{condition} && (\n{then}\n{pad})}}",
                        pad = pad,
                        condition = condition,
                        then = then_body.join("\n"),
                    )),
                }
            }
            TemplateNode::Iteration(iteration) => {
                let items = iteration.items.as_deref()?.trim();
                let item = iteration.item.as_deref()?.trim();
                if items.is_empty() || item.is_empty() {
                    return None;
                }
                let params = match &iteration.index {
                    Some(index) => format!("({}, {})", item, index),
                    None => format!("({})", item),
                };
                let key = iteration
                    .key
                    .clone()
                    .or_else(|| iteration.index.clone());
                let body =
                    self.render_children(&iteration.children, concepts, context, path, depth + 2);
                let (open, close) = match key {
                    Some(key) => (
                        format!("<React.Fragment key={{{}}}>", key),
                        "</React.Fragment>".to_string(),
                    ),
                    None => ("<>".to_string(), "</>".to_string()),
                };
                Some(format!(
                    "{pad}{{{items}.map({params} => (\n{pad}  {open}\n{body}\n{pad}  {close}\n{pad}))}}",
                    pad = pad,
                    items = items,
                    params = params,
                    open = open,
                    body = body.join("\n"),
                    close = close,
                ))
            }
            TemplateNode::Slot(slot) => {
                let name = slot.name.as_deref().unwrap_or("children");
                let accessor = if name == "children" || name == "default" {
                    "props.children".to_string()
                } else {
                    format!("props.{}", camel_case(name))
                };
                match &slot.fallback {
                    Some(fallback) if !fallback.is_empty() => {
                        let body =
                            self.render_children(fallback, concepts, context, path, depth + 1);
                        Some(format!(
                            "{pad}{{{accessor} || (\n{body}\n{pad})}}",
                            pad = pad,
                            accessor = accessor,
                            body = body.join("\n"),
                        ))
                    }
                    _ => Some(format!("{}{{{}}}", pad, accessor)),
                }
            }
            TemplateNode::Fragment(fragment) => {
                let body = self.render_children(&fragment.children, concepts, context, path, depth + 1);
                Some(format!(
                    "{pad}<>\n{body}\n{pad}</>",
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
            match name.as_str() {
                "class" => attrs.push(format!("className=\"{}\"", attribute_text(value))),
                "for" => attrs.push(format!("htmlFor=\"{}\"", attribute_text(value))),
                "style" => style_parts.push(attribute_text(value)),
                _ => attrs.push(format!("{}=\"{}\"", name, attribute_text(value))),
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
                    attrs.push(format!("className={{{}}}", expression))
                }
                ":style" | "style" => attrs.push(format!("style={{{}}}", expression)),
                _ => attrs.push(format!("{}={{{}}}", name, expression)),
            }
        }

        for event in events_for(&concepts.events, id) {
            let normalized = to_framework_attribute(event, TargetSyntax::React);
            attrs.push(format!(
                "{}={{{}}}",
                normalized.attribute_name,
                jsx_handler(&event.handler)
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

impl Default for ReactExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkExtension for ReactExtension {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn target_syntax(&self) -> TargetSyntax {
        TargetSyntax::React
    }

    /// Modifiers are re-encoded into the handler expression; the modifier
    /// list stays on the concept untouched.
    fn process_events(&self, events: &[EventConcept]) -> ExtensionResult<Vec<EventConcept>> {
        Ok(events
            .iter()
            .map(|event| {
                let mut event = event.clone();
                if !event.modifiers.is_empty() {
                    event.handler = wrap_handler_with_modifiers(&event.handler, &event.modifiers);
                }
                event
            })
            .collect())
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
        Ok(attributes
            .iter()
            .map(|attribute| {
                let mut attribute = attribute.clone();
                attribute.name = match attribute.name.as_str() {
                    "class" => "className".to_string(),
                    "for" => "htmlFor".to_string(),
                    other => other.to_string(),
                };
                attribute
            })
            .collect())
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
        source.push_str("import React from 'react';\n");
        if let Some(component) = context.component {
            for import in &component.imports {
                source.push_str(import);
                source.push('\n');
            }
        }
        source.push('\n');
        source.push_str(&format!("export function {}(props) {{\n", name));
        if let Some(script) = context.component.and_then(|c| c.script.as_deref()) {
            for line in script.lines() {
                source.push_str("  ");
                source.push_str(line);
                source.push('\n');
            }
            source.push('\n');
        }
        source.push_str("  return (\n");

        let roots = self.render_children(context.nodes, concepts, context, "", 2);
        if roots.is_empty() {
            source.push_str("    null\n");
        } else if roots.len() > 1 {
            source.push_str("    <>\n");
            let nested: Vec<String> = roots.iter().map(|chunk| indent_chunk(chunk)).collect();
            source.push_str(&nested.join("\n"));
            source.push_str("\n    </>\n");
        } else {
            source.push_str(&roots.join("\n"));
            source.push('\n');
        }

        source.push_str("  );\n}\n");
        Ok(source)
    }
}

/// Shift an already-rendered chunk one level deeper, for wrapping multiple
/// roots in a fragment without rendering the tree a second time.
fn indent_chunk(chunk: &str) -> String {
    chunk
        .lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `save(item)` → `() => save(item)`; bare identifiers and arrows pass through.
fn jsx_handler(handler: &str) -> String {
    let trimmed = handler.trim();
    if trimmed.contains("=>") || !trimmed.contains('(') {
        trimmed.to_string()
    } else {
        format!("() => {}", trimmed)
    }
}

fn wrap_handler_with_modifiers(handler: &str, modifiers: &[String]) -> String {
    let mut statements = Vec::new();
    for modifier in modifiers {
        match modifier.as_str() {
            "prevent" => statements.push("event.preventDefault();".to_string()),
            "stop" => statements.push("event.stopPropagation();".to_string()),
            // Remaining modifiers have no direct React encoding; the
            // modifier list on the concept still carries them.
            _ => {}
        }
    }
    let trimmed = handler.trim();
    let call = if trimmed.contains('(') {
        format!("{};", trimmed.trim_end_matches(';'))
    } else {
        format!("{}(event);", trimmed)
    };
    statements.push(call);
    format!("(event) => {{ {} }}", statements.join(" "))
}

/// `header-area` → `headerArea`.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' || c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
