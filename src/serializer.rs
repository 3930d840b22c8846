//! Framework-neutral HTML serialization
//!
//! Used when no framework extension is active: the tree is emitted as plain
//! HTML with structural nodes preserved as comment markers, so nothing is
//! silently dropped from the fallback output.

use lazy_static::lazy_static;
use serde_json::Value;
use std::collections::HashSet;

use crate::ir::{ElementNode, TemplateNode};
use crate::style::StyleEngine;

lazy_static! {
    static ref VOID_ELEMENTS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        for tag in [
            "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
            "param", "source", "track", "wbr",
        ] {
            s.insert(tag);
        }
        s
    };
}

pub struct HtmlSerializer<'a> {
    /// When set, resolved base declarations are injected as `style`
    /// attributes during serialization.
    engine: Option<&'a StyleEngine>,
}

impl<'a> HtmlSerializer<'a> {
    pub fn new() -> Self {
        HtmlSerializer { engine: None }
    }

    pub fn with_inline_styles(engine: &'a StyleEngine) -> Self {
        HtmlSerializer {
            engine: Some(engine),
        }
    }

    pub fn serialize(&self, nodes: &[TemplateNode]) -> String {
        let mut output = String::new();
        self.serialize_nodes(nodes, 0, &mut output);
        output.trim_end().to_string()
    }

    fn serialize_nodes(&self, nodes: &[TemplateNode], depth: usize, output: &mut String) {
        for node in nodes {
            self.serialize_node(node, depth, output);
        }
    }

    fn serialize_node(&self, node: &TemplateNode, depth: usize, output: &mut String) {
        let pad = "  ".repeat(depth);
        match node {
            TemplateNode::Element(element) => self.serialize_element(element, depth, output),
            TemplateNode::Text(text) => {
                let value = text.value.trim();
                if !value.is_empty() {
                    output.push_str(&pad);
                    output.push_str(&escape_html(value));
                    output.push('\n');
                }
            }
            TemplateNode::Comment(comment) => {
                output.push_str(&format!("{}<!-- {} -->\n", pad, comment.value.trim()));
            }
            TemplateNode::Conditional(conditional) => {
                let condition = conditional
                    .condition
                    .as_deref()
                    .unwrap_or("")
                    .trim()
                    .to_string();
                output.push_str(&format!("{}<!-- if: {} -->\n", pad, condition));
                self.serialize_nodes(&conditional.then_children, depth + 1, output);
                if let Some(else_children) = &conditional.else_children {
                    output.push_str(&format!("{}<!-- else -->\n", pad));
                    self.serialize_nodes(else_children, depth + 1, output);
                }
                output.push_str(&format!("{}<!-- /if -->\n", pad));
            }
            TemplateNode::Iteration(iteration) => {
                let items = iteration.items.as_deref().unwrap_or("").trim();
                let item = iteration.item.as_deref().unwrap_or("").trim();
                output.push_str(&format!("{}<!-- each: {} in {} -->\n", pad, item, items));
                self.serialize_nodes(&iteration.children, depth + 1, output);
                output.push_str(&format!("{}<!-- /each -->\n", pad));
            }
            TemplateNode::Slot(slot) => {
                let name_attr = match slot.name.as_deref() {
                    Some(name) if name != "default" => format!(" name=\"{}\"", name),
                    _ => String::new(),
                };
                match &slot.fallback {
                    Some(fallback) if !fallback.is_empty() => {
                        output.push_str(&format!("{}<slot{}>\n", pad, name_attr));
                        self.serialize_nodes(fallback, depth + 1, output);
                        output.push_str(&format!("{}</slot>\n", pad));
                    }
                    _ => output.push_str(&format!("{}<slot{}></slot>\n", pad, name_attr)),
                }
            }
            TemplateNode::Fragment(fragment) => {
                self.serialize_nodes(&fragment.children, depth, output);
            }
            TemplateNode::Unknown => {}
        }
    }

    fn serialize_element(&self, element: &ElementNode, depth: usize, output: &mut String) {
        let pad = "  ".repeat(depth);
        let mut attrs = Vec::new();
        let mut style_parts = Vec::new();

        for (name, value) in &element.attributes {
            let text = attribute_value(value);
            if name == "style" {
                style_parts.push(text);
            } else {
                attrs.push(format!("{}=\"{}\"", name, escape_html(&text)));
            }
        }
        if let Some(engine) = self.engine {
            if let Some(inline) = engine.get_inline_styles(element) {
                style_parts.push(inline);
            }
        }
        if !style_parts.is_empty() {
            attrs.push(format!("style=\"{}\"", escape_html(&style_parts.join("; "))));
        }
        // Expression attributes keep their expression visible in the
        // fallback output, minus directive sigils.
        for (name, expression) in &element.expression_attributes {
            let plain = name
                .strip_prefix("on:")
                .unwrap_or(name)
                .trim_start_matches([':', '@']);
            attrs.push(format!(
                "{}=\"{{{}}}\"",
                plain,
                escape_html(expression)
            ));
        }

        let attr_text = if attrs.is_empty() {
            String::new()
        } else {
            format!(" {}", attrs.join(" "))
        };

        if VOID_ELEMENTS.contains(element.tag.as_str()) {
            output.push_str(&format!("{}<{}{}>\n", pad, element.tag, attr_text));
            return;
        }

        if element.children.is_empty() {
            output.push_str(&format!("{}<{tag}{}></{tag}>\n", pad, attr_text, tag = element.tag));
        } else {
            output.push_str(&format!("{}<{}{}>\n", pad, element.tag, attr_text));
            self.serialize_nodes(&element.children, depth + 1, output);
            output.push_str(&format!("{}</{}>\n", pad, element.tag));
        }
    }
}

impl Default for HtmlSerializer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn attribute_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
