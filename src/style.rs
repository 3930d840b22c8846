//! Style processing engine for the weft compiler
//!
//! Resolves a CSS selector per node, deep-merges structured style
//! declarations across nodes sharing a selector, and emits inline/CSS/SCSS
//! output. A styling plugin can rewrite selectors before storage and can
//! take over emission entirely. The selector → definition registry is scoped
//! to one render pass and cleared at the start of the next.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::diagnostics::{ErrorCollector, Stage};
use crate::extension::StylingExtension;
use crate::ir::{ElementNode, TemplateNode};

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATS & DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFormat {
    Inline,
    #[default]
    Css,
    Scss,
}

impl StyleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleFormat::Inline => "inline",
            StyleFormat::Css => "css",
            StyleFormat::Scss => "scss",
        }
    }
}

impl fmt::Display for StyleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(StyleFormat::Inline),
            "css" => Ok(StyleFormat::Css),
            "scss" => Ok(StyleFormat::Scss),
            other => Err(format!("unrecognized style format '{}'", other)),
        }
    }
}

/// One selector's merged style tree: flat declarations plus nested
/// media-query and pseudo-class blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefinition {
    pub declarations: IndexMap<String, String>,
    pub media: IndexMap<String, IndexMap<String, String>>,
    pub pseudo: IndexMap<String, IndexMap<String, String>>,
}

impl StyleDefinition {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.media.is_empty() && self.pseudo.is_empty()
    }

    /// Deep merge: nested media/pseudo maps merge per property with the
    /// incoming value winning; flat declarations overwrite directly.
    pub fn merge(&mut self, incoming: StyleDefinition) {
        for (property, value) in incoming.declarations {
            self.declarations.insert(property, value);
        }
        for (query, properties) in incoming.media {
            let entry = self.media.entry(query).or_default();
            for (property, value) in properties {
                entry.insert(property, value);
            }
        }
        for (pseudo, properties) in incoming.pseudo {
            let entry = self.pseudo.entry(pseudo).or_default();
            for (property, value) in properties {
                entry.insert(property, value);
            }
        }
    }
}

pub type StyleRegistry = IndexMap<String, StyleDefinition>;

// ═══════════════════════════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct StyleEngine {
    registry: StyleRegistry,
    /// Original selector → plugin-rewritten selector, recorded at storage
    /// time so per-node lookups find declarations stored under the rewrite.
    rewrites: IndexMap<String, String>,
    errors: ErrorCollector,
}

impl StyleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear registry and warnings; called at the start of each render pass.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.rewrites.clear();
        self.errors.clear();
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn take_errors(&mut self) -> ErrorCollector {
        std::mem::take(&mut self.errors)
    }

    /// Walk a tree feeding every element's structured style declaration into
    /// the registry, recursing through conditional/iteration/slot subtrees.
    pub fn process_tree(&mut self, nodes: &[TemplateNode], plugin: Option<&dyn StylingExtension>) {
        for node in nodes {
            match node {
                TemplateNode::Element(element) => {
                    self.process_node(element, plugin);
                    self.process_tree(&element.children, plugin);
                }
                TemplateNode::Conditional(conditional) => {
                    self.process_tree(&conditional.then_children, plugin);
                    if let Some(else_children) = &conditional.else_children {
                        self.process_tree(else_children, plugin);
                    }
                }
                TemplateNode::Iteration(iteration) => {
                    self.process_tree(&iteration.children, plugin);
                }
                TemplateNode::Slot(slot) => {
                    if let Some(fallback) = &slot.fallback {
                        self.process_tree(fallback, plugin);
                    }
                }
                TemplateNode::Fragment(fragment) => {
                    self.process_tree(&fragment.children, plugin);
                }
                _ => {}
            }
        }
    }

    /// No-op unless the node carries a structured style declaration. Two
    /// nodes resolving to the same selector accumulate into one combined
    /// rule set; the later node's values win per property.
    pub fn process_node(&mut self, element: &ElementNode, plugin: Option<&dyn StylingExtension>) {
        let styles = match &element.styles {
            Some(styles) => styles,
            None => return,
        };

        let original = match resolve_selector(element) {
            Some(selector) => selector,
            None => {
                self.errors.node_warning(
                    Stage::Styling,
                    element.id.clone().unwrap_or_else(|| element.tag.clone()),
                    "no selector could be resolved for styled node; styling skipped",
                );
                return;
            }
        };

        let mut selector = original.clone();
        if let Some(plugin) = plugin {
            if let Some(rewritten) = plugin.rewrite_selector(&selector, element) {
                selector = rewritten;
            }
        }
        if selector != original {
            self.rewrites.insert(original, selector.clone());
        }

        let incoming = match self.definition_from_value(styles, &selector) {
            Some(definition) => definition,
            None => return,
        };

        self.registry.entry(selector).or_default().merge(incoming);
    }

    fn definition_from_value(&mut self, value: &Value, selector: &str) -> Option<StyleDefinition> {
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                self.errors.node_warning(
                    Stage::Styling,
                    selector,
                    "structured style declaration is not an object; styling skipped",
                );
                return None;
            }
        };

        let mut definition = StyleDefinition::default();
        for (key, nested) in object {
            if key.starts_with("@media") {
                match nested.as_object() {
                    Some(properties) => {
                        let entry = definition.media.entry(key.clone()).or_default();
                        for (property, v) in properties {
                            entry.insert(property.clone(), scalar_to_string(v));
                        }
                    }
                    None => self.errors.node_warning(
                        Stage::Styling,
                        selector,
                        format!("'{}' block is not an object; ignored", key),
                    ),
                }
            } else if key.starts_with(':') {
                match nested.as_object() {
                    Some(properties) => {
                        let entry = definition.pseudo.entry(key.clone()).or_default();
                        for (property, v) in properties {
                            entry.insert(property.clone(), scalar_to_string(v));
                        }
                    }
                    None => self.errors.node_warning(
                        Stage::Styling,
                        selector,
                        format!("'{}' block is not an object; ignored", key),
                    ),
                }
            } else {
                definition
                    .declarations
                    .insert(key.clone(), scalar_to_string(nested));
            }
        }
        Some(definition)
    }

    /// Only the node's own base declarations, as `prop: value; prop2: value2`.
    /// Nested at-rule/pseudo content never leaks into the inline string. The
    /// lookup follows any selector rewrite a plugin applied before storage.
    pub fn get_inline_styles(&self, element: &ElementNode) -> Option<String> {
        let resolved = resolve_selector(element)?;
        let selector = self.rewrites.get(&resolved).unwrap_or(&resolved);
        let definition = self.registry.get(selector)?;
        if definition.declarations.is_empty() {
            return None;
        }
        Some(render_declarations(&definition.declarations))
    }

    /// Emit the pass's stylesheet. Plugin output, whole or per selector,
    /// is used verbatim when non-empty; otherwise the built-in generators
    /// dispatch on the requested format.
    pub fn generate_output(
        &self,
        format: StyleFormat,
        plugin: Option<&dyn StylingExtension>,
    ) -> String {
        if let Some(plugin) = plugin {
            if let Some(output) = plugin.emit(&self.registry, format) {
                if !output.is_empty() {
                    return output;
                }
            }

            let mut rules = Vec::new();
            for (selector, definition) in &self.registry {
                if let Some(rule) = plugin.emit_rule(selector, definition, format) {
                    if !rule.is_empty() {
                        rules.push(rule);
                    }
                }
            }
            if !rules.is_empty() {
                return rules.join("\n");
            }
        }

        match format {
            StyleFormat::Inline => self.generate_inline_block(),
            StyleFormat::Css => self.generate_css(),
            StyleFormat::Scss => self.generate_scss(),
        }
    }

    /// Inline mode: base declarations go onto the markup per node, so the
    /// emitted block carries only pseudo-class and media-query sub-rules.
    fn generate_inline_block(&self) -> String {
        let mut output = String::new();
        for (selector, definition) in &self.registry {
            for (pseudo, properties) in &definition.pseudo {
                push_rule(&mut output, &format!("{}{}", selector, pseudo), properties, 0);
            }
        }
        for (query, selectors) in self.collect_media() {
            output.push_str(&query);
            output.push_str(" {\n");
            for (selector, properties) in selectors {
                push_rule(&mut output, selector, properties, 1);
            }
            output.push_str("}\n\n");
        }
        output.trim_end().to_string()
    }

    fn generate_css(&self) -> String {
        let mut output = String::new();
        for (selector, definition) in &self.registry {
            if !definition.declarations.is_empty() {
                push_rule(&mut output, selector, &definition.declarations, 0);
            }
            for (pseudo, properties) in &definition.pseudo {
                push_rule(&mut output, &format!("{}{}", selector, pseudo), properties, 0);
            }
        }
        // One block per distinct query, aggregating every selector under it.
        for (query, selectors) in self.collect_media() {
            output.push_str(&query);
            output.push_str(" {\n");
            for (selector, properties) in selectors {
                push_rule(&mut output, selector, properties, 1);
            }
            output.push_str("}\n\n");
        }
        output.trim_end().to_string()
    }

    fn generate_scss(&self) -> String {
        let mut output = String::new();
        for (selector, definition) in &self.registry {
            output.push_str(selector);
            output.push_str(" {\n");
            for (property, value) in &definition.declarations {
                output.push_str(&format!("  {}: {};\n", to_kebab_case(property), value));
            }
            for (pseudo, properties) in &definition.pseudo {
                output.push_str(&format!("\n  &{} {{\n", pseudo));
                for (property, value) in properties {
                    output.push_str(&format!("    {}: {};\n", to_kebab_case(property), value));
                }
                output.push_str("  }\n");
            }
            for (query, properties) in &definition.media {
                output.push_str(&format!("\n  {} {{\n", query));
                for (property, value) in properties {
                    output.push_str(&format!("    {}: {};\n", to_kebab_case(property), value));
                }
                output.push_str("  }\n");
            }
            output.push_str("}\n\n");
        }
        output.trim_end().to_string()
    }

    fn collect_media(&self) -> IndexMap<&String, Vec<(&String, &IndexMap<String, String>)>> {
        let mut media: IndexMap<&String, Vec<(&String, &IndexMap<String, String>)>> =
            IndexMap::new();
        for (selector, definition) in &self.registry {
            for (query, properties) in &definition.media {
                media.entry(query).or_default().push((selector, properties));
            }
        }
        media
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTOR & EMISSION HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Deterministic selector policy: first whitespace-delimited token of the
/// `class` attribute, `.`-prefixed, else the tag name. Downstream CSS output
/// and inline lookup both depend on this staying stable across calls.
pub fn resolve_selector(element: &ElementNode) -> Option<String> {
    if let Some(class) = element.attributes.get("class").and_then(Value::as_str) {
        if let Some(first) = class.split_whitespace().next() {
            return Some(format!(".{}", first));
        }
    }
    if element.tag.trim().is_empty() {
        None
    } else {
        Some(element.tag.clone())
    }
}

/// `fontSize` → `font-size`. Values are emitted as-is.
pub fn to_kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn render_declarations(declarations: &IndexMap<String, String>) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {}", to_kebab_case(property), value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn push_rule(
    output: &mut String,
    selector: &str,
    properties: &IndexMap<String, String>,
    depth: usize,
) {
    let pad = "  ".repeat(depth);
    output.push_str(&format!("{}{} {{\n", pad, selector));
    for (property, value) in properties {
        output.push_str(&format!("{}  {}: {};\n", pad, to_kebab_case(property), value));
    }
    output.push_str(&format!("{}}}\n", pad));
    if depth == 0 {
        output.push('\n');
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
