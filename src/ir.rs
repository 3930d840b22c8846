//! Template IR for the weft compiler
//!
//! The framework-neutral node tree that every stage consumes, plus the
//! `ComponentConcept` aggregate the analyzer extracts from it. Nodes arrive
//! as JSON (`*.template.json`), so everything here is serde-deserializable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::{ErrorCollector, Stage, StructuralError};

// ═══════════════════════════════════════════════════════════════════════════════
// NODE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceLocation {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

/// A node's variant determines which fields are meaningful; absent fields
/// deserialize to empty defaults and must not be read for other variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TemplateNode {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
    Conditional(ConditionalNode),
    Iteration(IterationNode),
    Slot(SlotNode),
    Fragment(FragmentNode),
    /// Any unrecognized `type` tag lands here so one bad node never aborts
    /// deserialization of the whole tree. The analyzer reports it and moves on.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    /// Static attributes; values may be scalars or structured JSON.
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
    /// Raw expression strings keyed by attribute name.
    #[serde(default)]
    pub expression_attributes: IndexMap<String, String>,
    /// Structured style declaration consumed by the style engine. Flat
    /// `prop: value` pairs plus nested `@media ...` / `:pseudo` blocks.
    #[serde(default)]
    pub styles: Option<Value>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub value: String,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub value: String,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalNode {
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub then_children: Vec<TemplateNode>,
    #[serde(default)]
    pub else_children: Option<Vec<TemplateNode>>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IterationNode {
    #[serde(default)]
    pub items: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fallback: Option<Vec<TemplateNode>>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FragmentNode {
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    #[serde(default)]
    pub location: SourceLocation,
}

/// Stable identity used to key concepts to nodes: the caller-supplied id
/// when present, else the pre-order index path (`"2.0.1"`). The analyzer and
/// the framework renderers both derive identities through here, so a concept
/// always finds its node again.
pub fn node_identity(node: &TemplateNode, parent_path: &str, index: usize) -> (String, String) {
    let path = if parent_path.is_empty() {
        index.to_string()
    } else {
        format!("{}.{}", parent_path, index)
    };
    let id = node
        .explicit_id()
        .map(str::to_string)
        .unwrap_or_else(|| path.clone());
    (id, path)
}

impl TemplateNode {
    /// The caller-supplied node id, when one exists. Stages that need a
    /// stable identity fall back to the traversal index path.
    pub fn explicit_id(&self) -> Option<&str> {
        match self {
            TemplateNode::Element(n) => n.id.as_deref(),
            TemplateNode::Conditional(n) => n.id.as_deref(),
            TemplateNode::Iteration(n) => n.id.as_deref(),
            TemplateNode::Slot(n) => n.id.as_deref(),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT ENVELOPE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub name: String,
    #[serde(default)]
    pub props: IndexMap<String, Value>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Either a bare node list or a component document carrying metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    #[serde(default)]
    pub component: Option<ComponentMetadata>,
    #[serde(default)]
    pub nodes: Vec<TemplateNode>,
}

impl TemplateInput {
    pub fn from_nodes(nodes: Vec<TemplateNode>) -> Self {
        TemplateInput {
            component: None,
            nodes,
        }
    }

    /// Parse the external JSON shape: a bare array of nodes, or an object
    /// with a `nodes` array plus optional component metadata. A non-array
    /// value where the node list is expected is a structural error, never
    /// silently coerced.
    pub fn from_json(value: &Value, errors: &mut ErrorCollector) -> Result<Self, StructuralError> {
        match value {
            Value::Array(items) => Ok(TemplateInput {
                component: None,
                nodes: parse_node_array(items, errors),
            }),
            Value::Object(map) => {
                let items = match map.get("nodes") {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        return Err(StructuralError::new(format!(
                            "expected 'nodes' to be an array of template nodes, got {}",
                            json_type_name(other)
                        )))
                    }
                    None => {
                        return Err(StructuralError::new(
                            "template object is missing its 'nodes' array",
                        ))
                    }
                };
                let component = match map.get("component") {
                    Some(meta) => match serde_json::from_value(meta.clone()) {
                        Ok(meta) => Some(meta),
                        Err(e) => {
                            return Err(StructuralError::new(format!(
                                "invalid component metadata: {}",
                                e
                            )))
                        }
                    },
                    None => None,
                };
                Ok(TemplateInput {
                    component,
                    nodes: parse_node_array(items, errors),
                })
            }
            other => Err(StructuralError::new(format!(
                "expected a node array or template object, got {}",
                json_type_name(other)
            ))),
        }
    }
}

fn parse_node_array(items: &[Value], errors: &mut ErrorCollector) -> Vec<TemplateNode> {
    let mut nodes = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<TemplateNode>(item.clone()) {
            Ok(node) => nodes.push(node),
            Err(e) => {
                errors.node_warning(
                    Stage::Input,
                    index.to_string(),
                    format!("dropped malformed node: {}", e),
                );
            }
        }
    }
    nodes
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONCEPT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// A framework-agnostic semantic fact extracted from one node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventConcept {
    /// Canonical lowercase event name, e.g. `click`.
    pub name: String,
    /// Raw handler expression as written in the template.
    pub handler: String,
    /// Positional parameters parsed out of a parenthesized handler call.
    /// Empty when the handler is a bare identifier.
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub node_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StylingConcept {
    /// Order-preserving static class list; never deduplicated here.
    #[serde(default)]
    pub static_classes: Vec<String>,
    #[serde(default)]
    pub dynamic_classes: Vec<String>,
    #[serde(default)]
    pub inline_styles: IndexMap<String, String>,
    #[serde(default)]
    pub style_bindings: IndexMap<String, String>,
}

impl StylingConcept {
    pub fn is_empty(&self) -> bool {
        self.static_classes.is_empty()
            && self.dynamic_classes.is_empty()
            && self.inline_styles.is_empty()
            && self.style_bindings.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalConcept {
    pub condition: String,
    #[serde(default)]
    pub then_children: Vec<TemplateNode>,
    #[serde(default)]
    pub else_children: Option<Vec<TemplateNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IterationConcept {
    pub items: String,
    pub item: String,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotConcept {
    pub name: String,
    #[serde(default)]
    pub fallback: Option<Vec<TemplateNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeConcept {
    pub name: String,
    pub value: Value,
    pub is_expression: bool,
}

/// The analyzer's output: every concept category extracted in one walk.
/// Produced fresh per analysis call; only a utility extension replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConcept {
    #[serde(default)]
    pub events: Vec<EventConcept>,
    #[serde(default)]
    pub styling: StylingConcept,
    #[serde(default)]
    pub conditionals: Vec<ConditionalConcept>,
    #[serde(default)]
    pub iterations: Vec<IterationConcept>,
    #[serde(default)]
    pub slots: Vec<SlotConcept>,
    #[serde(default)]
    pub attributes: Vec<AttributeConcept>,
}
