use serde_json::json;

use crate::extension::{
    ExtensionKind, ExtensionMetadata, ExtensionResult, StylingExtension, StylingOutput,
};
use crate::ir::{ElementNode, StylingConcept, TemplateInput, TemplateNode};
use crate::pipeline::ProcessOptions;
use crate::style::{resolve_selector, to_kebab_case, StyleDefinition, StyleEngine, StyleFormat, StyleRegistry};

fn parse_nodes(value: serde_json::Value) -> Vec<TemplateNode> {
    let mut errors = crate::diagnostics::ErrorCollector::new();
    TemplateInput::from_json(&value, &mut errors).unwrap().nodes
}

fn first_element(nodes: &[TemplateNode]) -> &ElementNode {
    match &nodes[0] {
        TemplateNode::Element(element) => element,
        other => panic!("expected element, got {:?}", other),
    }
}

#[test]
fn selector_prefers_first_class_token_over_tag() {
    let nodes = parse_nodes(json!([
        { "type": "element", "tag": "div", "attributes": { "class": "card featured" } }
    ]));
    assert_eq!(
        resolve_selector(first_element(&nodes)),
        Some(".card".to_string())
    );

    let nodes = parse_nodes(json!([{ "type": "element", "tag": "button" }]));
    assert_eq!(
        resolve_selector(first_element(&nodes)),
        Some("button".to_string())
    );
}

#[test]
fn kebab_case_conversion() {
    assert_eq!(to_kebab_case("fontSize"), "font-size");
    assert_eq!(to_kebab_case("backgroundColor"), "background-color");
    assert_eq!(to_kebab_case("color"), "color");
}

#[test]
fn same_selector_accumulates_with_later_values_winning() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "class": "card" },
            "styles": { "color": "red", "padding": "8px" }
        },
        {
            "type": "element",
            "tag": "div",
            "attributes": { "class": "card" },
            "styles": { "color": "blue", "margin": "4px" }
        }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);

    let definition = engine.registry().get(".card").unwrap();
    assert_eq!(definition.declarations.get("color").map(String::as_str), Some("blue"));
    assert_eq!(definition.declarations.get("padding").map(String::as_str), Some("8px"));
    assert_eq!(definition.declarations.get("margin").map(String::as_str), Some("4px"));
}

#[test]
fn media_and_pseudo_blocks_merge_per_property() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "a",
            "attributes": { "class": "link" },
            "styles": {
                ":hover": { "color": "blue", "textDecoration": "underline" },
                "@media (max-width: 600px)": { "fontSize": "12px" }
            }
        },
        {
            "type": "element",
            "tag": "a",
            "attributes": { "class": "link" },
            "styles": {
                ":hover": { "color": "navy" },
                "@media (max-width: 600px)": { "padding": "4px" }
            }
        }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);

    let definition = engine.registry().get(".link").unwrap();
    let hover = definition.pseudo.get(":hover").unwrap();
    assert_eq!(hover.get("color").map(String::as_str), Some("navy"));
    assert_eq!(
        hover.get("textDecoration").map(String::as_str),
        Some("underline")
    );
    let media = definition.media.get("@media (max-width: 600px)").unwrap();
    assert_eq!(media.get("fontSize").map(String::as_str), Some("12px"));
    assert_eq!(media.get("padding").map(String::as_str), Some("4px"));
}

#[test]
fn css_output_emits_base_pseudo_and_aggregated_media_rules() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "class": "card" },
            "styles": {
                "color": "red",
                "fontSize": "16px",
                ":hover": { "color": "blue" },
                "@media (max-width: 600px)": { "fontSize": "12px" }
            }
        }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);
    let css = engine.generate_output(StyleFormat::Css, None);

    assert!(css.contains(".card {\n  color: red;\n  font-size: 16px;\n}"));
    assert!(css.contains(".card:hover {\n  color: blue;\n}"));
    assert!(css.contains("@media (max-width: 600px) {\n  .card {\n    font-size: 12px;\n  }\n}"));
}

#[test]
fn scss_output_nests_pseudo_and_media_inside_the_selector() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "class": "card" },
            "styles": {
                "color": "red",
                ":hover": { "color": "blue" },
                "@media (max-width: 600px)": { "fontSize": "12px" }
            }
        }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);
    let scss = engine.generate_output(StyleFormat::Scss, None);

    assert!(scss.starts_with(".card {"));
    assert!(scss.contains("&:hover {"));
    assert!(scss.contains("@media (max-width: 600px) {"));
}

#[test]
fn inline_lookup_returns_base_declarations_only() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "styles": {
                "color": "red",
                "fontSize": "16px",
                ":hover": { "color": "blue" }
            }
        }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);

    let inline = engine.get_inline_styles(first_element(&nodes)).unwrap();
    assert_eq!(inline, "color: red; font-size: 16px");

    // Inline-mode stylesheet carries only the non-inlinable rules.
    let block = engine.generate_output(StyleFormat::Inline, None);
    assert!(block.contains("div:hover"));
    assert!(!block.contains("color: red"));
}

#[test]
fn styled_node_without_selector_warns_and_is_skipped() {
    let nodes = parse_nodes(json!([
        { "type": "element", "tag": "", "styles": { "color": "red" } }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);

    assert!(engine.registry().is_empty());
    assert_eq!(engine.take_errors().warning_count(), 1);
}

#[test]
fn reset_clears_registry_between_passes() {
    let nodes = parse_nodes(json!([
        { "type": "element", "tag": "p", "styles": { "color": "red" } }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);
    assert_eq!(engine.registry().len(), 1);

    engine.reset();
    assert!(engine.registry().is_empty());
}

struct TakeoverPlugin {
    metadata: ExtensionMetadata,
}

impl TakeoverPlugin {
    fn new() -> Self {
        TakeoverPlugin {
            metadata: ExtensionMetadata::new(
                "takeover",
                "Takeover",
                "1.0.0",
                ExtensionKind::Styling,
            ),
        }
    }
}

impl StylingExtension for TakeoverPlugin {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn approach(&self) -> &str {
        "css"
    }

    fn process_styles(
        &self,
        _engine: &mut StyleEngine,
        styling: &StylingConcept,
        _nodes: &[TemplateNode],
        _options: &ProcessOptions,
    ) -> ExtensionResult<StylingOutput> {
        Ok(StylingOutput {
            styling: styling.clone(),
            stylesheet: String::new(),
        })
    }

    fn rewrite_selector(&self, selector: &str, _element: &ElementNode) -> Option<String> {
        Some(format!("{}--scoped", selector))
    }

    fn emit(&self, _registry: &StyleRegistry, _format: StyleFormat) -> Option<String> {
        Some("/* plugin output */".to_string())
    }
}

#[test]
fn plugin_can_rewrite_selectors_and_take_over_emission() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "class": "card" },
            "styles": { "color": "red" }
        }
    ]));

    let plugin = TakeoverPlugin::new();
    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, Some(&plugin));

    assert!(engine.registry().contains_key(".card--scoped"));
    assert_eq!(
        engine.generate_output(StyleFormat::Css, Some(&plugin)),
        "/* plugin output */"
    );
}

#[test]
fn inline_lookup_follows_rewritten_selectors() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "class": "card" },
            "styles": { "color": "red" }
        }
    ]));

    let plugin = TakeoverPlugin::new();
    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, Some(&plugin));

    // Declarations live under the rewritten selector, yet the per-node
    // lookup still resolves them for the original node.
    assert!(engine.registry().contains_key(".card--scoped"));
    assert_eq!(
        engine.get_inline_styles(first_element(&nodes)).as_deref(),
        Some("color: red")
    );

    engine.reset();
    assert_eq!(engine.get_inline_styles(first_element(&nodes)), None);
}

struct RuleOnlyPlugin {
    metadata: ExtensionMetadata,
}

impl StylingExtension for RuleOnlyPlugin {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn approach(&self) -> &str {
        "css"
    }

    fn process_styles(
        &self,
        _engine: &mut StyleEngine,
        styling: &StylingConcept,
        _nodes: &[TemplateNode],
        _options: &ProcessOptions,
    ) -> ExtensionResult<StylingOutput> {
        Ok(StylingOutput {
            styling: styling.clone(),
            stylesheet: String::new(),
        })
    }

    fn emit_rule(
        &self,
        selector: &str,
        definition: &StyleDefinition,
        _format: StyleFormat,
    ) -> Option<String> {
        Some(format!(
            "{} /* {} declarations */",
            selector,
            definition.declarations.len()
        ))
    }
}

#[test]
fn per_rule_plugin_output_replaces_builtin_generators() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "class": "card" },
            "styles": { "color": "red", "margin": "4px" }
        }
    ]));

    let plugin = RuleOnlyPlugin {
        metadata: ExtensionMetadata::new("rules", "Rules", "1.0.0", ExtensionKind::Styling),
    };
    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, Some(&plugin));

    assert_eq!(
        engine.generate_output(StyleFormat::Css, Some(&plugin)),
        ".card /* 2 declarations */"
    );
}
