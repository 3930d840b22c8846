use serde_json::json;

use crate::analyzer::{AnalyzerOptions, TemplateAnalyzer};
use crate::diagnostics::Severity;
use crate::ir::{TemplateInput, TemplateNode};

fn parse_nodes(value: serde_json::Value) -> Vec<TemplateNode> {
    let mut errors = crate::diagnostics::ErrorCollector::new();
    let input = TemplateInput::from_json(&value, &mut errors).unwrap();
    assert!(errors.is_empty(), "unexpected parse warnings: {:?}", errors);
    input.nodes
}

fn sample_tree() -> Vec<TemplateNode> {
    parse_nodes(json!([
        {
            "type": "element",
            "tag": "form",
            "attributes": { "class": "login compact", "method": "post" },
            "expressionAttributes": { "@submit.prevent": "submitForm" },
            "children": [
                {
                    "type": "element",
                    "tag": "input",
                    "attributes": { "style": "color: red; font-size: 16px" },
                    "expressionAttributes": { ":class": "inputClass", ":value": "draft" }
                },
                {
                    "type": "conditional",
                    "condition": "showHint",
                    "thenChildren": [
                        { "type": "text", "value": "Hint" }
                    ]
                },
                {
                    "type": "iteration",
                    "items": "errors",
                    "item": "error",
                    "index": "i",
                    "children": [
                        { "type": "text", "value": "oops" }
                    ]
                },
                { "type": "slot", "name": "footer" }
            ]
        }
    ]))
}

#[test]
fn extracts_every_concept_category() {
    let nodes = sample_tree();
    let mut analyzer = TemplateAnalyzer::new();
    let concepts = analyzer.extract_concepts(&nodes, &AnalyzerOptions::default());

    assert!(analyzer.errors().is_empty());

    assert_eq!(concepts.events.len(), 1);
    assert_eq!(concepts.events[0].name, "submit");
    assert_eq!(concepts.events[0].modifiers, vec!["prevent"]);
    assert_eq!(concepts.events[0].node_id, "0");

    assert_eq!(concepts.styling.static_classes, vec!["login", "compact"]);
    assert_eq!(concepts.styling.dynamic_classes, vec!["inputClass"]);
    assert_eq!(
        concepts.styling.inline_styles.get("color").map(String::as_str),
        Some("red")
    );
    assert_eq!(
        concepts.styling.inline_styles.get("font-size").map(String::as_str),
        Some("16px")
    );
    assert_eq!(
        concepts.styling.style_bindings.get("class").map(String::as_str),
        Some("inputClass")
    );

    assert_eq!(concepts.conditionals.len(), 1);
    assert_eq!(concepts.conditionals[0].condition, "showHint");

    assert_eq!(concepts.iterations.len(), 1);
    assert_eq!(concepts.iterations[0].items, "errors");
    assert_eq!(concepts.iterations[0].index.as_deref(), Some("i"));

    assert_eq!(concepts.slots.len(), 1);
    assert_eq!(concepts.slots[0].name, "footer");

    // method (static) and :value (expression); events and styling never
    // leak into the generic attribute list.
    assert_eq!(concepts.attributes.len(), 2);
    assert_eq!(concepts.attributes[0].name, "method");
    assert!(!concepts.attributes[0].is_expression);
    assert_eq!(concepts.attributes[1].name, ":value");
    assert!(concepts.attributes[1].is_expression);
}

#[test]
fn extraction_is_deterministic() {
    let nodes = sample_tree();
    let options = AnalyzerOptions::default();

    let first = TemplateAnalyzer::new().extract_concepts(&nodes, &options);
    let second = TemplateAnalyzer::new().extract_concepts(&nodes, &options);
    assert_eq!(first, second);
}

#[test]
fn disabling_a_category_does_not_spill_into_another() {
    let nodes = sample_tree();
    let options = AnalyzerOptions {
        extract_events: false,
        ..AnalyzerOptions::default()
    };
    let concepts = TemplateAnalyzer::new().extract_concepts(&nodes, &options);

    assert!(concepts.events.is_empty());
    // The event attribute is still recognized as an event, so it never
    // shows up as a generic expression attribute.
    assert!(concepts
        .attributes
        .iter()
        .all(|a| a.name != "@submit.prevent"));
}

#[test]
fn malformed_structural_nodes_warn_and_are_omitted() {
    let nodes = parse_nodes(json!([
        { "type": "conditional", "thenChildren": [ { "type": "text", "value": "a" } ] },
        { "type": "iteration", "item": "row", "children": [] },
        { "type": "slot" }
    ]));

    let mut analyzer = TemplateAnalyzer::new();
    let concepts = analyzer.extract_concepts(&nodes, &AnalyzerOptions::default());

    assert!(concepts.conditionals.is_empty());
    assert!(concepts.iterations.is_empty());
    assert!(concepts.slots.is_empty());

    let errors = analyzer.errors();
    assert_eq!(errors.count_by(Severity::Warning), 3);
    assert_eq!(errors.count_by(Severity::Error), 0);
}

#[test]
fn children_of_a_malformed_node_are_still_analyzed() {
    let nodes = parse_nodes(json!([
        {
            "type": "conditional",
            "thenChildren": [
                {
                    "type": "element",
                    "tag": "button",
                    "expressionAttributes": { "onClick": "go" }
                }
            ]
        }
    ]));

    let mut analyzer = TemplateAnalyzer::new();
    let concepts = analyzer.extract_concepts(&nodes, &AnalyzerOptions::default());

    assert!(concepts.conditionals.is_empty());
    assert_eq!(concepts.events.len(), 1);
    assert_eq!(concepts.events[0].name, "click");
}

#[test]
fn colon_prefixed_class_binding_wins_the_binding_slot() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "expressionAttributes": {
                "class": "plainExpr",
                ":class": "colonExpr"
            }
        }
    ]));

    let concepts =
        TemplateAnalyzer::new().extract_concepts(&nodes, &AnalyzerOptions::default());
    assert_eq!(
        concepts.styling.dynamic_classes,
        vec!["plainExpr", "colonExpr"]
    );
    assert_eq!(
        concepts.styling.style_bindings.get("class").map(String::as_str),
        Some("colonExpr")
    );
}

#[test]
fn explicit_node_id_keys_the_event() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "button",
            "id": "save-btn",
            "expressionAttributes": { "onClick": "save(item)" }
        }
    ]));

    let concepts =
        TemplateAnalyzer::new().extract_concepts(&nodes, &AnalyzerOptions::default());
    assert_eq!(concepts.events[0].node_id, "save-btn");
    assert_eq!(concepts.events[0].params, vec!["item"]);
}

#[test]
fn unknown_node_type_warns_but_siblings_survive() {
    let value = json!([
        { "type": "portal", "target": "#modal" },
        { "type": "text", "value": "still here" }
    ]);
    let mut errors = crate::diagnostics::ErrorCollector::new();
    let input = TemplateInput::from_json(&value, &mut errors).unwrap();
    assert_eq!(input.nodes.len(), 2);
    assert!(matches!(input.nodes[0], TemplateNode::Unknown));

    let mut analyzer = TemplateAnalyzer::new();
    analyzer.extract_concepts(&input.nodes, &AnalyzerOptions::default());
    assert_eq!(analyzer.errors().warning_count(), 1);
}

#[test]
fn ignored_attributes_are_dropped() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "data-test": "x", "role": "main" }
        }
    ]));

    let options = AnalyzerOptions {
        ignore_attributes: vec!["data-test".to_string()],
        ..AnalyzerOptions::default()
    };
    let concepts = TemplateAnalyzer::new().extract_concepts(&nodes, &options);
    assert_eq!(concepts.attributes.len(), 1);
    assert_eq!(concepts.attributes[0].name, "role");
}
