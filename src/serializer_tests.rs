use serde_json::json;

use crate::ir::{TemplateInput, TemplateNode};
use crate::serializer::{escape_html, HtmlSerializer};
use crate::style::StyleEngine;

fn parse_nodes(value: serde_json::Value) -> Vec<TemplateNode> {
    let mut errors = crate::diagnostics::ErrorCollector::new();
    TemplateInput::from_json(&value, &mut errors).unwrap().nodes
}

#[test]
fn void_elements_never_get_a_closing_tag() {
    let nodes = parse_nodes(json!([
        { "type": "element", "tag": "input", "attributes": { "name": "email" } },
        { "type": "element", "tag": "br" }
    ]));

    let html = HtmlSerializer::new().serialize(&nodes);
    assert_eq!(html, "<input name=\"email\">\n<br>");
}

#[test]
fn nested_elements_indent_and_escape_text() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "p",
            "children": [
                { "type": "text", "value": "a < b && c" }
            ]
        }
    ]));

    let html = HtmlSerializer::new().serialize(&nodes);
    assert_eq!(html, "<p>\n  a &lt; b &amp;&amp; c\n</p>");
}

#[test]
fn structural_nodes_serialize_as_comment_markers() {
    let nodes = parse_nodes(json!([
        {
            "type": "conditional",
            "condition": "loggedIn",
            "thenChildren": [ { "type": "text", "value": "Hello" } ],
            "elseChildren": [ { "type": "text", "value": "Sign in" } ]
        },
        {
            "type": "iteration",
            "items": "rows",
            "item": "row",
            "children": [ { "type": "element", "tag": "li" } ]
        }
    ]));

    let html = HtmlSerializer::new().serialize(&nodes);
    assert!(html.contains("<!-- if: loggedIn -->"));
    assert!(html.contains("<!-- else -->"));
    assert!(html.contains("<!-- /if -->"));
    assert!(html.contains("<!-- each: row in rows -->"));
    assert!(html.contains("<!-- /each -->"));
}

#[test]
fn slot_renders_fallback_children() {
    let nodes = parse_nodes(json!([
        {
            "type": "slot",
            "name": "footer",
            "fallback": [ { "type": "text", "value": "default footer" } ]
        },
        { "type": "slot" }
    ]));

    let html = HtmlSerializer::new().serialize(&nodes);
    assert!(html.contains("<slot name=\"footer\">\n  default footer\n</slot>"));
    assert!(html.contains("<slot></slot>"));
}

#[test]
fn expression_attributes_keep_their_expression_text() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "button",
            "expressionAttributes": { ":disabled": "isBusy" }
        }
    ]));

    let html = HtmlSerializer::new().serialize(&nodes);
    assert!(html.contains("disabled=\"{isBusy}\""));
}

#[test]
fn every_directive_sigil_is_stripped_from_attribute_names() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "button",
            "expressionAttributes": {
                ":disabled": "isBusy",
                "@click": "activate",
                "on:click": "activate"
            }
        }
    ]));

    let html = HtmlSerializer::new().serialize(&nodes);
    assert!(html.contains("disabled=\"{isBusy}\""));
    assert!(html.contains("click=\"{activate}\""));
    assert!(!html.contains("on:click"));
    assert!(!html.contains("@click"));
}

#[test]
fn engine_backed_serializer_injects_inline_styles() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "styles": { "color": "red", "fontSize": "16px" }
        }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);

    let html = HtmlSerializer::with_inline_styles(&engine).serialize(&nodes);
    assert!(html.contains("<div style=\"color: red; font-size: 16px\"></div>"));
}

#[test]
fn static_style_attribute_combines_with_engine_styles() {
    let nodes = parse_nodes(json!([
        {
            "type": "element",
            "tag": "div",
            "attributes": { "style": "margin: 0" },
            "styles": { "color": "red" }
        }
    ]));

    let mut engine = StyleEngine::new();
    engine.process_tree(&nodes, None);

    let html = HtmlSerializer::with_inline_styles(&engine).serialize(&nodes);
    assert!(html.contains("style=\"margin: 0; color: red\""));
}

#[test]
fn fragments_flatten_into_their_parent() {
    let nodes = parse_nodes(json!([
        {
            "type": "fragment",
            "children": [
                { "type": "element", "tag": "span" },
                { "type": "element", "tag": "span" }
            ]
        }
    ]));

    let html = HtmlSerializer::new().serialize(&nodes);
    assert_eq!(html, "<span></span>\n<span></span>");
}

#[test]
fn escape_handles_all_reserved_characters() {
    assert_eq!(
        escape_html(r#"<a href="x">&</a>"#),
        "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
    );
}
