use crate::events::{
    match_event_attribute, parse_framework_attribute, parse_handler_params,
    to_framework_attribute, TargetSyntax,
};
use crate::ir::EventConcept;

fn event(name: &str, modifiers: &[&str]) -> EventConcept {
    EventConcept {
        name: name.to_string(),
        handler: "handle".to_string(),
        params: vec![],
        modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
        node_id: "0".to_string(),
    }
}

#[test]
fn react_attribute_parses_to_lowercase_canonical_name() {
    assert_eq!(
        parse_framework_attribute("onClick", TargetSyntax::React),
        Some(("click".to_string(), vec![]))
    );
    assert_eq!(
        parse_framework_attribute("onKeydown", TargetSyntax::React),
        Some(("keydown".to_string(), vec![]))
    );
    assert_eq!(parse_framework_attribute("onclick", TargetSyntax::React), None);
    assert_eq!(parse_framework_attribute("href", TargetSyntax::React), None);
}

#[test]
fn vue_attribute_parses_name_and_modifiers() {
    assert_eq!(
        parse_framework_attribute("@submit.prevent", TargetSyntax::Vue),
        Some(("submit".to_string(), vec!["prevent".to_string()]))
    );
    assert_eq!(
        parse_framework_attribute("@click.stop.once", TargetSyntax::Vue),
        Some((
            "click".to_string(),
            vec!["stop".to_string(), "once".to_string()]
        ))
    );
    assert_eq!(parse_framework_attribute("@Click", TargetSyntax::Vue), None);
}

#[test]
fn svelte_attribute_parses_name_and_modifiers() {
    assert_eq!(
        parse_framework_attribute("on:click|once|preventDefault", TargetSyntax::Svelte),
        Some((
            "click".to_string(),
            vec!["once".to_string(), "preventDefault".to_string()]
        ))
    );
    assert_eq!(
        parse_framework_attribute("on:input", TargetSyntax::Svelte),
        Some(("input".to_string(), vec![]))
    );
    // Camel case is for modifiers only; the event name stays lowercase.
    assert_eq!(
        parse_framework_attribute("on:Click", TargetSyntax::Svelte),
        None
    );
}

#[test]
fn camel_case_modifiers_parse_for_vue_too() {
    assert_eq!(
        parse_framework_attribute("@scroll.capturePassive", TargetSyntax::Vue),
        Some(("scroll".to_string(), vec!["capturePassive".to_string()]))
    );
}

#[test]
fn pattern_list_order_decides_first_match() {
    let matched = match_event_attribute(
        "@click.stop",
        &[TargetSyntax::React, TargetSyntax::Vue, TargetSyntax::Svelte],
    );
    assert_eq!(
        matched,
        Some(("click".to_string(), vec!["stop".to_string()]))
    );

    assert_eq!(match_event_attribute("@click", &[TargetSyntax::React]), None);
}

#[test]
fn canonical_event_round_trips_across_targets() {
    let submit = event("submit", &["prevent"]);

    let react = to_framework_attribute(&submit, TargetSyntax::React);
    assert_eq!(react.attribute_name, "onSubmit");
    assert_eq!(react.modifiers, vec!["prevent"]);

    let vue = to_framework_attribute(&submit, TargetSyntax::Vue);
    assert_eq!(vue.attribute_name, "@submit.prevent");

    let svelte = to_framework_attribute(&submit, TargetSyntax::Svelte);
    assert_eq!(svelte.attribute_name, "on:submit|prevent");
}

#[test]
fn hyphenated_names_capitalize_per_segment_for_react() {
    let attr = to_framework_attribute(&event("mouse-down", &[]), TargetSyntax::React);
    assert_eq!(attr.attribute_name, "onMouseDown");
}

#[test]
fn handler_params_split_at_top_level_commas_only() {
    assert_eq!(
        parse_handler_params("save(item, index)"),
        vec!["item", "index"]
    );
    assert_eq!(parse_handler_params("handle"), Vec::<String>::new());
    assert_eq!(parse_handler_params("go()"), Vec::<String>::new());
    assert_eq!(
        parse_handler_params("fn(a, g(b, c), [1, 2])"),
        vec!["a", "g(b, c)", "[1, 2]"]
    );
    assert_eq!(
        parse_handler_params("notify('hi, there', level)"),
        vec!["'hi, there'", "level"]
    );
}
