//! Event normalization for the weft compiler
//!
//! Stateless mapping between the canonical event representation (lowercase
//! name + ordered modifiers) and each target syntax's attribute spelling.
//! Both directions live here: the analyzer parses template attributes into
//! canonical events, and framework backends render canonical events back out.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ir::EventConcept;

// ═══════════════════════════════════════════════════════════════════════════════
// TARGET SYNTAX
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSyntax {
    React,
    Vue,
    Svelte,
}

impl TargetSyntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetSyntax::React => "react",
            TargetSyntax::Vue => "vue",
            TargetSyntax::Svelte => "svelte",
        }
    }
}

impl fmt::Display for TargetSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetSyntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "react" => Ok(TargetSyntax::React),
            "vue" => Ok(TargetSyntax::Vue),
            "svelte" => Ok(TargetSyntax::Svelte),
            other => Err(format!("unrecognized target syntax '{}'", other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTE PARSING (template → canonical)
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref REACT_EVENT_RE: Regex = Regex::new(r"^on([A-Z][A-Za-z0-9]*)$").unwrap();
    // Event names stay lowercase-canonical; modifiers may be camelCase
    // (Svelte spells them `preventDefault`, `stopPropagation`).
    static ref VUE_EVENT_RE: Regex =
        Regex::new(r"^@([a-z][a-z0-9-]*)((?:\.[a-zA-Z][a-zA-Z0-9-]*)*)$").unwrap();
    static ref SVELTE_EVENT_RE: Regex =
        Regex::new(r"^on:([a-z][a-z0-9-]*)((?:\|[a-zA-Z][a-zA-Z0-9-]*)*)$").unwrap();
}

/// Try one syntax's event spelling. Returns the canonical lowercase name and
/// the modifiers split off the suffix, in written order.
pub fn parse_framework_attribute(
    attribute: &str,
    syntax: TargetSyntax,
) -> Option<(String, Vec<String>)> {
    match syntax {
        TargetSyntax::React => REACT_EVENT_RE
            .captures(attribute)
            .map(|caps| (caps[1].to_lowercase(), Vec::new())),
        TargetSyntax::Vue => VUE_EVENT_RE.captures(attribute).map(|caps| {
            let modifiers = split_modifiers(caps.get(2).map_or("", |m| m.as_str()), '.');
            (caps[1].to_string(), modifiers)
        }),
        TargetSyntax::Svelte => SVELTE_EVENT_RE.captures(attribute).map(|caps| {
            let modifiers = split_modifiers(caps.get(2).map_or("", |m| m.as_str()), '|');
            (caps[1].to_string(), modifiers)
        }),
    }
}

/// Test an attribute name against an ordered pattern list; first match wins.
pub fn match_event_attribute(
    attribute: &str,
    patterns: &[TargetSyntax],
) -> Option<(String, Vec<String>)> {
    patterns
        .iter()
        .find_map(|syntax| parse_framework_attribute(attribute, *syntax))
}

fn split_modifiers(suffix: &str, separator: char) -> Vec<String> {
    suffix
        .split(separator)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTE RENDERING (canonical → target)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAttribute {
    pub attribute_name: String,
    /// Modifiers are always returned unchanged; targets whose attribute
    /// names cannot carry them (React) leave re-encoding to the renderer.
    pub modifiers: Vec<String>,
}

/// Render a canonical event to one target's attribute spelling.
pub fn to_framework_attribute(event: &EventConcept, target: TargetSyntax) -> NormalizedAttribute {
    match target {
        TargetSyntax::React => NormalizedAttribute {
            attribute_name: format!("on{}", capitalize_event_name(&event.name)),
            modifiers: event.modifiers.clone(),
        },
        TargetSyntax::Vue => {
            let mut name = format!("@{}", event.name);
            for modifier in &event.modifiers {
                name.push('.');
                name.push_str(modifier);
            }
            NormalizedAttribute {
                attribute_name: name,
                modifiers: event.modifiers.clone(),
            }
        }
        TargetSyntax::Svelte => {
            let mut name = format!("on:{}", event.name);
            for modifier in &event.modifiers {
                name.push('|');
                name.push_str(modifier);
            }
            NormalizedAttribute {
                attribute_name: name,
                modifiers: event.modifiers.clone(),
            }
        }
    }
}

/// `keydown` → `Keydown`, `mouse-down` → `MouseDown`.
fn capitalize_event_name(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLER CALL PARSING
// ═══════════════════════════════════════════════════════════════════════════════

/// Extract positional parameters from a parenthesized handler call, e.g.
/// `save(item, index)` → `["item", "index"]`. A bare identifier yields an
/// empty list. Commas nested inside parens, brackets or strings do not split.
pub fn parse_handler_params(handler: &str) -> Vec<String> {
    let open = match handler.find('(') {
        Some(i) => i,
        None => return Vec::new(),
    };

    let chars: Vec<char> = handler.chars().collect();
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut close = None;
    for (i, &c) in chars.iter().enumerate().skip(open) {
        if let Some(quote) = in_string {
            if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => in_string = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && c == ')' {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }

    let close = match close {
        Some(i) => i,
        None => return Vec::new(),
    };

    let inner: String = chars[open + 1..close].iter().collect();
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut start = 0;
    let inner_chars: Vec<char> = inner.chars().collect();
    for (i, &c) in inner_chars.iter().enumerate() {
        if let Some(quote) = in_string {
            if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => in_string = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(inner_chars[start..i].iter().collect::<String>());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(inner_chars[start..].iter().collect::<String>());

    params
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
