use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::extension::{
    ExtensionKind, ExtensionMetadata, ExtensionResult, StylingExtension, StylingOutput,
};
use crate::ir::{StylingConcept, TemplateNode};
use crate::pipeline::ProcessOptions;
use crate::style::{to_kebab_case, StyleEngine};

lazy_static! {
    /// Pixel value → spacing-scale token for margin/padding shorthands.
    static ref SPACING_SCALE: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("0", "0");
        m.insert("0px", "0");
        m.insert("4px", "1");
        m.insert("8px", "2");
        m.insert("12px", "3");
        m.insert("16px", "4");
        m.insert("20px", "5");
        m.insert("24px", "6");
        m.insert("32px", "8");
        m.insert("40px", "10");
        m.insert("48px", "12");
        m.insert("64px", "16");
        m
    };

    static ref COLORS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("white", "white");
        m.insert("#ffffff", "white");
        m.insert("#fff", "white");
        m.insert("black", "black");
        m.insert("#000000", "black");
        m.insert("#000", "black");
        m.insert("red", "red-500");
        m.insert("#ef4444", "red-500");
        m.insert("blue", "blue-500");
        m.insert("#3b82f6", "blue-500");
        m.insert("green", "green-500");
        m.insert("#22c55e", "green-500");
        m.insert("gray", "gray-500");
        m.insert("grey", "gray-500");
        m.insert("#6b7280", "gray-500");
        m
    };

    static ref FONT_SIZES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("12px", "text-xs");
        m.insert("14px", "text-sm");
        m.insert("16px", "text-base");
        m.insert("18px", "text-lg");
        m.insert("20px", "text-xl");
        m.insert("24px", "text-2xl");
        m.insert("30px", "text-3xl");
        m
    };
}

/// Utility-class styling: recognized inline declarations become utility class
/// names appended to the static class list; declarations with no class
/// equivalent stay inline. Structured per-node styles still flow through the
/// engine so pseudo-class and media rules are not lost.
pub struct UtilityClassStylingExtension {
    metadata: ExtensionMetadata,
}

impl UtilityClassStylingExtension {
    pub fn new() -> Self {
        UtilityClassStylingExtension {
            metadata: ExtensionMetadata::new(
                "utility-classes",
                "Utility Class Styling",
                "1.0.0",
                ExtensionKind::Styling,
            ),
        }
    }
}

impl Default for UtilityClassStylingExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl StylingExtension for UtilityClassStylingExtension {
    fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    fn approach(&self) -> &str {
        "utility-classes"
    }

    fn process_styles(
        &self,
        engine: &mut StyleEngine,
        styling: &StylingConcept,
        nodes: &[TemplateNode],
        options: &ProcessOptions,
    ) -> ExtensionResult<StylingOutput> {
        let mut styling = styling.clone();
        let mut remaining = IndexMap::new();
        for (property, value) in styling.inline_styles.drain(..) {
            match map_declaration(&to_kebab_case(&property), value.trim()) {
                Some(class) => {
                    if !styling.static_classes.contains(&class) {
                        styling.static_classes.push(class);
                    }
                }
                None => {
                    remaining.insert(property, value);
                }
            }
        }
        styling.inline_styles = remaining;

        engine.process_tree(nodes, Some(self));
        let stylesheet = engine.generate_output(options.style_format, Some(self));
        Ok(StylingOutput {
            styling,
            stylesheet,
        })
    }
}

/// One declaration → one utility class, or `None` when there is no lossless
/// class equivalent.
fn map_declaration(property: &str, value: &str) -> Option<String> {
    match property {
        "display" => match value {
            "flex" => Some("flex".to_string()),
            "grid" => Some("grid".to_string()),
            "block" => Some("block".to_string()),
            "inline-block" => Some("inline-block".to_string()),
            "none" => Some("hidden".to_string()),
            _ => None,
        },
        "margin" => spacing_class("m", value),
        "margin-top" => spacing_class("mt", value),
        "margin-right" => spacing_class("mr", value),
        "margin-bottom" => spacing_class("mb", value),
        "margin-left" => spacing_class("ml", value),
        "padding" => spacing_class("p", value),
        "padding-top" => spacing_class("pt", value),
        "padding-right" => spacing_class("pr", value),
        "padding-bottom" => spacing_class("pb", value),
        "padding-left" => spacing_class("pl", value),
        "gap" => spacing_class("gap", value),
        "color" => COLORS.get(value).map(|c| format!("text-{}", c)),
        "background-color" | "background" => COLORS.get(value).map(|c| format!("bg-{}", c)),
        "font-size" => FONT_SIZES.get(value).map(|c| c.to_string()),
        "font-weight" => match value {
            "bold" | "700" => Some("font-bold".to_string()),
            "600" => Some("font-semibold".to_string()),
            "500" => Some("font-medium".to_string()),
            "normal" | "400" => Some("font-normal".to_string()),
            _ => None,
        },
        "text-align" => match value {
            "left" => Some("text-left".to_string()),
            "center" => Some("text-center".to_string()),
            "right" => Some("text-right".to_string()),
            _ => None,
        },
        "flex-direction" => match value {
            "row" => Some("flex-row".to_string()),
            "column" => Some("flex-col".to_string()),
            _ => None,
        },
        "align-items" => match value {
            "center" => Some("items-center".to_string()),
            "flex-start" => Some("items-start".to_string()),
            "flex-end" => Some("items-end".to_string()),
            _ => None,
        },
        "justify-content" => match value {
            "center" => Some("justify-center".to_string()),
            "space-between" => Some("justify-between".to_string()),
            "flex-start" => Some("justify-start".to_string()),
            "flex-end" => Some("justify-end".to_string()),
            _ => None,
        },
        "border-radius" => match value {
            "2px" => Some("rounded-sm".to_string()),
            "4px" => Some("rounded".to_string()),
            "8px" => Some("rounded-lg".to_string()),
            "9999px" | "50%" => Some("rounded-full".to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn spacing_class(prefix: &str, value: &str) -> Option<String> {
    SPACING_SCALE
        .get(value)
        .map(|token| format!("{}-{}", prefix, token))
}
