//! Built-in framework extensions
//!
//! Each backend walks the original node tree and emits one target's source
//! syntax, attaching transformed event/styling concepts back to their nodes
//! by identity. All three consume the event normalizer for attribute
//! spellings, so canonical events stay the single source of truth.

mod react;
mod svelte;
mod vue;

pub use react::ReactExtension;
pub use svelte::SvelteExtension;
pub use vue::VueExtension;

use serde_json::Value;

use crate::events::TargetSyntax;
use crate::ir::EventConcept;

/// Events the analyzer attached to this node identity, in extraction order.
pub(crate) fn events_for<'a>(events: &'a [EventConcept], node_id: &str) -> Vec<&'a EventConcept> {
    events.iter().filter(|e| e.node_id == node_id).collect()
}

/// Render a static attribute value for markup emission. Structured values
/// are emitted as compact JSON.
pub(crate) fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// True when this expression-attribute name is claimed by event extraction
/// under the caller's configured pattern list.
pub(crate) fn is_event_attribute(name: &str, patterns: &[TargetSyntax]) -> bool {
    crate::events::match_event_attribute(name, patterns).is_some()
}
