//! Processing pipeline for the weft compiler
//!
//! Orchestrates analysis, extension resolution, concept transformation,
//! styling and rendering in a fixed stage order, tracking errors and timing
//! per stage. Every extension call is individually guarded: a fault records
//! a diagnostic and the pipeline continues with the last good value. The
//! `process` call itself never panics outward.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::analyzer::{AnalyzerOptions, TemplateAnalyzer};
use crate::diagnostics::{
    ErrorCollector, PerformanceMetrics, PerformanceTracker, Stage,
};
use crate::extension::{
    FrameworkExtension, RenderContext, StylingExtension, UtilityExtension,
};
use crate::ir::{ComponentConcept, ComponentMetadata, TemplateInput};
use crate::registry::ExtensionRegistry;
use crate::style::{StyleEngine, StyleFormat};

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS & RESULT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessOptions {
    /// Key of the framework extension to activate for this invocation.
    pub framework: Option<String>,
    /// Key of the styling extension to activate.
    pub styling: Option<String>,
    /// Ordered utility extension keys, applied as a left-fold.
    pub utilities: Vec<String>,
    /// Metadata passed through to the active framework's render context;
    /// overrides metadata carried by the input envelope.
    pub component: Option<ComponentMetadata>,
    pub style_format: StyleFormat,
    pub analyzer: AnalyzerOptions,
    /// Mirror diagnostics to the log stream without altering the result.
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Extension keys actually used: framework, then styling, then utilities
    /// in invocation order.
    pub extensions_used: Vec<String>,
    pub concept_counts: IndexMap<String, usize>,
    /// Unix seconds at assembly time.
    pub timestamp: u64,
}

/// The full result envelope. Always returned, never thrown; callers inspect
/// the collector's severity buckets to decide whether the output is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub output: String,
    pub styles: String,
    pub concepts: ComponentConcept,
    pub metadata: ResultMetadata,
    pub errors: ErrorCollector,
    pub performance: PerformanceMetrics,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACTIVE EXTENSIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// The extensions selected for one invocation, as opposed to merely being
/// registered. At most one framework extension may be active at a time.
#[derive(Default)]
pub struct ActiveExtensions {
    framework: Option<Arc<dyn FrameworkExtension>>,
    styling: Option<Arc<dyn StylingExtension>>,
    utilities: Vec<Arc<dyn UtilityExtension>>,
}

impl ActiveExtensions {
    pub fn activate_framework(
        &mut self,
        extension: Arc<dyn FrameworkExtension>,
    ) -> Result<(), String> {
        if let Some(active) = &self.framework {
            return Err(format!(
                "framework extension '{}' is already active for this invocation; cannot also activate '{}'",
                active.metadata().key,
                extension.metadata().key
            ));
        }
        self.framework = Some(extension);
        Ok(())
    }

    pub fn activate_styling(&mut self, extension: Arc<dyn StylingExtension>) {
        self.styling = Some(extension);
    }

    pub fn activate_utility(&mut self, extension: Arc<dyn UtilityExtension>) {
        self.utilities.push(extension);
    }

    pub fn framework(&self) -> Option<&Arc<dyn FrameworkExtension>> {
        self.framework.as_ref()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PIPELINE
// ═══════════════════════════════════════════════════════════════════════════════

struct StageOutcome {
    output: String,
    styles: String,
    concepts: ComponentConcept,
    extensions_used: Vec<String>,
}

pub struct Pipeline {
    registry: ExtensionRegistry,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            registry: ExtensionRegistry::new(),
        }
    }

    pub fn with_registry(registry: ExtensionRegistry) -> Self {
        Pipeline { registry }
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.registry
    }

    /// Parse the external JSON shape, then process. A structural error is
    /// the one fatal mode: it short-circuits before any extension runs and
    /// yields an empty result carrying the error.
    pub fn process_json(&self, value: &Value, options: &ProcessOptions) -> ProcessingResult {
        let mut errors = ErrorCollector::new();
        match TemplateInput::from_json(value, &mut errors) {
            Ok(input) => self.process_with_collector(&input, options, errors),
            Err(structural) => {
                errors.error(Stage::Input, structural.to_string());
                if options.verbose {
                    errors.log_all();
                }
                ProcessingResult {
                    errors,
                    metadata: ResultMetadata {
                        timestamp: unix_timestamp(),
                        ..ResultMetadata::default()
                    },
                    ..ProcessingResult::default()
                }
            }
        }
    }

    pub fn process(&self, input: &TemplateInput, options: &ProcessOptions) -> ProcessingResult {
        self.process_with_collector(input, options, ErrorCollector::new())
    }

    fn process_with_collector(
        &self,
        input: &TemplateInput,
        options: &ProcessOptions,
        mut errors: ErrorCollector,
    ) -> ProcessingResult {
        let mut perf = PerformanceTracker::new();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.run_stages(input, options, &mut errors, &mut perf)
        }));

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(_) => {
                errors.error(
                    Stage::Render,
                    "processing panicked; returning empty result",
                );
                StageOutcome {
                    output: String::new(),
                    styles: String::new(),
                    concepts: ComponentConcept::default(),
                    extensions_used: Vec::new(),
                }
            }
        };

        let metadata = ResultMetadata {
            extensions_used: outcome.extensions_used,
            concept_counts: concept_counts(&outcome.concepts),
            timestamp: unix_timestamp(),
        };

        if options.verbose {
            errors.log_all();
        }

        ProcessingResult {
            output: outcome.output,
            styles: outcome.styles,
            concepts: outcome.concepts,
            metadata,
            errors,
            performance: perf.finish(),
        }
    }

    fn run_stages(
        &self,
        input: &TemplateInput,
        options: &ProcessOptions,
        errors: &mut ErrorCollector,
        perf: &mut PerformanceTracker,
    ) -> StageOutcome {
        // Stage 1-2: analysis.
        perf.begin_stage("analysis");
        let mut analyzer = TemplateAnalyzer::new();
        let mut concepts = analyzer.extract_concepts(&input.nodes, &options.analyzer);
        errors.merge(analyzer.take_errors());

        // Stage 3: resolve active extensions. A missing key leaves its slot
        // unpopulated with a warning; never fatal.
        perf.begin_stage("resolve");
        let mut active = ActiveExtensions::default();
        let mut extensions_used = Vec::new();
        if let Some(key) = &options.framework {
            match self.registry.get_framework(key) {
                Some(extension) => match active.activate_framework(extension) {
                    Ok(()) => extensions_used.push(key.clone()),
                    Err(message) => errors.error(Stage::Framework, message),
                },
                None => errors.warning(
                    Stage::Framework,
                    format!("extension '{}' not found", key),
                ),
            }
        }
        if let Some(key) = &options.styling {
            match self.registry.get_styling(key) {
                Some(extension) => {
                    active.activate_styling(extension);
                    extensions_used.push(key.clone());
                }
                None => {
                    errors.warning(Stage::Styling, format!("extension '{}' not found", key))
                }
            }
        }
        for key in &options.utilities {
            match self.registry.get_utility(key) {
                Some(extension) => {
                    active.activate_utility(extension);
                    extensions_used.push(key.clone());
                }
                None => {
                    errors.warning(Stage::Utility, format!("extension '{}' not found", key))
                }
            }
        }

        // Stage 4: utility left-fold; a fault keeps the last good concepts.
        perf.begin_stage("utilities");
        for utility in &active.utilities {
            match utility.process(concepts.clone()) {
                Ok(next) => concepts = next,
                Err(fault) => errors.extension_error(
                    Stage::Utility,
                    &utility.metadata().key,
                    fault.message,
                ),
            }
        }

        // Stage 5: the five framework transforms, each guarded on its own.
        perf.begin_stage("framework-transforms");
        if let Some(framework) = active.framework() {
            let key = framework.metadata().key.clone();
            match framework.process_events(&concepts.events) {
                Ok(events) => concepts.events = events,
                Err(fault) => errors.extension_error(Stage::Framework, &key, fault.message),
            }
            match framework.process_conditionals(&concepts.conditionals) {
                Ok(conditionals) => concepts.conditionals = conditionals,
                Err(fault) => errors.extension_error(Stage::Framework, &key, fault.message),
            }
            match framework.process_iterations(&concepts.iterations) {
                Ok(iterations) => concepts.iterations = iterations,
                Err(fault) => errors.extension_error(Stage::Framework, &key, fault.message),
            }
            match framework.process_slots(&concepts.slots) {
                Ok(slots) => concepts.slots = slots,
                Err(fault) => errors.extension_error(Stage::Framework, &key, fault.message),
            }
            match framework.process_attributes(&concepts.attributes) {
                Ok(attributes) => concepts.attributes = attributes,
                Err(fault) => errors.extension_error(Stage::Framework, &key, fault.message),
            }
        }

        // Stage 6: styling. The engine is pipeline-owned and pass-scoped.
        perf.begin_stage("styling");
        let mut style_engine = StyleEngine::new();
        let mut styles = String::new();
        if let Some(styling) = &active.styling {
            style_engine.reset();
            match styling.process_styles(&mut style_engine, &concepts.styling, &input.nodes, options)
            {
                Ok(output) => {
                    concepts.styling = output.styling;
                    styles = output.stylesheet;
                }
                Err(fault) => errors.extension_error(
                    Stage::Styling,
                    &styling.metadata().key,
                    fault.message,
                ),
            }
            errors.merge(style_engine.take_errors());
        }

        // Stage 7: render.
        perf.begin_stage("render");
        let mut output = String::new();
        match active.framework() {
            Some(framework) => {
                let context = RenderContext {
                    nodes: &input.nodes,
                    component: options.component.as_ref().or(input.component.as_ref()),
                    options,
                    style_engine: &style_engine,
                };
                match framework.render_component(&concepts, &context) {
                    Ok(text) => output = text,
                    Err(fault) => errors.extension_error(
                        Stage::Render,
                        &framework.metadata().key,
                        fault.message,
                    ),
                }
            }
            None => errors.warning(
                Stage::Render,
                "no framework extension available for rendering",
            ),
        }
        perf.end_stage();

        StageOutcome {
            output,
            styles,
            concepts,
            extensions_used,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn concept_counts(concepts: &ComponentConcept) -> IndexMap<String, usize> {
    let styling = &concepts.styling;
    let mut counts = IndexMap::new();
    counts.insert("events".to_string(), concepts.events.len());
    counts.insert(
        "styling".to_string(),
        styling.static_classes.len()
            + styling.dynamic_classes.len()
            + styling.inline_styles.len()
            + styling.style_bindings.len(),
    );
    counts.insert("conditionals".to_string(), concepts.conditionals.len());
    counts.insert("iterations".to_string(), concepts.iterations.len());
    counts.insert("slots".to_string(), concepts.slots.len());
    counts.insert("attributes".to_string(), concepts.attributes.len());
    counts
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
