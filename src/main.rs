use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use weft::cache::IncrementalCache;
use weft::discovery::{discover_templates, DiscoveredTemplate};
use weft::ir::ComponentMetadata;
use weft::output::OutputLayer;
use weft::pipeline::{Pipeline, ProcessOptions};
use weft::register_builtin_extensions;
use weft::serializer::HtmlSerializer;
use weft::style::{StyleEngine, StyleFormat};

#[derive(Parser)]
#[command(name = "weft", version, about = "Concept-driven template compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile every *.template.json under a root directory.
    Compile {
        /// Directory to scan for templates.
        root: PathBuf,
        /// Framework extension key (react, vue, svelte).
        #[arg(long)]
        framework: Option<String>,
        /// Styling extension key (css, utility-classes).
        #[arg(long)]
        styling: Option<String>,
        /// Utility extension keys, applied in order.
        #[arg(long = "utility")]
        utilities: Vec<String>,
        /// Stylesheet format: inline, css or scss.
        #[arg(long)]
        style_format: Option<String>,
        /// Output directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Config file path; defaults to <root>/weft.config.json when present.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Mirror diagnostics to the log stream.
        #[arg(long)]
        verbose: bool,
        /// Bypass the incremental cache.
        #[arg(long)]
        no_cache: bool,
    },
    /// List the registered extensions.
    List,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WeftConfig {
    framework: Option<String>,
    styling: Option<String>,
    utilities: Vec<String>,
    style_format: Option<String>,
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Compile {
            root,
            framework,
            styling,
            utilities,
            style_format,
            out_dir,
            config,
            verbose,
            no_cache,
        } => {
            let config = load_config(&root, config)?;

            let framework = framework.or(config.framework);
            let styling = styling.or(config.styling);
            let utilities = if utilities.is_empty() {
                config.utilities
            } else {
                utilities
            };
            let style_format = match style_format.or(config.style_format) {
                Some(text) => StyleFormat::from_str(&text).map_err(anyhow::Error::msg)?,
                None => StyleFormat::default(),
            };
            let out_dir = out_dir
                .or(config.out_dir)
                .unwrap_or_else(|| PathBuf::from("dist"));

            compile(
                &root,
                framework,
                styling,
                utilities,
                style_format,
                out_dir,
                verbose,
                no_cache,
            )
        }
        Command::List => {
            let mut pipeline = Pipeline::new();
            register_builtin_extensions(pipeline.registry_mut());
            let registry = pipeline.registry();
            println!("framework: {}", registry.framework_keys().join(", "));
            println!("styling:   {}", registry.styling_keys().join(", "));
            println!("utility:   {}", registry.utility_keys().join(", "));
            Ok(())
        }
    }
}

fn load_config(root: &PathBuf, explicit: Option<PathBuf>) -> Result<WeftConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = root.join("weft.config.json");
            if !default.exists() {
                return Ok(WeftConfig::default());
            }
            default
        }
    };
    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

#[allow(clippy::too_many_arguments)]
fn compile(
    root: &PathBuf,
    framework: Option<String>,
    styling: Option<String>,
    utilities: Vec<String>,
    style_format: StyleFormat,
    out_dir: PathBuf,
    verbose: bool,
    no_cache: bool,
) -> Result<()> {
    anyhow::ensure!(root.exists(), "template root {} does not exist", root.display());

    let mut pipeline = Pipeline::new();
    register_builtin_extensions(pipeline.registry_mut());

    let templates = discover_templates(root);
    anyhow::ensure!(
        !templates.is_empty(),
        "no *.template.json files found under {}",
        root.display()
    );
    log::info!("compiling {} template(s)", templates.len());

    let output_layer = OutputLayer::new(out_dir);
    let cache = if no_cache {
        None
    } else {
        Some(IncrementalCache::new())
    };

    let failures: Vec<String> = templates
        .par_iter()
        .filter_map(|template| {
            compile_one(
                template,
                &pipeline,
                &output_layer,
                framework.as_deref(),
                styling.as_deref(),
                &utilities,
                style_format,
                verbose,
                cache.as_ref(),
            )
            .err()
            .map(|e| format!("{}: {:#}", template.path.display(), e))
        })
        .collect();

    if !failures.is_empty() {
        for failure in &failures {
            log::error!("{}", failure);
        }
        anyhow::bail!("{} of {} templates failed", failures.len(), templates.len());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn compile_one(
    template: &DiscoveredTemplate,
    pipeline: &Pipeline,
    output_layer: &OutputLayer,
    framework: Option<&str>,
    styling: Option<&str>,
    utilities: &[String],
    style_format: StyleFormat,
    verbose: bool,
    cache: Option<&IncrementalCache>,
) -> Result<()> {
    let path_key = template.path.to_string_lossy();
    let active_framework = framework.and_then(|key| pipeline.registry().get_framework(key));

    if let Some(cache) = cache {
        if let Some(entry) = cache.get(&path_key, &template.source) {
            log::debug!("cache hit for {}", template.path.display());
            let cached = weft::pipeline::ProcessingResult {
                output: entry.output,
                styles: entry.styles,
                ..Default::default()
            };
            output_layer
                .write_component(&template.name, &cached, active_framework.as_ref(), style_format)
                .context("failed to write cached output")?;
            return Ok(());
        }
    }

    let options = ProcessOptions {
        framework: framework.map(str::to_string),
        styling: styling.map(str::to_string),
        utilities: utilities.to_vec(),
        component: fallback_component(template),
        style_format,
        verbose,
        ..ProcessOptions::default()
    };

    let mut result = pipeline.process_json(&template.document, &options);
    if result.errors.has_errors() {
        for entry in result.errors.entries() {
            log::error!("{}: {}", template.path.display(), entry);
        }
        anyhow::bail!("compilation produced {} error(s)", result.errors.error_count());
    }

    // No framework selected: fall back to plain HTML serialization.
    if framework.is_none() && result.output.is_empty() {
        result.output = serialize_fallback(template, style_format);
    }

    output_layer
        .write_component(&template.name, &result, active_framework.as_ref(), style_format)
        .context("failed to write output")?;

    if let Some(cache) = cache {
        cache.set(&path_key, &template.source, &result.output, &result.styles);
    }
    Ok(())
}

/// Metadata override carrying the file-derived name, used only when the
/// document itself has none.
fn fallback_component(template: &DiscoveredTemplate) -> Option<ComponentMetadata> {
    if template.document.get("component").is_some() {
        return None;
    }
    Some(ComponentMetadata {
        name: template.name.clone(),
        ..ComponentMetadata::default()
    })
}

fn serialize_fallback(template: &DiscoveredTemplate, style_format: StyleFormat) -> String {
    let mut errors = weft::diagnostics::ErrorCollector::new();
    let input = match weft::ir::TemplateInput::from_json(&template.document, &mut errors) {
        Ok(input) => input,
        Err(_) => return String::new(),
    };
    if style_format == StyleFormat::Inline {
        let mut engine = StyleEngine::new();
        engine.process_tree(&input.nodes, None);
        HtmlSerializer::with_inline_styles(&engine).serialize(&input.nodes)
    } else {
        HtmlSerializer::new().serialize(&input.nodes)
    }
}
