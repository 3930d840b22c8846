//! File-system output layer
//!
//! Resolves where a compiled component lands, creates directories, runs the
//! framework's post-processing hook on the final text, and writes the
//! rendered file plus its stylesheet. Write failures surface as
//! [`OutputError`] and never corrupt in-memory results.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::events::TargetSyntax;
use crate::extension::FrameworkExtension;
use crate::pipeline::ProcessingResult;
use crate::style::StyleFormat;

#[derive(Debug)]
pub struct OutputError {
    pub path: PathBuf,
    pub message: String,
}

impl OutputError {
    fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        OutputError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for OutputError {}

pub struct OutputLayer {
    base_dir: PathBuf,
}

impl OutputLayer {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        OutputLayer {
            base_dir: base_dir.into(),
        }
    }

    /// The rendering extension gets its own subdirectory named by key;
    /// everything else shares the base directory.
    pub fn resolve_dir(&self, framework_key: Option<&str>) -> PathBuf {
        match framework_key {
            Some(key) => self.base_dir.join(key),
            None => self.base_dir.clone(),
        }
    }

    pub fn source_extension(target: Option<TargetSyntax>) -> &'static str {
        match target {
            Some(TargetSyntax::React) => "jsx",
            Some(TargetSyntax::Vue) => "vue",
            Some(TargetSyntax::Svelte) => "svelte",
            None => "html",
        }
    }

    pub fn style_extension(format: StyleFormat) -> &'static str {
        match format {
            StyleFormat::Scss => "scss",
            // Inline mode still emits pseudo/media rules as a CSS file.
            StyleFormat::Inline | StyleFormat::Css => "css",
        }
    }

    /// Write one compiled component. Returns the paths written, rendered
    /// file first.
    pub fn write_component(
        &self,
        name: &str,
        result: &ProcessingResult,
        framework: Option<&Arc<dyn FrameworkExtension>>,
        style_format: StyleFormat,
    ) -> Result<Vec<PathBuf>, OutputError> {
        let dir = self.resolve_dir(framework.map(|f| f.metadata().key.as_str()));
        fs::create_dir_all(&dir).map_err(|e| OutputError::new(&dir, e.to_string()))?;

        let mut written = Vec::new();

        let output = match framework {
            Some(framework) => framework
                .post_process(&result.output)
                .unwrap_or_else(|| result.output.clone()),
            None => result.output.clone(),
        };
        let target = framework.map(|f| f.target_syntax());
        let source_path = dir.join(format!("{}.{}", name, Self::source_extension(target)));
        write_file(&source_path, &output)?;
        written.push(source_path);

        if !result.styles.is_empty() {
            let style_path = dir.join(format!("{}.{}", name, Self::style_extension(style_format)));
            write_file(&style_path, &result.styles)?;
            written.push(style_path);
        }

        Ok(written)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    fs::write(path, contents).map_err(|e| OutputError::new(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_extension_per_target() {
        assert_eq!(OutputLayer::source_extension(Some(TargetSyntax::React)), "jsx");
        assert_eq!(OutputLayer::source_extension(Some(TargetSyntax::Vue)), "vue");
        assert_eq!(
            OutputLayer::source_extension(Some(TargetSyntax::Svelte)),
            "svelte"
        );
        assert_eq!(OutputLayer::source_extension(None), "html");
    }

    #[test]
    fn framework_gets_its_own_subdirectory() {
        let layer = OutputLayer::new("out");
        assert_eq!(layer.resolve_dir(Some("react")), PathBuf::from("out/react"));
        assert_eq!(layer.resolve_dir(None), PathBuf::from("out"));
    }
}
