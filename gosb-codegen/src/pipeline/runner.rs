//! Pipeline orchestrator.

use std::path::Path;

use eyre::Result;
use gosb_core::FeatureSet;
use tracing::debug;

use super::{
    GenerationContext, Phase, Plugin,
    phases::{AnalyzePhase, FormatPhase, GeneratePhase, PrunePhase},
};
use crate::format::{Formatter, Normalizer};

/// The generation pipeline orchestrator.
///
/// Runs the phases (analyze, prune, generate, format) in order, calling
/// plugin hooks around each one. The first failing phase stops the run and
/// no output is produced.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .formatter(Box::new(Gofmt::new()))
///     .plugin(SnapshotPlugin::with_output_dir(".gosb/debug"));
///
/// let ctx = pipeline.run(source, "input.go", FeatureSet::all())?;
/// ```
pub struct Pipeline {
    formatter: Box<dyn Formatter>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Create a pipeline that formats with [`Normalizer`].
    pub fn new() -> Self {
        Self {
            formatter: Box::new(Normalizer),
            plugins: Vec::new(),
        }
    }

    /// Replace the formatter used by the format phase.
    pub fn formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run the pipeline on Go source text.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase or plugin hook fails.
    pub fn run(
        self,
        source: impl Into<String>,
        path: impl AsRef<Path>,
        features: FeatureSet,
    ) -> Result<GenerationContext> {
        let mut ctx = GenerationContext::new(source, path.as_ref(), features);

        let phases: Vec<Box<dyn Phase>> = vec![
            Box::new(AnalyzePhase),
            Box::new(PrunePhase),
            Box::new(GeneratePhase),
            Box::new(FormatPhase::new(self.formatter)),
        ];

        for phase in &phases {
            run_phase(&self.plugins, phase.as_ref(), &mut ctx)?;
        }

        Ok(ctx)
    }

    /// Read a Go file and run the pipeline on it.
    pub fn run_file(self, path: impl AsRef<Path>, features: FeatureSet) -> Result<GenerationContext> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            eyre::Report::new(gosb_analyzer::Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        self.run(source, path, features)
    }
}

fn run_phase(
    plugins: &[Box<dyn Plugin>],
    phase: &dyn Phase,
    ctx: &mut GenerationContext,
) -> Result<()> {
    let phase_name = phase.name();

    for plugin in plugins {
        plugin.on_before_phase(phase_name, ctx)?;
    }

    debug!(phase = phase_name, "running phase");
    phase.run(ctx)?;

    for plugin in plugins {
        plugin.on_after_phase(phase_name, ctx)?;
    }

    Ok(())
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
