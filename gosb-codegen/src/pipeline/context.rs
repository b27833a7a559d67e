//! Generation context passed through pipeline phases.

use std::path::PathBuf;

use eyre::{Result, eyre};
use gosb_core::{Diagnostic, FeatureSet, File};

/// State of one generation run.
///
/// Each phase fills in its part: `analyze` sets [`file`](Self::file),
/// `prune` rewrites its imports, `generate` sets
/// [`generated`](Self::generated) and `format` sets
/// [`output`](Self::output).
#[derive(Debug)]
pub struct GenerationContext {
    /// Go source text being processed.
    pub source: String,
    /// Path of the source, used for naming and error reports.
    pub path: PathBuf,
    pub features: FeatureSet,
    pub file: Option<File>,
    /// Unformatted builder source.
    pub generated: Option<String>,
    /// Final bytes to write.
    pub output: Option<Vec<u8>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationContext {
    pub fn new(source: impl Into<String>, path: impl Into<PathBuf>, features: FeatureSet) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
            features,
            file: None,
            generated: None,
            output: None,
            diagnostics: Vec::new(),
        }
    }

    /// The analyzed file, or an error if the analyze phase has not run.
    pub fn file(&self) -> Result<&File> {
        self.file
            .as_ref()
            .ok_or_else(|| eyre!("no analyzed file - did the analyze phase run?"))
    }

    pub fn file_mut(&mut self) -> Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| eyre!("no analyzed file - did the analyze phase run?"))
    }

    pub fn add_info(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_warning())
    }

    /// Take the formatted output, or fail if the format phase has not run.
    pub fn take_output(&mut self) -> Result<Vec<u8>> {
        self.output
            .take()
            .ok_or_else(|| eyre!("no output - did the format phase run?"))
    }
}
