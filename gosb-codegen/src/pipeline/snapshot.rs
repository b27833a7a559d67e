//! Pipeline snapshot plugin for debugging.
//!
//! Captures the context after each phase so the intermediate model and
//! generated text can be inspected as JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::Result;
use gosb_core::{Diagnostic, File};
use serde::Serialize;

use super::{GenerationContext, Plugin};

/// The pipeline state after a phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSnapshot {
    /// The phase that just completed.
    pub phase: String,

    /// The analyzed file (available after "analyze").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<File>,

    /// Unformatted builder source (available after "generate").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,

    pub diagnostics: Vec<Diagnostic>,
}

/// A plugin that writes a [`PhaseSnapshot`] as `<phase>.json` after every
/// phase.
///
/// # Example
///
/// ```ignore
/// let plugin = SnapshotPlugin::with_output_dir(".gosb/debug");
/// let ctx = Pipeline::new().plugin(plugin).run(source, path, features)?;
/// ```
pub struct SnapshotPlugin {
    output_dir: PathBuf,
}

impl SnapshotPlugin {
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

fn write_snapshot(dir: &Path, snapshot: &PhaseSnapshot) -> Result<()> {
    let path = dir.join(format!("{}.json", snapshot.phase));
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json)?;
    Ok(())
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut GenerationContext) -> Result<()> {
        let snapshot = PhaseSnapshot {
            phase: phase.to_string(),
            file: ctx.file.clone(),
            generated: ctx.generated.clone(),
            diagnostics: ctx.diagnostics.clone(),
        };

        fs::create_dir_all(&self.output_dir)?;
        write_snapshot(&self.output_dir, &snapshot)
    }
}
