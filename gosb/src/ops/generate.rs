//! Generate operation - builder file from a Go source.

use std::path::Path;

use eyre::{Context, Result};
use gosb_codegen::{
    Formatter,
    pipeline::{GenerationContext, Pipeline, SnapshotPlugin},
};
use gosb_core::{FeatureSet, OutputFile, output_path};
use tracing::info;

use crate::reports::{GenerateReport, GenerationResult, RecordSummary};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Go file to read.
    pub source: &'a Path,
    pub features: FeatureSet,
    pub formatter: Box<dyn Formatter>,
    /// Whether to print instead of writing the file.
    pub dry_run: bool,
    /// Where to write per-phase snapshots, if anywhere.
    pub snapshot_dir: Option<&'a Path>,
}

/// Execute the generate operation.
///
/// Runs the pipeline on the source file and writes the builder file next to
/// it, or returns its content on a dry run.
pub fn generate(opts: GenerateOptions) -> Result<GenerateReport> {
    let mut pipeline = Pipeline::new().formatter(opts.formatter);
    if let Some(dir) = opts.snapshot_dir {
        pipeline = pipeline.plugin(SnapshotPlugin::with_output_dir(dir));
    }

    let mut ctx = pipeline.run_file(opts.source, opts.features)?;

    let records = summarize(&ctx)?;
    let warnings = ctx.warnings().map(ToString::to_string).collect();

    let output = OutputFile::new(output_path(opts.source), ctx.take_output()?);
    let result = if opts.dry_run {
        GenerationResult::Preview {
            path: output.path().to_path_buf(),
            content: String::from_utf8_lossy(output.content()).into_owned(),
        }
    } else {
        output
            .write()
            .wrap_err_with(|| format!("failed to write '{}'", output.path().display()))?;
        info!(path = %output.path().display(), "wrote builder file");
        GenerationResult::Written {
            path: output.path().to_path_buf(),
        }
    };

    Ok(GenerateReport {
        source: opts.source.to_path_buf(),
        records,
        warnings,
        snapshot_dir: opts.snapshot_dir.map(Path::to_path_buf),
        result,
    })
}

fn summarize(ctx: &GenerationContext) -> Result<Vec<RecordSummary>> {
    Ok(ctx
        .file()?
        .records
        .iter()
        .map(|record| RecordSummary {
            name: record.name.clone(),
            fields: record.fields.len(),
            required: record.required_count(),
        })
        .collect())
}
