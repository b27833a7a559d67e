//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from one generation run.
#[derive(Debug)]
pub struct GenerateReport {
    pub source: PathBuf,
    /// Records that got a builder, in source order.
    pub records: Vec<RecordSummary>,
    /// Rendered warning diagnostics.
    pub warnings: Vec<String>,
    /// Where phase snapshots were written, if enabled.
    pub snapshot_dir: Option<PathBuf>,
    pub result: GenerationResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub name: String,
    pub fields: usize,
    pub required: usize,
}

/// Result of generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// The builder file was written to disk.
    Written { path: PathBuf },
    /// Dry-run preview.
    Preview { path: PathBuf, content: String },
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        match &self.result {
            GenerationResult::Written { path } => {
                self.render_records(out);
                out.newline();
                out.key_value("Generated", &path.display().to_string());
            }
            GenerationResult::Preview { path, content } => {
                out.divider(&path.display().to_string());
                out.preformatted(content.trim_end());
                out.divider("Summary");
                self.render_records(out);
            }
        }

        if let Some(dir) = &self.snapshot_dir {
            out.key_value("Pipeline snapshots written to", &dir.display().to_string());
        }
    }
}

impl GenerateReport {
    fn render_records(&self, out: &mut dyn Output) {
        out.section(&format!(
            "Builders for {} ({})",
            self.source.display(),
            self.records.len()
        ));
        for (i, record) in self.records.iter().enumerate() {
            out.numbered_item(
                i + 1,
                &format!(
                    "{} ({} of {} fields required)",
                    record.name, record.required, record.fields
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    fn report(result: GenerationResult) -> GenerateReport {
        GenerateReport {
            source: PathBuf::from("input.go"),
            records: vec![
                RecordSummary {
                    name: "A".to_string(),
                    fields: 3,
                    required: 2,
                },
                RecordSummary {
                    name: "C".to_string(),
                    fields: 1,
                    required: 0,
                },
            ],
            warnings: vec!["warning: ignored gosb tag value 'x' (at A.F1)".to_string()],
            snapshot_dir: None,
            result,
        }
    }

    #[test]
    fn test_render_written() {
        let mut out = BufferOutput::default();
        report(GenerationResult::Written {
            path: PathBuf::from("input_builder.go"),
        })
        .render(&mut out);

        assert_eq!(
            out.stdout,
            vec![
                "Builders for input.go (2):",
                "  1. A (2 of 3 fields required)",
                "  2. C (0 of 1 fields required)",
                "",
                "Generated: input_builder.go",
            ]
        );
        assert_eq!(out.stderr.len(), 1);
    }

    #[test]
    fn test_render_preview() {
        let mut out = BufferOutput::default();
        report(GenerationResult::Preview {
            path: PathBuf::from("input_builder.go"),
            content: "package main\n".to_string(),
        })
        .render(&mut out);

        assert_eq!(out.stdout[0], "── input_builder.go ──");
        assert_eq!(out.stdout[1], "package main");
        assert_eq!(out.stdout[2], "── Summary ──");
    }
}
