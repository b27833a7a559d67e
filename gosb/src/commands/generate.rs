use std::path::PathBuf;

use clap::{Args, ValueEnum};
use eyre::Result;
use gosb_codegen::{Formatter, Gofmt, Normalizer};
use gosb_core::FeatureSet;

use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Input Go source file
    #[arg(long)]
    pub source: PathBuf,

    /// Comma separated list of features [ptr,arr,opt]
    #[arg(long, env = "GOSB_FEATURES", default_value = "")]
    pub features: FeatureSet,

    /// Formatter applied to the generated file
    #[arg(long, value_enum, default_value_t = FormatterKind::Normalize)]
    pub formatter: FormatterKind,

    /// Print the generated file instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON snapshot of the pipeline state after each phase
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatterKind {
    /// Built-in layout normalizer
    Normalize,
    /// External gofmt executable
    Gofmt,
}

impl FormatterKind {
    fn build(self) -> Box<dyn Formatter> {
        match self {
            Self::Normalize => Box::new(Normalizer),
            Self::Gofmt => Box::new(Gofmt::new()),
        }
    }
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::generate(GenerateOptions {
            source: &self.source,
            features: self.features.clone(),
            formatter: self.formatter.build(),
            dry_run: self.dry_run,
            snapshot_dir: self.snapshot_dir.as_deref(),
        })?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
