//! Analyze phase - turns Go source into the generation model.

use eyre::Result;
use tracing::debug;

use crate::pipeline::{GenerationContext, Phase};

pub struct AnalyzePhase;

impl Phase for AnalyzePhase {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let analysis =
            gosb_analyzer::analyze_str(&ctx.source, &ctx.path).map_err(|e| eyre::Report::new(*e))?;

        debug!(
            records = analysis.file.records.len(),
            imports = analysis.file.imports.len(),
            "analyzed {}",
            ctx.path.display()
        );

        ctx.diagnostics.extend(analysis.diagnostics);
        ctx.file = Some(analysis.file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gosb_core::FeatureSet;

    use super::*;

    #[test]
    fn test_sets_file_and_diagnostics() {
        let mut ctx = GenerationContext::new(
            "package main\n//go:generate gosb\ntype A struct {\n\tF1 int `gosb:\"maybe\"`\n}\n",
            "input.go",
            FeatureSet::new(),
        );

        AnalyzePhase.run(&mut ctx).unwrap();

        assert_eq!(ctx.file().unwrap().records.len(), 1);
        assert_eq!(ctx.warnings().count(), 1);
    }

    #[test]
    fn test_syntax_error_is_downcastable() {
        let mut ctx = GenerationContext::new("type A int\n", "input.go", FeatureSet::new());

        let err = AnalyzePhase.run(&mut ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<gosb_analyzer::Error>(),
            Some(gosb_analyzer::Error::Syntax { .. })
        ));
    }
}
