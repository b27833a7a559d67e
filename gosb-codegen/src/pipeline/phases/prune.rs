//! Prune phase - drops imports the generated file does not need.

use eyre::Result;
use gosb_analyzer::prune_imports;

use crate::pipeline::{GenerationContext, Phase};

pub struct PrunePhase;

impl Phase for PrunePhase {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let file = ctx.file_mut()?;
        let kept = prune_imports(&file.imports, &file.records);
        let dropped = file.imports.len() - kept.len();
        file.imports = kept;

        if dropped > 0 {
            ctx.add_info(self.name(), format!("dropped {dropped} unused import(s)"));
        }
        Ok(())
    }
}
