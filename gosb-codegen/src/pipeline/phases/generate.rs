//! Generate phase - renders builder source from the model.

use eyre::Result;

use crate::{
    Generator,
    pipeline::{GenerationContext, Phase},
};

pub struct GeneratePhase;

impl Phase for GeneratePhase {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let generator = Generator::new(ctx.features.clone());
        let generated = generator.generate(ctx.file()?)?;
        ctx.generated = Some(generated);
        Ok(())
    }
}
