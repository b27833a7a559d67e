//! Format phase - produces the bytes to write.

use eyre::{Result, eyre};
use tracing::debug;

use crate::{
    format::Formatter,
    pipeline::{GenerationContext, Phase},
};

pub struct FormatPhase {
    formatter: Box<dyn Formatter>,
}

impl FormatPhase {
    pub fn new(formatter: Box<dyn Formatter>) -> Self {
        Self { formatter }
    }
}

impl Phase for FormatPhase {
    fn name(&self) -> &'static str {
        "format"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let generated = ctx
            .generated
            .as_deref()
            .ok_or_else(|| eyre!("no generated source - did the generate phase run?"))?;

        debug!(formatter = self.formatter.name(), "formatting");
        ctx.output = Some(self.formatter.format(generated)?);
        Ok(())
    }
}
