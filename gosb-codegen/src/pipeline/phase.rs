//! Pipeline phase trait.

use eyre::Result;

use super::GenerationContext;

/// A phase in the generation pipeline.
///
/// Phases run in order and read and modify the shared context. Fatal
/// problems are returned as errors and stop the run; anything else is
/// recorded as a diagnostic.
///
/// Built-in phases:
/// - `AnalyzePhase` - parses the source into the model
/// - `PrunePhase` - drops imports no field refers to
/// - `GeneratePhase` - renders the builders
/// - `FormatPhase` - produces the final bytes
pub trait Phase: Send + Sync {
    /// The name of this phase (used in diagnostics and plugin hooks).
    fn name(&self) -> &'static str;

    /// Run this phase on the generation context.
    ///
    /// # Errors
    ///
    /// Returns an error if the phase fails fatally.
    fn run(&self, ctx: &mut GenerationContext) -> Result<()>;
}
