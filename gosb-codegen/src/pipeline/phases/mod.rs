//! Built-in pipeline phases.
//!
//! - [`AnalyzePhase`] - parses the Go source into the model
//! - [`PrunePhase`] - keeps only the imports field types refer to
//! - [`GeneratePhase`] - renders the builder source
//! - [`FormatPhase`] - runs the configured formatter

mod analyze;
mod format;
mod generate;
mod prune;

pub use analyze::AnalyzePhase;
pub use format::FormatPhase;
pub use generate::GeneratePhase;
pub use prune::PrunePhase;
