//! Generation pipeline.
//!
//! A [`Pipeline`] runs the phases that turn a Go source file into builder
//! source (analyze → prune → generate → format) over a shared
//! [`GenerationContext`], with plugin hooks before and after each phase.
//!
//! # Example
//!
//! ```ignore
//! use gosb_codegen::pipeline::Pipeline;
//!
//! let mut ctx = Pipeline::new().run(source, "input.go", features)?;
//!
//! for diag in ctx.warnings() {
//!     eprintln!("{diag}");
//! }
//!
//! let bytes = ctx.take_output()?;
//! ```

mod context;
mod phase;
pub mod phases;
mod plugin;
mod runner;
mod snapshot;

pub use context::GenerationContext;
pub use phase::Phase;
pub use plugin::Plugin;
pub use runner::Pipeline;
pub use snapshot::{PhaseSnapshot, SnapshotPlugin};
