//! Builder generation for gosb.
//!
//! Renders Go builder source from the model produced by `gosb-analyzer`
//! and drives the full analyze → prune → generate → format pipeline.
//!
//! - [`Generator`] - renders builders for every record in a [`gosb_core::File`]
//! - [`format`] - the [`Normalizer`] and [`Gofmt`] formatters
//! - [`mask`] - required-field bitmask layout
//! - [`pipeline`] - phase orchestration and plugins
//! - [`builder`] - indentation-aware code building

pub mod builder;
mod error;
pub mod format;
mod generator;
pub mod mask;
pub mod pipeline;

pub use error::{Error, Result};
pub use format::{Formatter, Gofmt, Normalizer};
pub use generator::Generator;
