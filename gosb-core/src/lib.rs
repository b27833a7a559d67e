//! Core model and utilities for the gosb builder generator.
//!
//! This crate provides the types shared by the analyzer, the code generator
//! and the command line front end.

mod diagnostic;
mod feature;
mod file;
pub mod labels;
mod model;
mod utils;

pub use diagnostic::{Diagnostic, Severity};
pub use feature::{Feature, FeatureError, FeatureSet};
pub use file::{OutputFile, output_file_name, output_path};
pub use model::{Classification, Field, File, Import, Record, TypeDescriptor};
// String utilities
pub use utils::{capitalize, embedded_field_name, is_private_name};
