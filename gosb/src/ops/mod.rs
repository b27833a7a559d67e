//! Core operations.
//!
//! Business logic for gosb, separated from argument parsing and output
//! rendering.

pub mod generate;

pub use generate::{GenerateOptions, generate};
