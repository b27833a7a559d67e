//! Go source analysis for the gosb builder generator.
//!
//! Reads one Go file, selects the struct declarations marked with a
//! `//go:generate gosb` doc comment and turns them into the
//! [`gosb_core::File`] model. Only the package clause, imports and type
//! declarations are understood; everything else is skipped.
//!
//! # Module Organization
//!
//! - [`lexer`] - Tokens, comments and automatic semicolons
//! - [`parser`] - Package, import and type declarations
//! - [`types`] - Type expressions and their canonical text
//! - [`tag`] - Struct tag unquoting and lookup
//! - [`prune`] - Import pruning against field types

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod analyze;
mod error;
pub mod lexer;
pub mod parser;
pub mod prune;
pub mod tag;
pub mod types;

pub use analyze::{Analysis, analyze_file, analyze_str};
pub use error::{Error, Result, SourceContext};
pub use prune::prune_imports;
