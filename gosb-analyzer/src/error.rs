use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::lexer::Span;

/// Result type for analyzer operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the source text and file name so error factories only need the
/// details specific to each failure.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    pub fn syntax_error(&self, message: impl Into<String>, span: Span) -> Box<Error> {
        Box::new(Error::Syntax {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    pub fn record_not_found(&self, name: impl Into<String>, span: Span) -> Box<Error> {
        Box::new(Error::RecordNotFound {
            src: self.named_source(),
            span: span.into(),
            name: name.into(),
        })
    }

    pub fn generic_record(&self, name: impl Into<String>, span: Span) -> Box<Error> {
        Box::new(Error::GenericRecord {
            src: self.named_source(),
            span: span.into(),
            name: name.into(),
        })
    }

    pub fn field_tag_error(
        &self,
        record: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
        span: Span,
    ) -> Box<Error> {
        Box::new(Error::FieldTag {
            src: self.named_source(),
            span: span.into(),
            record: record.into(),
            field: field.into(),
            reason: reason.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(gosb::syntax_error))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("record not found: '{name}' is not a struct type")]
    #[diagnostic(
        code(gosb::record_not_found),
        help("only struct types can be marked with '//go:generate gosb'")
    )]
    RecordNotFound {
        #[source_code]
        src: NamedSource<String>,
        #[label("marked for generation here")]
        span: SourceSpan,
        name: String,
    },

    #[error("generic struct '{name}' is not supported")]
    #[diagnostic(
        code(gosb::generic_record),
        help("remove the directive or wrap an instantiation in a non-generic struct")
    )]
    GenericRecord {
        #[source_code]
        src: NamedSource<String>,
        #[label("type parameters declared here")]
        span: SourceSpan,
        name: String,
    },

    #[error("parsing {record}.{field} field: {reason}")]
    #[diagnostic(code(gosb::field_tag))]
    FieldTag {
        #[source_code]
        src: NamedSource<String>,
        #[label("malformed tag")]
        span: SourceSpan,
        record: String,
        field: String,
        reason: String,
    },
}
