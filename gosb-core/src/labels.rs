//! Fixed tokens recognised in Go sources.

/// Tool name, also the struct tag key.
pub const TOOL_NAME: &str = "gosb";

/// Name written into the generated-file header.
pub const GENERATOR_NAME: &str = "go-struct-builder";

/// Directive that marks a type declaration for generation.
pub const GENERATE_DIRECTIVE: &str = "go:generate";

/// Tokens that must all appear in a single doc comment line.
pub const DIRECTIVE_TOKENS: [&str; 2] = [GENERATE_DIRECTIVE, TOOL_NAME];

/// Struct tag key looked up on every field.
pub const TAG_KEY: &str = TOOL_NAME;

/// Tag value forcing a field to be required.
pub const TAG_REQUIRED: &str = "required";

/// Tag value forcing a field to be optional.
pub const TAG_OPTIONAL: &str = "optional";

/// Generic wrapper recognised as an optional value.
pub const OPTION_TYPE: &str = "mo.Option";

/// Constructor of a present optional value in generated code.
pub const OPTION_SOME: &str = "mo.Some";

/// Suffix appended to the input file stem for the generated file.
pub const OUTPUT_SUFFIX: &str = "_builder";

/// Extension of Go source files.
pub const GO_EXTENSION: &str = "go";

/// Returns true if `text` contains every directive token.
pub fn is_directive(text: &str) -> bool {
    DIRECTIVE_TOKENS.iter().all(|token| text.contains(token))
}
