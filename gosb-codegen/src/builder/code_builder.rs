//! Code builder utility for generating properly indented code.

use super::{CodeFragment, Renderable};

const INDENT: &str = "\t";

/// Output sink for generated code with explicit indentation depth.
///
/// Indentation is always one tab per level, as `gofmt` writes it.
///
/// A fresh builder is created for every generation, so no state carries
/// over between files.
///
/// # Example
///
/// ```
/// use gosb_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::go();
/// builder
///     .push_line("func main() {")
///     .push_indent()
///     .push_line("println(\"hello\")")
///     .push_dedent()
///     .push_line("}");
///
/// assert_eq!(builder.build(), "func main() {\n\tprintln(\"hello\")\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    buffer: String,
}

impl CodeBuilder {
    pub fn go() -> Self {
        Self {
            indent_level: 0,
            buffer: String::new(),
        }
    }

    /// Add a line of code with current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a `//` comment line.
    pub fn push_comment(&mut self, text: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str("// ");
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    /// Emit a Renderable node.
    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        for fragment in node.to_fragments() {
            self.apply_fragment(fragment);
        }
        self
    }

    /// Apply a single code fragment.
    pub fn apply_fragment(&mut self, fragment: CodeFragment) {
        match fragment {
            CodeFragment::Line(s) => {
                self.push_line(&s);
            }
            CodeFragment::Blank => {
                self.push_blank();
            }
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.push_line(&header);
                self.push_indent();
                for f in body {
                    self.apply_fragment(f);
                }
                self.push_dedent();
                if let Some(c) = close {
                    self.push_line(&c);
                }
            }
            CodeFragment::Indent(fragments) => {
                self.push_indent();
                for f in fragments {
                    self.apply_fragment(f);
                }
                self.push_dedent();
            }
        }
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let mut builder = CodeBuilder::go();
        builder
            .push_line("type A struct {")
            .push_indent()
            .push_line("F1 int")
            .push_dedent()
            .push_line("}");

        assert_eq!(builder.build(), "type A struct {\n\tF1 int\n}\n");
    }

    #[test]
    fn test_blank_line_has_no_indent() {
        let mut builder = CodeBuilder::go();
        builder.push_indent().push_line("a").push_blank().push_line("b");
        assert_eq!(builder.build(), "\ta\n\n\tb\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut builder = CodeBuilder::go();
        builder.push_dedent().push_line("x");
        assert_eq!(builder.build(), "x\n");
    }

    #[test]
    fn test_comment_is_indented() {
        let mut builder = CodeBuilder::go();
        builder.push_indent().push_comment("note");
        assert_eq!(builder.build(), "\t// note\n");
    }

    #[test]
    fn test_emit_nested_blocks() {
        struct Func;
        impl Renderable for Func {
            fn to_fragments(&self) -> Vec<CodeFragment> {
                vec![CodeFragment::braced(
                    "func f() {",
                    vec![
                        CodeFragment::braced("if ok {", vec![CodeFragment::line("return")]),
                        CodeFragment::blank(),
                        CodeFragment::line("panic(nil)"),
                    ],
                )]
            }
        }

        let mut builder = CodeBuilder::go();
        builder.emit(&Func);
        assert_eq!(
            builder.build(),
            "func f() {\n\tif ok {\n\t\treturn\n\t}\n\n\tpanic(nil)\n}\n"
        );
    }

    #[test]
    fn test_indent_fragment() {
        let mut builder = CodeBuilder::go();
        for fragment in [
            CodeFragment::line("/**"),
            CodeFragment::indent(vec![CodeFragment::line("doc")]),
            CodeFragment::line("*/"),
        ] {
            builder.apply_fragment(fragment);
        }
        assert_eq!(builder.build(), "/**\n\tdoc\n*/\n");
    }
}
