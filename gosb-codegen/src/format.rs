//! Final formatting of generated source.

use std::{
    borrow::Cow,
    io::Write,
    process::{Command, Stdio},
};

use crate::{Error, Result};

/// Turns raw generated text into the bytes that are written to disk.
pub trait Formatter: Send + Sync {
    fn name(&self) -> &'static str;

    fn format(&self, source: &str) -> Result<Vec<u8>>;
}

/// In-process formatter that tidies layout without understanding Go.
///
/// Trailing whitespace is stripped, blank line runs collapse to one, blank
/// lines right after `{` or before `}` are removed, the import block is
/// sorted with the standard library first, and the text ends with exactly one
/// newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Formatter for Normalizer {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn format(&self, source: &str) -> Result<Vec<u8>> {
        Ok(normalize(source).into_bytes())
    }
}

fn normalize(source: &str) -> String {
    let lines: Vec<&str> = source.lines().map(str::trim_end).collect();
    let lines = sort_import_block(&lines);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            let after_open = out.last().is_none_or(|prev| prev.is_empty() || prev.ends_with('{'));
            let before_close = lines[i + 1..]
                .iter()
                .find(|next| !next.is_empty())
                .is_none_or(|next| next.trim_start().starts_with('}'));
            if after_open || before_close {
                continue;
            }
        }
        out.push(line.as_ref());
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Rewrite the first `import (...)` block with sorted, grouped entries.
fn sort_import_block<'a>(lines: &[&'a str]) -> Vec<Cow<'a, str>> {
    let Some(start) = lines.iter().position(|line| *line == "import (") else {
        return lines.iter().map(|line| Cow::Borrowed(*line)).collect();
    };
    let Some(len) = lines[start..].iter().position(|line| *line == ")") else {
        return lines.iter().map(|line| Cow::Borrowed(*line)).collect();
    };
    let end = start + len;

    let mut specs: Vec<&str> = lines[start + 1..end]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();
    specs.sort_by(|a, b| import_key(a).cmp(&import_key(b)));
    specs.dedup();

    let (stdlib, others): (Vec<&str>, Vec<&str>) =
        specs.into_iter().partition(|spec| is_std(spec));

    let mut out: Vec<Cow<'a, str>> = lines[..=start].iter().map(|l| Cow::Borrowed(*l)).collect();
    out.extend(stdlib.iter().map(|spec| Cow::Owned(format!("\t{spec}"))));
    if !stdlib.is_empty() && !others.is_empty() {
        out.push(Cow::Borrowed(""));
    }
    out.extend(others.iter().map(|spec| Cow::Owned(format!("\t{spec}"))));
    out.extend(lines[end..].iter().map(|l| Cow::Borrowed(*l)));
    out
}

/// Import path of a spec line, without quotes.
fn spec_path(spec: &str) -> &str {
    let quoted = spec.rsplit(' ').next().unwrap_or(spec);
    quoted.trim_matches(|c| c == '"' || c == '`')
}

fn import_key(spec: &str) -> (&str, &str) {
    (spec_path(spec), spec)
}

/// Standard library paths have no dot in their first element.
fn is_std(spec: &str) -> bool {
    let path = spec_path(spec);
    let first = path.split('/').next().unwrap_or(path);
    !first.contains('.')
}

/// Formatter that pipes the text through the `gofmt` executable.
#[derive(Debug, Clone)]
pub struct Gofmt {
    program: String,
}

impl Gofmt {
    pub fn new() -> Self {
        Self::with_program("gofmt")
    }

    /// Use a specific executable instead of `gofmt` from `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Gofmt {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for Gofmt {
    fn name(&self) -> &'static str {
        "gofmt"
    }

    fn format(&self, source: &str) -> Result<Vec<u8>> {
        let failed = |message: String| Error::Format {
            formatter: "gofmt",
            message,
        };

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failed(format!("failed to run {}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| failed(format!("failed to write input: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| failed(format!("failed to wait for {}: {e}", self.program)))?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(source: &str) -> String {
        String::from_utf8(Normalizer.format(source).unwrap()).unwrap()
    }

    #[test]
    fn test_strips_trailing_whitespace_and_blank_runs() {
        assert_eq!(
            normalized("package main  \n\n\n\ntype A int\t\n"),
            "package main\n\ntype A int\n"
        );
    }

    #[test]
    fn test_removes_blank_lines_inside_braces() {
        assert_eq!(
            normalized("func f() {\n\n\treturn\n\n}\n"),
            "func f() {\n\treturn\n}\n"
        );
    }

    #[test]
    fn test_single_trailing_newline() {
        assert_eq!(normalized("\n\npackage main\n\n\n"), "package main\n");
        assert_eq!(normalized("package main"), "package main\n");
    }

    #[test]
    fn test_sorts_and_groups_imports() {
        let source = "package main\n\nimport (\n\t\"github.com/samber/mo\"\n\tt1 \"time\"\n\t\"errors\"\n)\n";
        assert_eq!(
            normalized(source),
            "package main\n\nimport (\n\t\"errors\"\n\tt1 \"time\"\n\n\t\"github.com/samber/mo\"\n)\n"
        );
    }

    #[test]
    fn test_idempotent() {
        let source = "package main\n\nimport (\n\t\"time\"\n\n\t\"github.com/samber/mo\"\n)\n\nfunc f() {\n\t/**\n\t\tdoc\n\t*/\n\n\treturn\n}\n";
        let once = normalized(source);
        assert_eq!(once, source);
        assert_eq!(normalized(&once), once);
    }

    #[test]
    fn test_missing_gofmt_is_a_format_error() {
        let err = Gofmt::with_program("gosb-test-no-such-formatter")
            .format("package main\n")
            .unwrap_err();
        assert!(matches!(err, Error::Format { formatter: "gofmt", .. }));
    }
}
