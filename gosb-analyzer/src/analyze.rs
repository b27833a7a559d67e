use std::path::Path;

use gosb_core::{
    Diagnostic, Field, File, Import, Record, TypeDescriptor, embedded_field_name,
    labels::{self, TAG_KEY, TAG_OPTIONAL, TAG_REQUIRED},
};
use tracing::{debug, warn};

use crate::{
    Error, Result,
    error::SourceContext,
    parser::{self, ImportSpec, TypeSpec},
    tag,
    types::{FieldDecl, TypeExpr},
};

const PHASE: &str = "analyze";

/// Output of analyzing one source file.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub file: File,
    /// Non-fatal findings such as ignored tag values.
    pub diagnostics: Vec<Diagnostic>,
}

/// Analyze a Go file on disk.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<Analysis> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    analyze_str(&content, path)
}

/// Analyze Go source text. `path` names the file in the model and in error
/// reports; it is not read.
pub fn analyze_str(src: &str, path: &Path) -> Result<Analysis> {
    let ctx = SourceContext::new(src, path.display().to_string());
    let source = parser::parse(src).map_err(|e| ctx.syntax_error(e.message, e.span))?;

    let imports = source.imports.iter().map(to_import).collect();

    let mut diagnostics = Vec::new();
    let mut records = Vec::new();
    // Marked `type (...)` groups: (group, first spec, has a struct).
    let mut marked_groups: Vec<(usize, &TypeSpec<'_>, bool)> = Vec::new();

    for spec in &source.types {
        let own = has_directive(&spec.doc);
        let via_group = spec.group.filter(|_| has_directive(&spec.group_doc));
        if !own && via_group.is_none() {
            continue;
        }

        let is_struct = matches!(spec.ty, TypeExpr::Struct(_));
        if let Some(group) = via_group {
            match marked_groups.iter_mut().find(|(id, _, _)| *id == group) {
                Some(entry) => entry.2 |= is_struct,
                None => marked_groups.push((group, spec, is_struct)),
            }
            if !own && !is_struct {
                debug!(name = spec.name, "skipping non-struct type in marked group");
                continue;
            }
        }

        let record = build_record(&ctx, spec, &mut diagnostics)?;
        debug!(
            record = %record.name,
            fields = record.fields.len(),
            required = record.required_count(),
            "selected record"
        );
        records.push(record);
    }

    if let Some((_, spec, _)) = marked_groups.iter().find(|(_, _, has_struct)| !has_struct) {
        return Err(ctx.record_not_found(spec.name, spec.span));
    }

    if records.is_empty() {
        debug!(file = %ctx.filename(), "no records marked for generation");
    }

    let file = File {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: parent_dir(path),
        package_name: source.package.to_string(),
        imports,
        records,
    };

    Ok(Analysis { file, diagnostics })
}

fn has_directive(doc: &[&str]) -> bool {
    doc.iter().any(|text| labels::is_directive(text))
}

fn parent_dir(path: &Path) -> String {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
        _ => ".".to_string(),
    }
}

fn to_import(spec: &ImportSpec<'_>) -> Import {
    match spec.name {
        Some(alias) => Import::aliased(spec.path, alias),
        None => Import::new(spec.path),
    }
}

fn build_record(
    ctx: &SourceContext,
    spec: &TypeSpec<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Record> {
    if let Some(params) = spec.type_params {
        return Err(ctx.generic_record(spec.name, params));
    }

    let TypeExpr::Struct(decls) = &spec.ty else {
        return Err(ctx.record_not_found(spec.name, spec.span));
    };

    let mut fields = Vec::new();
    for decl in decls {
        fields.extend(build_fields(ctx, spec.name, decl, diagnostics)?);
    }

    Ok(Record::new(spec.name, fields))
}

/// One field per declared name; an embedded field gets its name from the type.
fn build_fields(
    ctx: &SourceContext,
    record: &str,
    decl: &FieldDecl,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<Field>> {
    let ty = TypeDescriptor::new(decl.ty.to_string());

    let names: Vec<String> = if decl.is_embedded() {
        let name = embedded_field_name(&ty.name).ok_or_else(|| {
            ctx.syntax_error(
                format!("cannot derive a field name from embedded type '{}'", ty.name),
                decl.span,
            )
        })?;
        vec![name.to_string()]
    } else {
        decl.names.iter().map(|ident| ident.name.clone()).collect()
    };

    let required = match &decl.tag {
        Some(tag) => {
            let value = tag::unquote(&tag.literal).map_err(|e| {
                ctx.field_tag_error(record, &names[0], format!("unquote field tag: {e}"), tag.span)
            })?;
            required_override(record, &names[0], tag::lookup(&value, TAG_KEY), diagnostics)
        }
        None => None,
    };

    Ok(names
        .into_iter()
        .map(|name| {
            let field = Field::new(name, ty.clone());
            match required {
                Some(required) => field.with_required(required),
                None => field,
            }
        })
        .collect())
}

fn required_override(
    record: &str,
    field: &str,
    value: Option<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<bool> {
    match value.as_deref() {
        Some(TAG_REQUIRED) => Some(true),
        Some(TAG_OPTIONAL) => Some(false),
        Some(other) if !other.is_empty() => {
            warn!(record, field, value = other, "ignored unknown tag value");
            diagnostics.push(
                Diagnostic::warning(
                    PHASE,
                    format!(
                        "ignored {TAG_KEY} tag value '{other}', expected '{TAG_REQUIRED}' or '{TAG_OPTIONAL}'"
                    ),
                )
                .at(format!("{record}.{field}")),
            );
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use gosb_core::Classification;

    use super::*;

    fn analyze(src: &str) -> Analysis {
        analyze_str(src, Path::new("input.go")).unwrap()
    }

    #[test]
    fn test_file_metadata() {
        let analysis = analyze_str("package models\n", Path::new("pkg/models/user.go")).unwrap();
        assert_eq!(analysis.file.name, "user.go");
        assert_eq!(analysis.file.path, "pkg/models");
        assert_eq!(analysis.file.package_name, "models");
        assert!(analysis.file.records.is_empty());

        let analysis = analyze("package main\n");
        assert_eq!(analysis.file.path, ".");
    }

    #[test]
    fn test_defaults_and_overrides() {
        let analysis = analyze(
            r#"package main

//go:generate gosb -source=input.go
type A struct {
	F1 int
	F2 *int
	F3 *int `gosb:"required"`
	F4 []int `gosb:"optional"`
	F5 mo.Option[int]
}
"#,
        );

        let fields = &analysis.file.records[0].fields;
        let summary: Vec<(&str, Classification, bool)> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.classification, f.required))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("F1", Classification::Other, true),
                ("F2", Classification::Pointer, false),
                ("F3", Classification::Pointer, true),
                ("F4", Classification::Array, false),
                ("F5", Classification::Option, false),
            ]
        );
    }

    #[test]
    fn test_unknown_tag_value_is_reported() {
        let analysis = analyze(
            r#"package main

//go:generate gosb
type A struct {
	F1 int `gosb:"mandatory"`
}
"#,
        );

        assert!(analysis.file.records[0].fields[0].required);
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].location.as_deref(), Some("A.F1"));
    }

    #[test]
    fn test_multi_name_fields() {
        let analysis = analyze("package main\n//go:generate gosb\ntype A struct{ x, Y int }\n");
        let fields = &analysis.file.records[0].fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "x");
        assert!(fields[0].is_private);
        assert_eq!(fields[1].name, "Y");
        assert!(!fields[1].is_private);
    }

    #[test]
    fn test_generic_record_rejected() {
        let err = analyze_str(
            "package main\n//go:generate gosb\ntype A[T any] struct{ F T }\n",
            Path::new("input.go"),
        )
        .unwrap_err();
        assert!(matches!(*err, Error::GenericRecord { ref name, .. } if name == "A"));
    }
}
