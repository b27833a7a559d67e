//! Analyzer scenarios run against Go files on disk.

use std::path::PathBuf;

use gosb_analyzer::{Analysis, Error, analyze_file, prune_imports};
use gosb_core::{Classification, Field, Import, Record, TypeDescriptor};
use tempfile::TempDir;

/// Write `source` to a temporary `input.go` and analyze it.
fn analyze_source(source: &str) -> (TempDir, PathBuf, gosb_analyzer::Result<Analysis>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("input.go");
    std::fs::write(&path, source).expect("Failed to write source");
    let result = analyze_file(&path);
    (dir, path, result)
}

fn analyze_ok(source: &str) -> Analysis {
    let (_dir, _path, result) = analyze_source(source);
    result.expect("analysis failed")
}

fn field(name: &str, ty: &str, required: bool) -> Field {
    Field::new(name, TypeDescriptor::new(ty)).with_required(required)
}

#[test]
fn test_empty_file() {
    let (dir, _path, result) = analyze_source("package test42");
    let file = result.unwrap().file;

    assert_eq!(file.name, "input.go");
    assert_eq!(file.path, dir.path().display().to_string());
    assert_eq!(file.package_name, "test42");
    assert!(file.imports.is_empty());
    assert!(file.records.is_empty());
}

#[test]
fn test_no_directive_selects_nothing() {
    let analysis = analyze_ok(
        r#"
        package main

        type A struct {
            F1 int
        }"#,
    );

    assert!(analysis.file.records.is_empty());
}

#[test]
fn test_aliased_import() {
    let analysis = analyze_ok(
        r#"
        package main
        import t1 "time"

        //go:generate gosb -source=input.go
        type A struct {
            F1 t1.Time
        }"#,
    );

    assert_eq!(
        analysis.file.imports,
        vec![Import::aliased("\"time\"", "t1")]
    );
    assert_eq!(
        analysis.file.records,
        vec![Record::new("A", vec![field("F1", "t1.Time", true)])]
    );
}

#[test]
fn test_unused_import_is_pruned() {
    let analysis = analyze_ok(
        r#"
        package main

        import "time"
        import "go/ast"

        //go:generate gosb -source=input.go
        type A struct {
            F1 time.Time
        }"#,
    );

    assert_eq!(analysis.file.imports.len(), 2);
    assert_eq!(
        prune_imports(&analysis.file.imports, &analysis.file.records),
        vec![Import::new("\"time\"")]
    );
}

#[test]
fn test_public_and_private_fields() {
    let analysis = analyze_ok(
        r#"
        package main

        //go:generate gosb -source=input.go
        type A struct {
            F1 int
            f2 string
        }"#,
    );

    let record = &analysis.file.records[0];
    assert!(!record.is_private);
    assert!(!record.fields[0].is_private);
    assert!(record.fields[1].is_private);
    assert!(record.fields.iter().all(|f| f.required));
}

#[test]
fn test_required_and_optional_tags() {
    let analysis = analyze_ok(
        "
        package main

        //go:generate gosb -source=input.go
        type A struct {
            F1 int
            F2 *int
            F3 int `gosb:\"optional\"`
            F4 *int `gosb:\"required\"`
        }",
    );

    assert_eq!(
        analysis.file.records[0].fields,
        vec![
            field("F1", "int", true),
            field("F2", "*int", false),
            field("F3", "int", false),
            field("F4", "*int", true),
        ]
    );
}

#[test]
fn test_feature_shaped_fields() {
    let analysis = analyze_ok(
        "
        package main

        //go:generate gosb -source=input.go -features=ptr,arr,opt
        type A struct {
            F1 **int
            F2 []int
            F3 mo.Option[int]
            F4 mo.Option[int] `gosb:\"required\"`
        }",
    );

    let summary: Vec<(Classification, bool)> = analysis.file.records[0]
        .fields
        .iter()
        .map(|f| (f.ty.classification, f.required))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Classification::Pointer, false),
            (Classification::Array, true),
            (Classification::Option, false),
            (Classification::Option, true),
        ]
    );
}

#[test]
fn test_embedded_fields() {
    let analysis = analyze_ok(
        r#"
        package main

        import "time"

        //go:generate gosb -source=input.go
        type A struct {
            B
            *C
            time.Time
            *mo.Future[int]
        }"#,
    );

    let names: Vec<&str> = analysis.file.records[0]
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["B", "C", "Time", "Future"]);
}

#[test]
fn test_private_record() {
    let analysis = analyze_ok(
        r#"
        package main

        //go:generate gosb -source=input.go
        type a struct {
            f1 int
        }"#,
    );

    assert!(analysis.file.records[0].is_private);
}

#[test]
fn test_grouped_declaration_directive() {
    let analysis = analyze_ok(
        r#"
        package main

        //go:generate gosb -source=input.go
        type (
            A struct{ F1 int }
            B struct{ F2 string }
        )

        type C struct{ F3 int }
        "#,
    );

    let names: Vec<&str> = analysis
        .file
        .records
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_marked_group_skips_non_struct_types() {
    let analysis = analyze_ok(
        r#"
        package main

        //go:generate gosb
        type (
            A struct{ F int }
            B int
            C func() error
        )
        "#,
    );

    assert_eq!(
        analysis.file.records,
        vec![Record::new("A", vec![field("F", "int", true)])]
    );
}

#[test]
fn test_marked_group_without_struct() {
    let (_dir, _path, result) = analyze_source(
        r#"
        package main

        //go:generate gosb
        type (
            B int
            C string
        )
        "#,
    );

    let err = result.unwrap_err();
    assert!(matches!(*err, Error::RecordNotFound { ref name, .. } if name == "B"));
}

#[test]
fn test_own_directive_in_group_must_be_struct() {
    let (_dir, _path, result) = analyze_source(
        r#"
        package main

        //go:generate gosb
        type (
            A struct{ F int }

            //go:generate gosb
            B int
        )
        "#,
    );

    let err = result.unwrap_err();
    assert!(matches!(*err, Error::RecordNotFound { ref name, .. } if name == "B"));
}

#[test]
fn test_directive_tokens_must_share_a_comment() {
    let analysis = analyze_ok(
        r#"
        package main

        // go:generate
        // gosb
        type A struct{ F1 int }
        "#,
    );

    assert!(analysis.file.records.is_empty());
}

#[test]
fn test_functions_are_skipped() {
    let analysis = analyze_ok(
        r#"
        package main

        func helper(xs ...int) (int, error) {
            total := 0
            for _, x := range xs {
                total += x
            }
            return total, nil
        }

        //go:generate gosb -source=input.go
        type A struct {
            Handler func(int) error
            Lookup  map[string][]*int
            Events  <-chan struct{}
        }
        "#,
    );

    let types: Vec<&str> = analysis.file.records[0]
        .fields
        .iter()
        .map(|f| f.ty.name.as_str())
        .collect();
    assert_eq!(
        types,
        vec!["func(int) error", "map[string][]*int", "<-chan struct{}"]
    );
}

#[test]
fn test_interface_is_not_a_record() {
    let (_dir, _path, result) = analyze_source(
        r#"
        package main

        //go:generate gosb -source=input.go
        type A interface {
            M1()
        }"#,
    );

    let err = result.unwrap_err();
    assert!(matches!(*err, Error::RecordNotFound { ref name, .. } if name == "A"));
    assert_eq!(
        err.to_string(),
        "record not found: 'A' is not a struct type"
    );
}

#[test]
fn test_malformed_tag() {
    let (_dir, _path, result) = analyze_source(
        r#"
        package main

        //go:generate gosb -source=input.go
        type A struct {
            F1 int "gosb:\q"
        }"#,
    );

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("parsing A.F1 field: "));
}

#[test]
fn test_syntax_error() {
    let (_dir, _path, result) = analyze_source("package main\ntype A struct {\n");
    assert!(matches!(*result.unwrap_err(), Error::Syntax { .. }));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = analyze_file(dir.path().join("missing.go")).unwrap_err();
    assert!(matches!(*err, Error::Io { .. }));
}
