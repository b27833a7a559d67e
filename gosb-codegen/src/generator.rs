//! Go builder emission.
//!
//! Every declaration is rendered to [`CodeFragment`]s and written through a
//! [`CodeBuilder`] created per call. The emitted text already follows
//! `gofmt` layout, so formatting only has to normalize it.

use gosb_core::{
    Classification, Feature, FeatureSet, Field, File, Import, Record, capitalize,
    labels::{GENERATOR_NAME, OPTION_SOME},
};
use tracing::debug;

use crate::{
    Error, Result,
    builder::{CodeBuilder, CodeFragment, Renderable},
    mask::{MaskBit, RequiredFields},
};

const ERRORS_IMPORT: &str = "\"errors\"";

/// Generates builder source for analyzed files.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    features: FeatureSet,
}

impl Generator {
    pub fn new(features: FeatureSet) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Render the builder file for `file`.
    ///
    /// Fails with [`Error::NoRecords`] when no record was selected.
    pub fn generate(&self, file: &File) -> Result<String> {
        if file.records.is_empty() {
            return Err(Error::NoRecords);
        }

        let mut builder = CodeBuilder::go();
        builder
            .push_comment(&format!("Code generated by {GENERATOR_NAME}. DO NOT EDIT."))
            .push_comment(&format!("Source: {}", file.name))
            .push_blank()
            .push_line(&format!("package {}", file.package_name))
            .push_blank();

        builder.emit(&ImportBlock::for_file(file));

        for (i, record) in file.records.iter().enumerate() {
            if i > 0 {
                builder.push_blank();
            }
            debug!(record = %record.name, "generating builder");
            builder.emit(&RecordBuilder::new(record, &self.features));
        }

        Ok(builder.build())
    }
}

/// The import declaration of the generated file.
struct ImportBlock {
    imports: Vec<Import>,
}

impl ImportBlock {
    /// Imports of `file` plus `errors` when some `Build` can fail.
    fn for_file(file: &File) -> Self {
        let mut imports = file.imports.clone();
        let has_errors = imports
            .iter()
            .any(|import| import.alias.is_none() && import.path == ERRORS_IMPORT);
        if file.has_required_fields() && !has_errors {
            imports.push(Import::new(ERRORS_IMPORT));
        }
        Self { imports }
    }
}

impl Renderable for ImportBlock {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        if self.imports.is_empty() {
            return Vec::new();
        }

        let lines = self
            .imports
            .iter()
            .map(|import| match &import.alias {
                Some(alias) => CodeFragment::line(format!("{alias} {}", import.path)),
                None => CodeFragment::line(&import.path),
            })
            .collect();

        vec![
            CodeFragment::block("import (", lines, Some(")".to_string())),
            CodeFragment::blank(),
        ]
    }
}

/// Getters, builder type, constructor, setters and `Build` for one record.
struct RecordBuilder<'a> {
    record: &'a Record,
    features: &'a FeatureSet,
    required: RequiredFields,
    builder_name: String,
}

impl<'a> RecordBuilder<'a> {
    fn new(record: &'a Record, features: &'a FeatureSet) -> Self {
        Self {
            record,
            features,
            required: RequiredFields::of(record),
            builder_name: format!("{}Builder", record.name),
        }
    }

    fn constructor_name(&self) -> String {
        if self.record.is_private {
            format!("new{}", capitalize(&self.builder_name))
        } else {
            format!("New{}", self.builder_name)
        }
    }

    fn getters(&self) -> Vec<CodeFragment> {
        if self.record.is_private {
            return Vec::new();
        }

        self.record
            .fields
            .iter()
            .filter(|field| field.is_private)
            .map(|field| {
                CodeFragment::braced(
                    format!(
                        "func (t *{}) {}() {} {{",
                        self.record.name,
                        capitalize(&field.name),
                        field.ty.name
                    ),
                    vec![CodeFragment::line(format!("return t.{}", field.name))],
                )
            })
            .collect()
    }

    fn builder_struct(&self) -> CodeFragment {
        CodeFragment::braced(
            format!("type {} struct {{", self.builder_name),
            vec![
                CodeFragment::line(format!("x    *{}", self.record.name)),
                CodeFragment::line("mask []byte"),
            ],
        )
    }

    fn constructor(&self) -> CodeFragment {
        let mut body = Vec::new();

        if !self.required.is_empty() {
            let mut doc = vec![CodeFragment::line("Required fields:")];
            for (position, index) in self.required.iter() {
                let field = &self.record.fields[position];
                doc.push(CodeFragment::line(format!(
                    "{index}) {} {}",
                    field.name, field.ty.name
                )));
            }
            body.push(CodeFragment::line("/**"));
            body.push(CodeFragment::indent(doc));
            body.push(CodeFragment::line("*/"));
            body.push(CodeFragment::blank());
        }

        body.push(CodeFragment::braced(
            format!("return &{}{{", self.builder_name),
            vec![
                CodeFragment::line(format!("x:    new({}),", self.record.name)),
                CodeFragment::line(format!(
                    "mask: {},",
                    self.required.initial_mask_literal()
                )),
            ],
        ));

        CodeFragment::braced(
            format!(
                "func {}() *{} {{",
                self.constructor_name(),
                self.builder_name
            ),
            body,
        )
    }

    fn setter(
        &self,
        position: usize,
        field: &Field,
        suffix: &str,
        param: &str,
        assign: String,
    ) -> CodeFragment {
        let mut body = vec![CodeFragment::line(assign)];
        if let Some(bit) = self.required.bit_of(position) {
            body.push(CodeFragment::line(format!(
                "b.mask[{}] &^= {}",
                bit.byte,
                bit.literal()
            )));
        }
        body.push(CodeFragment::line("return b"));

        CodeFragment::braced(
            format!(
                "func (b *{builder}) Set{name}{suffix}(v {param}) *{builder} {{",
                builder = self.builder_name,
                name = capitalize(&field.name),
            ),
            body,
        )
    }

    fn setters(&self, position: usize, field: &Field) -> Vec<CodeFragment> {
        let name = &field.name;
        let mut setters = vec![self.setter(
            position,
            field,
            "",
            &field.ty.name,
            format!("b.x.{name} = v"),
        )];

        let convenience = match field.ty.classification {
            Classification::Pointer if self.features.contains(Feature::Ptr) => Some((
                field.ty.pointee().to_string(),
                format!("b.x.{name} = &v"),
            )),
            Classification::Array if self.features.contains(Feature::Arr) => Some((
                format!("...{}", field.ty.element()),
                format!("b.x.{name} = append(b.x.{name}, v...)"),
            )),
            Classification::Option if self.features.contains(Feature::Opt) => Some((
                field.ty.option_inner().to_string(),
                format!("b.x.{name} = {OPTION_SOME}(v)"),
            )),
            _ => None,
        };

        if let Some((param, assign)) = convenience {
            setters.push(self.setter(position, field, "V", &param, assign));
        }
        setters
    }

    fn build(&self) -> CodeFragment {
        if self.required.is_empty() {
            return CodeFragment::braced(
                format!(
                    "func (b *{}) Build() *{} {{",
                    self.builder_name, self.record.name
                ),
                vec![CodeFragment::line("return b.x")],
            );
        }

        let mut body = Vec::new();
        for (position, index) in self.required.iter() {
            let field = &self.record.fields[position];
            let bit = MaskBit::for_index(index);
            body.push(CodeFragment::braced(
                format!("if b.mask[{}]&{} != 0 {{", bit.byte, bit.literal()),
                vec![CodeFragment::line(format!(
                    "return nil, errors.New(\"{}.{} field is not provided\")",
                    self.record.name, field.name
                ))],
            ));
            body.push(CodeFragment::blank());
        }
        body.push(CodeFragment::line("return b.x, nil"));

        CodeFragment::braced(
            format!(
                "func (b *{}) Build() (*{}, error) {{",
                self.builder_name, self.record.name
            ),
            body,
        )
    }
}

impl Renderable for RecordBuilder<'_> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut decls = self.getters();
        decls.push(self.builder_struct());
        decls.push(self.constructor());
        for (position, field) in self.record.fields.iter().enumerate() {
            decls.extend(self.setters(position, field));
        }
        decls.push(self.build());

        let mut fragments = Vec::with_capacity(decls.len() * 2);
        for (i, decl) in decls.into_iter().enumerate() {
            if i > 0 {
                fragments.push(CodeFragment::blank());
            }
            fragments.push(decl);
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use gosb_core::TypeDescriptor;

    use super::*;

    fn file(records: Vec<Record>, imports: Vec<Import>) -> File {
        File {
            name: "input.go".to_string(),
            path: ".".to_string(),
            package_name: "main".to_string(),
            imports,
            records,
        }
    }

    fn field(name: &str, ty: &str) -> Field {
        Field::new(name, TypeDescriptor::new(ty))
    }

    #[test]
    fn test_no_records() {
        let err = Generator::default()
            .generate(&file(Vec::new(), Vec::new()))
            .unwrap_err();
        assert!(matches!(err, Error::NoRecords));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let record = Record::new("A", vec![field("F1", "int"), field("F2", "*int")]);
        let out = Generator::default()
            .generate(&file(vec![record], Vec::new()))
            .unwrap();

        assert_eq!(
            out,
            "// Code generated by go-struct-builder. DO NOT EDIT.
// Source: input.go

package main

import (
\t\"errors\"
)

type ABuilder struct {
\tx    *A
\tmask []byte
}

func NewABuilder() *ABuilder {
\t/**
\t\tRequired fields:
\t\t1) F1 int
\t*/

\treturn &ABuilder{
\t\tx:    new(A),
\t\tmask: []byte{0x2},
\t}
}

func (b *ABuilder) SetF1(v int) *ABuilder {
\tb.x.F1 = v
\tb.mask[0] &^= 0x2
\treturn b
}

func (b *ABuilder) SetF2(v *int) *ABuilder {
\tb.x.F2 = v
\treturn b
}

func (b *ABuilder) Build() (*A, error) {
\tif b.mask[0]&0x2 != 0 {
\t\treturn nil, errors.New(\"A.F1 field is not provided\")
\t}

\treturn b.x, nil
}
"
        );
    }

    #[test]
    fn test_no_required_fields_single_value_build() {
        let record = Record::new("A", vec![field("F1", "*int")]);
        let out = Generator::default()
            .generate(&file(vec![record], Vec::new()))
            .unwrap();

        assert!(out.contains("func (b *ABuilder) Build() *A {\n\treturn b.x\n}\n"));
        assert!(!out.contains("import ("));
        assert!(!out.contains("Required fields"));
        assert!(out.contains("mask: []byte{0x0},"));
    }

    #[test]
    fn test_errors_import_not_duplicated() {
        let record = Record::new("A", vec![field("F1", "int")]);
        let out = Generator::default()
            .generate(&file(vec![record], vec![Import::new("\"errors\"")]))
            .unwrap();

        assert_eq!(out.matches("\"errors\"").count(), 1);
    }

    #[test]
    fn test_aliased_errors_import_still_adds_errors() {
        let record = Record::new("A", vec![field("F1", "int")]);
        let input = file(vec![record], vec![Import::aliased("\"errors\"", "e")]);
        let out = Generator::default().generate(&input).unwrap();

        assert!(out.contains("\te \"errors\"\n\t\"errors\"\n"));
        assert_eq!(input.imports.len(), 1, "input file is not mutated");
    }

    #[test]
    fn test_private_record() {
        let record = Record::new("a", vec![field("f1", "int")]);
        let out = Generator::default()
            .generate(&file(vec![record], Vec::new()))
            .unwrap();

        assert!(out.contains("type aBuilder struct {"));
        assert!(out.contains("func newABuilder() *aBuilder {"));
        assert!(out.contains("func (b *aBuilder) SetF1(v int) *aBuilder {"));
        assert!(!out.contains("func (t *a)"), "private records get no getters");
    }

    #[test]
    fn test_getters_for_private_fields_only() {
        let record = Record::new("A", vec![field("F1", "int"), field("f2", "string")]);
        let out = Generator::default()
            .generate(&file(vec![record], Vec::new()))
            .unwrap();

        assert!(out.contains("func (t *A) F2() string {\n\treturn t.f2\n}\n"));
        assert!(!out.contains("func (t *A) F1()"));
    }

    #[test]
    fn test_feature_gating() {
        let record = Record::new(
            "A",
            vec![
                field("F1", "*time.Time"),
                field("F2", "[]int"),
                field("F3", "mo.Option[int]"),
            ],
        );
        let input = file(vec![record], Vec::new());

        let none = Generator::default().generate(&input).unwrap();
        assert!(!none.contains("V("));

        let ptr_only = Generator::new(FeatureSet::new().with(Feature::Ptr))
            .generate(&input)
            .unwrap();
        assert!(ptr_only.contains("func (b *ABuilder) SetF1V(v time.Time) *ABuilder {\n\tb.x.F1 = &v\n"));
        assert!(!ptr_only.contains("SetF2V"));
        assert!(!ptr_only.contains("SetF3V"));

        let all = Generator::new(FeatureSet::all()).generate(&input).unwrap();
        assert!(all.contains("func (b *ABuilder) SetF2V(v ...int) *ABuilder {\n\tb.x.F2 = append(b.x.F2, v...)\n"));
        assert!(all.contains("func (b *ABuilder) SetF3V(v int) *ABuilder {\n\tb.x.F3 = mo.Some(v)\n"));
    }

    #[test]
    fn test_required_convenience_setter_clears_bit() {
        let record = Record::new(
            "A",
            vec![field("F1", "int"), field("F2", "mo.Option[int]").with_required(true)],
        );
        let out = Generator::new(FeatureSet::all())
            .generate(&file(vec![record], Vec::new()))
            .unwrap();

        assert!(out.contains(
            "func (b *ABuilder) SetF2V(v int) *ABuilder {\n\tb.x.F2 = mo.Some(v)\n\tb.mask[0] &^= 0x4\n"
        ));
    }

    #[test]
    fn test_build_checks_in_declaration_order() {
        let record = Record::new(
            "A",
            vec![field("F1", "int"), field("F2", "*int"), field("F3", "string")],
        );
        let out = Generator::default()
            .generate(&file(vec![record], Vec::new()))
            .unwrap();

        let first = out.find("A.F1 field is not provided").unwrap();
        let second = out.find("A.F3 field is not provided").unwrap();
        assert!(first < second);
        assert!(out.contains("if b.mask[0]&0x4 != 0 {"));
        assert!(out.contains("2) F3 string"));
    }

    #[test]
    fn test_deterministic() {
        let record = Record::new("A", vec![field("F1", "int"), field("f2", "[]string")]);
        let input = file(vec![record], vec![Import::new("\"time\"")]);
        let generator = Generator::new(FeatureSet::all());
        assert_eq!(
            generator.generate(&input).unwrap(),
            generator.generate(&input).unwrap()
        );
    }
}
