//! Structured model of an analyzed Go source file.

use serde::Serialize;

use crate::{labels, utils::is_private_name};

/// One analyzed Go source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    /// Base name of the file (e.g. `input.go`).
    pub name: String,
    /// Directory containing the file.
    pub path: String,
    /// Name from the `package` clause.
    pub package_name: String,
    /// Imports in declaration order.
    pub imports: Vec<Import>,
    /// Records selected for generation, in declaration order.
    pub records: Vec<Record>,
}

impl File {
    /// Check if any record has at least one required field.
    pub fn has_required_fields(&self) -> bool {
        self.records.iter().any(Record::has_required_fields)
    }
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    /// The quoted import path, exactly as written (e.g. `"time"`).
    pub path: String,
    /// Explicit package name, if any.
    pub alias: Option<String>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    /// The import path without surrounding quotes.
    pub fn unquoted_path(&self) -> &str {
        self.path.trim_matches(|c| c == '"' || c == '`')
    }

    /// Name the importing file uses to refer to the package.
    ///
    /// This is the alias when present, otherwise the last path segment.
    pub fn reference_prefix(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => {
                let path = self.unquoted_path();
                path.rsplit('/').next().unwrap_or(path)
            }
        }
    }
}

/// A struct type selected for builder generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub is_private: bool,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        let name = name.into();
        Self {
            is_private: is_private_name(&name),
            name,
            fields,
        }
    }

    pub fn has_required_fields(&self) -> bool {
        self.fields.iter().any(|f| f.required)
    }

    pub fn required_count(&self) -> usize {
        self.fields.iter().filter(|f| f.required).count()
    }
}

/// One field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
    pub is_private: bool,
    pub required: bool,
}

impl Field {
    /// Create a field whose required-ness follows its type classification.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        let name = name.into();
        let required = ty.classification.required_by_default();
        Self {
            is_private: is_private_name(&name),
            name,
            ty,
            required,
        }
    }

    /// Override the default required-ness.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// The type of a field as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    /// Canonical type expression text (e.g. `*time.Time`).
    pub name: String,
    pub classification: Classification,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            classification: Classification::of(&name),
            name,
        }
    }

    /// Type pointed to, with one `*` removed.
    pub fn pointee(&self) -> &str {
        self.name.strip_prefix('*').unwrap_or(&self.name)
    }

    /// Element type of a slice, with the `[]` prefix removed.
    pub fn element(&self) -> &str {
        self.name.strip_prefix("[]").unwrap_or(&self.name)
    }

    /// Type wrapped by `mo.Option[...]`.
    pub fn option_inner(&self) -> &str {
        self.name
            .strip_prefix(labels::OPTION_TYPE)
            .and_then(|rest| rest.strip_prefix('['))
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(&self.name)
    }
}

/// Shape of a field type, derived from the prefix of its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    Other,
    Array,
    Pointer,
    Option,
}

impl Classification {
    /// Classify a type expression by its leading characters.
    pub fn of(type_text: &str) -> Self {
        if type_text.starts_with('*') {
            Self::Pointer
        } else if type_text.starts_with("[]") {
            Self::Array
        } else if type_text
            .strip_prefix(labels::OPTION_TYPE)
            .is_some_and(|rest| rest.starts_with('['))
        {
            Self::Option
        } else {
            Self::Other
        }
    }

    /// Pointers and options may be left unset; everything else must be set.
    pub fn required_by_default(&self) -> bool {
        !matches!(self, Self::Pointer | Self::Option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(Classification::of("*int"), Classification::Pointer);
        assert_eq!(Classification::of("**int"), Classification::Pointer);
        assert_eq!(Classification::of("[]int"), Classification::Array);
        assert_eq!(Classification::of("[5]int"), Classification::Other);
        assert_eq!(Classification::of("mo.Option[int]"), Classification::Option);
        assert_eq!(Classification::of("mo.OptionSet"), Classification::Other);
        assert_eq!(Classification::of("map[string]int"), Classification::Other);
        assert_eq!(Classification::of("time.Time"), Classification::Other);
    }

    #[test]
    fn test_default_required() {
        assert!(Field::new("F1", TypeDescriptor::new("int")).required);
        assert!(Field::new("F2", TypeDescriptor::new("[]int")).required);
        assert!(!Field::new("F3", TypeDescriptor::new("*int")).required);
        assert!(!Field::new("F4", TypeDescriptor::new("mo.Option[int]")).required);
        assert!(
            Field::new("F5", TypeDescriptor::new("*int"))
                .with_required(true)
                .required
        );
    }

    #[test]
    fn test_visibility() {
        assert!(Record::new("a", vec![]).is_private);
        assert!(!Record::new("A", vec![]).is_private);
        assert!(Field::new("f1", TypeDescriptor::new("int")).is_private);
        assert!(!Field::new("F1", TypeDescriptor::new("int")).is_private);
    }

    #[test]
    fn test_type_descriptor_parts() {
        assert_eq!(TypeDescriptor::new("**int").pointee(), "*int");
        assert_eq!(TypeDescriptor::new("[][]byte").element(), "[]byte");
        assert_eq!(
            TypeDescriptor::new("mo.Option[map[string]int]").option_inner(),
            "map[string]int"
        );
    }

    #[test]
    fn test_reference_prefix() {
        assert_eq!(Import::new("\"time\"").reference_prefix(), "time");
        assert_eq!(
            Import::new("\"github.com/samber/mo\"").reference_prefix(),
            "mo"
        );
        assert_eq!(Import::aliased("\"time\"", "t1").reference_prefix(), "t1");
    }

    #[test]
    fn test_required_count() {
        let record = Record::new(
            "A",
            vec![
                Field::new("F1", TypeDescriptor::new("int")),
                Field::new("F2", TypeDescriptor::new("*int")),
                Field::new("F3", TypeDescriptor::new("string")),
            ],
        );
        assert_eq!(record.required_count(), 2);
        assert!(record.has_required_fields());
    }
}
