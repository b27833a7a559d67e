use gosb_core::{Import, Record};

/// Keep the imports referenced by at least one field type.
///
/// An import is referenced when `<prefix>.` occurs in a field's type text,
/// where the prefix is the alias or the last segment of the import path.
/// The check is textual, so a package name that is a suffix of another
/// identifier (`xtime.` for `time`) also counts.
pub fn prune_imports(imports: &[Import], records: &[Record]) -> Vec<Import> {
    imports
        .iter()
        .filter(|import| {
            let needle = format!("{}.", import.reference_prefix());
            records
                .iter()
                .flat_map(|record| &record.fields)
                .any(|field| field.ty.name.contains(&needle))
        })
        .cloned()
        .collect()
}
