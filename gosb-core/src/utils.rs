//! Shared string helpers for Go identifiers.

/// Uppercase the first character (e.g. "field" -> "Field").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// A name is private when its first character is lowercase.
pub fn is_private_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_lowercase)
}

/// Derive the implicit name of an embedded field from its type text.
///
/// Strips at most one leading `*` and one `pkg.` qualifier and returns the
/// identifier that follows, ignoring any type arguments: `*mo.Future[int]`
/// yields `Future`. Returns `None` when the text does not start with an
/// identifier after the optional `*`.
pub fn embedded_field_name(type_text: &str) -> Option<&str> {
    let rest = type_text.strip_prefix('*').unwrap_or(type_text);
    let (first, rest) = split_identifier(rest)?;

    match rest.strip_prefix('.') {
        Some(qualified) => split_identifier(qualified).map(|(name, _)| name),
        None => Some(first),
    }
}

fn split_identifier(s: &str) -> Option<(&str, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(s.len(), |(i, _)| i);

    if end == 0 || s.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(s.split_at(end))
}
