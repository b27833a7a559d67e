//! Struct tag handling.
//!
//! Tags are unquoted the way `strconv.Unquote` does and searched the way
//! `reflect.StructTag.Lookup` does, so a tag means the same thing here as it
//! does to the Go toolchain.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnquoteError {
    #[error("tag literal is not quoted")]
    NotQuoted,
    #[error("unexpected {0:?} inside tag literal")]
    UnexpectedChar(char),
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("truncated escape sequence")]
    TruncatedEscape,
}

/// Remove the quotes of a Go string literal and resolve its escapes.
pub fn unquote(literal: &str) -> Result<String, UnquoteError> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        if raw.contains('`') {
            return Err(UnquoteError::UnexpectedChar('`'));
        }
        return Ok(raw.replace('\r', ""));
    }

    let body = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(UnquoteError::NotQuoted)?;

    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return Err(UnquoteError::UnexpectedChar(c)),
            '\\' => unescape(&mut chars, &mut out)?,
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn unescape(chars: &mut std::str::Chars<'_>, out: &mut Vec<u8>) -> Result<(), UnquoteError> {
    let c = chars.next().ok_or(UnquoteError::TruncatedEscape)?;
    let simple = match c {
        'a' => Some(0x07),
        'b' => Some(0x08),
        'f' => Some(0x0c),
        'n' => Some(b'\n'),
        'r' => Some(b'\r'),
        't' => Some(b'\t'),
        'v' => Some(0x0b),
        '\\' => Some(b'\\'),
        '"' => Some(b'"'),
        _ => None,
    };
    if let Some(byte) = simple {
        out.push(byte);
        return Ok(());
    }

    match c {
        '0'..='7' => {
            let digits = take_digits(chars, Some(c), 3, 8)?;
            let value = u8::try_from(digits).map_err(|_| UnquoteError::InvalidEscape(c))?;
            out.push(value);
        }
        'x' => {
            let value = take_digits(chars, None, 2, 16)?;
            out.push(value as u8);
        }
        'u' | 'U' => {
            let width = if c == 'u' { 4 } else { 8 };
            let value = take_digits(chars, None, width, 16)?;
            let ch = char::from_u32(value).ok_or(UnquoteError::InvalidEscape(c))?;
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
        _ => return Err(UnquoteError::InvalidEscape(c)),
    }
    Ok(())
}

/// Read `count` digits in `radix`, optionally starting from an already
/// consumed first digit.
fn take_digits(
    chars: &mut std::str::Chars<'_>,
    first: Option<char>,
    count: usize,
    radix: u32,
) -> Result<u32, UnquoteError> {
    let mut value = 0u32;
    let mut taken = 0;

    if let Some(first) = first {
        value = first.to_digit(radix).ok_or(UnquoteError::InvalidEscape(first))?;
        taken = 1;
    }

    while taken < count {
        let c = chars.next().ok_or(UnquoteError::TruncatedEscape)?;
        let digit = c.to_digit(radix).ok_or(UnquoteError::InvalidEscape(c))?;
        value = value * radix + digit;
        taken += 1;
    }

    Ok(value)
}

/// Value associated with `key` in a conventional `key:"value"` tag string.
///
/// Returns `None` when the key is absent or the tag is malformed before the
/// key is reached.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .bytes()
            .take_while(|&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
            .count();
        let bytes = rest.as_bytes();
        if name_len == 0
            || name_len + 1 >= bytes.len()
            || bytes[name_len] != b':'
            || bytes[name_len + 1] != b'"'
        {
            return None;
        }
        let name = &rest[..name_len];
        rest = &rest[name_len + 1..];

        // Find the closing quote, skipping escaped characters.
        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }

        let quoted = &rest[..=i];
        rest = &rest[i + 1..];

        if name == key {
            return unquote(quoted).ok();
        }
    }
}
