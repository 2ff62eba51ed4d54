//! Abbreviation tag micro-parser
//!
//! Recognizes raw inline markup of the form `<abbr title="Expansion">KEY</abbr>`:
//! exactly one attribute, named `title`, quoted with `"` or `'`, and a
//! non-empty text body. Character entities in the attribute and body are
//! decoded.

use thiserror::Error;

/// Opening sequence that marks raw text as an abbreviation candidate
pub const ABBR_OPEN: &str = "<abbr ";

const ABBR_CLOSE: &str = "</abbr>";

/// Abbreviation parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbbrError {
    #[error("Not an abbreviation tag")]
    NotAnAbbreviation,

    #[error("Expected exactly one attribute, found {0}")]
    AttributeCount(usize),

    #[error("Unsupported attribute: {0}")]
    UnsupportedAttribute(String),

    #[error("Malformed attribute at byte {0}")]
    MalformedAttribute(usize),

    #[error("Invalid character entity: &{0};")]
    InvalidEntity(String),

    #[error("Missing abbreviation text")]
    MissingText,

    #[error("Missing closing tag")]
    Unclosed,

    #[error("Unexpected content after closing tag")]
    TrailingContent,
}

/// A parsed abbreviation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviation {
    /// Visible text
    pub key: String,
    /// Expansion, from the `title` attribute
    pub title: String,
}

/// Parse an abbreviation tag
pub fn parse_abbreviation(text: &str) -> Result<Abbreviation, AbbrError> {
    let rest = text
        .strip_prefix(ABBR_OPEN)
        .ok_or(AbbrError::NotAnAbbreviation)?;
    let offset = ABBR_OPEN.len();

    let tag_end = rest.find('>').ok_or(AbbrError::Unclosed)?;
    let attributes = parse_attributes(&rest[..tag_end], offset)?;
    if attributes.len() != 1 {
        return Err(AbbrError::AttributeCount(attributes.len()));
    }
    let (name, value) = attributes.into_iter().next().ok_or(AbbrError::AttributeCount(0))?;
    if name != "title" {
        return Err(AbbrError::UnsupportedAttribute(name));
    }

    let body = &rest[tag_end + 1..];
    let close = body.find(ABBR_CLOSE).ok_or(AbbrError::Unclosed)?;
    let raw_key = &body[..close];
    if raw_key.contains('<') {
        return Err(AbbrError::Unclosed);
    }
    if !body[close + ABBR_CLOSE.len()..].trim().is_empty() {
        return Err(AbbrError::TrailingContent);
    }

    let key = decode_entities(raw_key)?;
    if key.is_empty() {
        return Err(AbbrError::MissingText);
    }

    Ok(Abbreviation {
        key,
        title: decode_entities(&value)?,
    })
}

/// Parse `name="value"` pairs from the inside of an opening tag
fn parse_attributes(source: &str, offset: usize) -> Result<Vec<(String, String)>, AbbrError> {
    let source = source.trim_end();
    if source.ends_with('/') {
        return Err(AbbrError::MissingText);
    }

    let mut attributes = Vec::new();
    let mut pos = 0;
    let bytes = source.as_bytes();

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        let name_start = pos;
        while pos < bytes.len() && is_name_byte(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            return Err(AbbrError::MalformedAttribute(offset + pos));
        }
        let name = &source[name_start..pos];

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'=') {
            return Err(AbbrError::MalformedAttribute(offset + pos));
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let quote = match bytes.get(pos) {
            Some(q @ (b'"' | b'\'')) => *q,
            _ => return Err(AbbrError::MalformedAttribute(offset + pos)),
        };
        pos += 1;
        let value_start = pos;
        while pos < bytes.len() && bytes[pos] != quote {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(AbbrError::MalformedAttribute(offset + value_start));
        }
        let value = &source[value_start..pos];
        pos += 1;

        if attributes.iter().any(|(n, _): &(String, String)| n == name) {
            return Err(AbbrError::MalformedAttribute(offset + name_start));
        }
        attributes.push((name.to_string(), value.to_string()));
    }

    Ok(attributes)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

/// Decode the predefined XML entities and numeric character references
fn decode_entities(text: &str) -> Result<String, AbbrError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| AbbrError::InvalidEntity(after.to_string()))?;
        let entity = &after[..semi];
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => decode_numeric(entity).ok_or_else(|| AbbrError::InvalidEntity(entity.to_string()))?,
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn decode_numeric(entity: &str) -> Option<char> {
    let number = entity.strip_prefix('#')?;
    let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse().ok()?,
    };
    char::from_u32(code)
}
