//! Label-anchored numeric field extraction for the plain-text records.

use crate::error::ParseError;

/// Return the float-shaped token (`-?\d+(\.\d+)?`) that directly follows
/// `label`, allowing only whitespace in between.
pub fn number_token<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let start = text.find(label)? + label.len();
    let rest = text[start..].trim_start();
    let bytes = rest.as_bytes();

    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == int_start {
        return None;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    Some(&rest[..end])
}

/// Parse the float that follows `label`.
pub fn labeled_f64(text: &str, label: &str) -> Result<f64, ParseError> {
    number_token(text, label)
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| ParseError::unparsable(label))
}

/// Parse the unsigned integer that follows `label`. A fractional token is
/// rejected rather than truncated.
pub fn labeled_u32(text: &str, label: &str) -> Result<u32, ParseError> {
    number_token(text, label)
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| ParseError::unparsable(label))
}

/// Text after `label` up to the next comma, trimmed.
pub fn labeled_text<'a>(text: &'a str, label: &str) -> Result<&'a str, ParseError> {
    let start = text
        .find(label)
        .map(|i| i + label.len())
        .ok_or_else(|| ParseError::unparsable(label))?;
    let rest = &text[start..];
    let value = rest.split(',').next().unwrap_or(rest).trim();
    if value.is_empty() {
        return Err(ParseError::unparsable(label));
    }
    Ok(value)
}
