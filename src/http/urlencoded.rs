//! Strict percent-decoding for request paths and form bodies.
//!
//! `url::form_urlencoded` never rejects input, which is what query logging
//! wants. Form bodies and file paths need to know when the encoding is
//! broken, so they go through the decoders here.

use thiserror::Error;

use crate::http::request::group_pairs;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid percent escape at byte {offset}")]
    InvalidEscape { offset: usize },
    #[error("decoded text is not valid UTF-8")]
    InvalidUtf8,
    #[error("semicolon is not a valid pair separator")]
    Semicolon,
}

/// Decodes `%XX` escapes. `+` is left alone.
pub fn percent_decode(input: &str) -> Result<String, FormError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .ok_or(FormError::InvalidEscape { offset: i })?;
            out.push((hex_value(hex[0]) << 4) | hex_value(hex[1]));
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| FormError::InvalidUtf8)
}

/// Parses an `application/x-www-form-urlencoded` body.
///
/// Values are grouped per key in first-appearance order.
pub fn parse_form(body: &[u8]) -> Result<Vec<(String, Vec<String>)>, FormError> {
    let text = std::str::from_utf8(body).map_err(|_| FormError::InvalidUtf8)?;
    let mut pairs = Vec::new();

    for pair in text.split('&') {
        if pair.is_empty() {
            continue;
        }
        if pair.contains(';') {
            return Err(FormError::Semicolon);
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        pairs.push((decode_component(key)?, decode_component(value)?));
    }

    Ok(group_pairs(pairs))
}

/// Encodes one path segment, leaving only RFC 3986 unreserved bytes bare.
pub fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for &byte in segment.as_bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_component(raw: &str) -> Result<String, FormError> {
    percent_decode(&raw.replace('+', " "))
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escapes() {
        assert_eq!(percent_decode("my%20file%2Etxt").unwrap(), "my file.txt");
        assert_eq!(percent_decode("a+b").unwrap(), "a+b");
    }

    #[test]
    fn rejects_truncated_and_non_hex_escapes() {
        assert_eq!(percent_decode("abc%2"), Err(FormError::InvalidEscape { offset: 3 }));
        assert_eq!(percent_decode("%zz"), Err(FormError::InvalidEscape { offset: 0 }));
        assert_eq!(percent_decode("%+1"), Err(FormError::InvalidEscape { offset: 0 }));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(percent_decode("%ff%fe"), Err(FormError::InvalidUtf8));
    }

    #[test]
    fn form_groups_repeated_keys() {
        let form = parse_form(b"tag=a&name=x+y&tag=b%21").unwrap();

        assert_eq!(
            form,
            vec![
                ("tag".to_string(), vec!["a".to_string(), "b!".to_string()]),
                ("name".to_string(), vec!["x y".to_string()]),
            ]
        );
    }

    #[test]
    fn form_rejects_semicolons() {
        assert_eq!(parse_form(b"a=1;b=2"), Err(FormError::Semicolon));
    }
}
