//! Reader for `key=value` properties text.
//!
//! Follows the rules of `java.util.Properties.load`: `#`/`!` comments, `=`,
//! `:` or whitespace as the key terminator, backslash line continuations and
//! `\uXXXX` escapes.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertiesError {
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedUnicodeEscape { line: usize },
}

pub fn parse(text: &str) -> Result<HashMap<String, String>, PropertiesError> {
    let mut properties = HashMap::new();
    let mut lines = split_lines(text).into_iter().enumerate();

    while let Some((index, raw)) = lines.next() {
        let first = raw.trim_start_matches(is_blank);
        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let line_number = index + 1;
        let mut logical = String::from(first);
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        properties.insert(unescape(key, line_number)?, unescape(value, line_number)?);
    }

    Ok(properties)
}

// `\n`, `\r` and `\r\n` all end a line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(end) => {
                lines.push(&rest[..end]);
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

// An odd run of trailing backslashes means the last one escapes the newline.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                return (&line[..i], line[i + 1..].trim_start_matches(is_blank));
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_blank);
    }
    (key, rest)
}

// Decodes into UTF-16 units first so `\uXXXX` surrogate pairs combine;
// an unpaired surrogate becomes U+FFFD.
fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut buf = [0u16; 2];
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        let decoded = if c != '\\' {
            c
        } else {
            match chars.next() {
                Some('t') => '\t',
                Some('n') => '\n',
                Some('r') => '\r',
                Some('f') => '\u{000C}',
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    let unit = (hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                        .then(|| u16::from_str_radix(&hex, 16).ok())
                        .flatten()
                        .ok_or(PropertiesError::MalformedUnicodeEscape { line })?;
                    units.push(unit);
                    continue;
                }
                Some(other) => other,
                None => continue,
            }
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buf));
    }

    Ok(char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}
