//! Auth cookie reconstruction and identity decoding
//!
//! Hosts hand over the session cookie in inconsistent shapes: sometimes the
//! value is still quoted and backslash-escaped the way it sits in a
//! `Set-Cookie` header, sometimes it is already plain. Everything here is pure
//! so the session layer only has to install the result.

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::Value;

use crate::{Error, Result};

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const TOKEN_ENGINE_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Characters a cookie value may carry without quoting
fn is_legal_cookie_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~:".contains(c)
}

/// Resolve backslash escapes the way a character-escaped string literal would
///
/// Supports the single-character escapes, octal (`\054`), `\xHH`, `\uHHHH`
/// and `\UHHHHHHHH`. Unknown escapes are kept verbatim.
pub fn unescape_cookie_value(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            return Err(Error::cookie_decode("\\ at end of cookie value"));
        };

        match escaped {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char_from_code(code)?);
            }
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn hex_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, digits: usize) -> Result<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|d| d.to_digit(16))
            .ok_or_else(|| Error::cookie_decode(format!("truncated escape, {} hex digits expected", digits)))?;
        code = code * 16 + digit;
    }
    char_from_code(code)
}

fn char_from_code(code: u32) -> Result<char> {
    char::from_u32(code)
        .ok_or_else(|| Error::cookie_decode(format!("escape out of range: {:#x}", code)))
}

/// Unescape then drop every literal quote character
pub fn normalize_cookie_value(raw: &str) -> Result<String> {
    Ok(unescape_cookie_value(raw)?.replace('"', ""))
}

/// Encode a value for a `Cookie` header, quoting when it holds illegal characters
pub fn coded_cookie_value(value: &str) -> String {
    if value.chars().all(is_legal_cookie_char) {
        return value.to_string();
    }

    let mut coded = String::with_capacity(value.len() + 2);
    coded.push('"');
    for c in value.chars() {
        match c {
            '"' => coded.push_str("\\\""),
            '\\' => coded.push_str("\\\\"),
            c if is_legal_cookie_char(c) || " ()/<=>?@[]{}".contains(c) => coded.push(c),
            c if (c as u32) < 256 => coded.push_str(&format!("\\{:03o}", c as u32)),
            c => coded.push(c),
        }
    }
    coded.push('"');
    coded
}

/// Extract the `user_id` from a normalized session cookie value
///
/// The first `|`-separated segment is base64 JSON. Padding is restored before
/// decoding since the backend strips it.
pub fn decode_user_id(cookie_value: &str) -> Result<String> {
    let info = cookie_value.split('|').next().unwrap_or_default();
    let mut padded = info.trim_end_matches('=').to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = TOKEN_ENGINE
        .decode(&padded)
        .or_else(|_| TOKEN_ENGINE_URL_SAFE.decode(&padded))
        .map_err(|e| Error::cookie_decode(format!("invalid base64 in session token: {}", e)))?;

    let decoded: Value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::cookie_decode(format!("session token is not JSON: {}", e)))?;

    match decoded.get("user_id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        Some(other) => Err(Error::cookie_decode(format!(
            "unexpected user_id value: {}",
            other
        ))),
        None => Err(Error::cookie_decode("session token has no user_id")),
    }
}
