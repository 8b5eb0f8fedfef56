//! Encodings and numbers: encode-decode, escape, format-numbers, increment-numbers
//!
//! Encoders and escapers are round-trip safe for well-formed input: decoding the output of
//! the matching encoder gives back the original text. Decoding malformed input returns it
//! unchanged.

use super::config::{
    Codec, CodecDirection, EncodeDecodeConfig, EscapeConfig, EscapeDirection, EscapeKind,
    FormatNumbersConfig, IncrementNumbersConfig,
};
use super::{ExecutionContext, TextOperation};
use crate::operation::OperationId;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Characters a browser's `encodeURIComponent` escapes
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters with a meaning in regex syntax
const REGEX_META: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

pub struct EncodeDecode;

impl TextOperation for EncodeDecode {
    type Config = EncodeDecodeConfig;
    const ID: OperationId = OperationId::EncodeDecode;

    fn apply(
        &self,
        text: &str,
        config: &EncodeDecodeConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        let Some(mode) = config.mode else {
            return text.to_string();
        };
        let decoded = match (mode.codec, mode.direction) {
            (Codec::Url, CodecDirection::Encode) => Some(url_encode(text)),
            (Codec::Url, CodecDirection::Decode) => url_decode(text),
            (Codec::Base64, CodecDirection::Encode) => Some(STANDARD.encode(text.as_bytes())),
            (Codec::Base64, CodecDirection::Decode) => base64_decode(text),
            (Codec::Html, CodecDirection::Encode) => Some(html_encode(text)),
            (Codec::Html, CodecDirection::Decode) => Some(html_decode(text)),
        };
        decoded.unwrap_or_else(|| {
            log::debug!("{} {} left malformed input unchanged", mode.codec.as_str(), mode.direction.as_str());
            text.to_string()
        })
    }
}

pub fn url_encode(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// `None` when an escape is truncated or the bytes are not UTF-8
pub fn url_decode(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return None;
            }
        }
    }
    percent_decode_str(text)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Whitespace inside the payload is ignored
pub fn base64_decode(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    String::from_utf8(bytes).ok()
}

pub fn html_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode named (`&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`) and numeric
/// references; anything unrecognized is kept as written
pub fn html_decode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match candidate
            .find(';')
            .filter(|end| *end <= 12)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|c| (c, end)))
        {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

pub struct Escape;

impl TextOperation for Escape {
    type Config = EscapeConfig;
    const ID: OperationId = OperationId::Escape;

    fn apply(&self, text: &str, config: &EscapeConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        let Some(mode) = config.mode else {
            return text.to_string();
        };
        match (mode.kind, mode.direction) {
            (EscapeKind::Json, EscapeDirection::Escape) => json_escape(text),
            (EscapeKind::Json, EscapeDirection::Unescape) => {
                json_unescape(text).unwrap_or_else(|| text.to_string())
            }
            (EscapeKind::Regex, EscapeDirection::Escape) => regex_escape(text),
            (EscapeKind::Regex, EscapeDirection::Unescape) => regex_unescape(text),
        }
    }
}

/// Body of a JSON string literal, without the surrounding quotes
pub fn json_escape(text: &str) -> String {
    match serde_json::to_string(text) {
        Ok(quoted) if quoted.len() >= 2 => quoted[1..quoted.len() - 1].to_string(),
        _ => text.to_string(),
    }
}

pub fn json_unescape(text: &str) -> Option<String> {
    serde_json::from_str::<String>(&format!("\"{}\"", text)).ok()
}

pub fn regex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if REGEX_META.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Drops the backslash in front of regex metacharacters; other escapes stay as written
pub fn regex_unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.peek().copied().filter(|n| REGEX_META.contains(n)) {
                out.push(next);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

static GROUPED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?").expect("valid number pattern")
});

static PLAIN_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number pattern"));

/// A number found in text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numeral<'a> {
    pub negative: bool,
    /// Integer digits, may contain `,` group separators
    pub integer: &'a str,
    pub fraction: Option<&'a str>,
}

impl<'a> Numeral<'a> {
    fn parse(token: &'a str) -> Numeral<'a> {
        let (negative, unsigned) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (unsigned, None),
        };
        Numeral {
            negative,
            integer,
            fraction,
        }
    }

    pub fn decimals(&self) -> usize {
        self.fraction.map(str::len).unwrap_or(0)
    }

    pub fn value(&self) -> f64 {
        let digits: String = self.integer.chars().filter(|c| *c != ',').collect();
        let text = match self.fraction {
            Some(frac) => format!("{}.{}", digits, frac),
            None => digits,
        };
        let magnitude = text.parse::<f64>().unwrap_or(0.0);
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Replace every number matched by `pattern` with `f(number)`
///
/// A `-` directly after a letter or digit is a hyphen, not a sign (`2024-01-31`,
/// `file-7`), and is kept as literal text.
fn replace_numbers<F>(text: &str, pattern: &Regex, mut f: F) -> String
where
    F: FnMut(Numeral<'_>) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in pattern.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        let mut token = m.as_str();
        let hyphenated = token.starts_with('-')
            && text[..m.start()]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        if hyphenated {
            out.push('-');
            token = &token[1..];
        }
        out.push_str(&f(Numeral::parse(token)));
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Insert `,` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed decimals, optional thousands separators, en-US style
pub fn format_number(value: f64, decimals: usize, thousands: bool) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((int, frac)) => (int.to_string(), Some(frac.to_string())),
        None => (fixed.clone(), None),
    };
    let mut out = String::new();
    if value.is_sign_negative() && value != 0.0 {
        out.push('-');
    }
    if thousands {
        out.push_str(&group_thousands(&integer));
    } else {
        out.push_str(&integer);
    }
    if let Some(frac) = fraction {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

pub struct FormatNumbers;

impl TextOperation for FormatNumbers {
    type Config = FormatNumbersConfig;
    const ID: OperationId = OperationId::FormatNumbers;

    fn apply(
        &self,
        text: &str,
        config: &FormatNumbersConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        let decimals = config.decimals();
        replace_numbers(text, &GROUPED_NUMBER, |numeral| {
            format_number(numeral.value(), decimals, config.thousands)
        })
    }
}

pub struct IncrementNumbers;

impl TextOperation for IncrementNumbers {
    type Config = IncrementNumbersConfig;
    const ID: OperationId = OperationId::IncrementNumbers;

    fn apply(
        &self,
        text: &str,
        config: &IncrementNumbersConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        let delta = config.delta();
        let delta_decimals = decimal_places(delta);
        replace_numbers(text, &PLAIN_NUMBER, |numeral| {
            increment(numeral, delta, delta_decimals)
        })
    }
}

/// Number of fractional digits in the shortest representation of `value`
fn decimal_places(value: f64) -> usize {
    let repr = format!("{}", value);
    repr.split_once('.')
        .map(|(_, frac)| frac.len())
        .unwrap_or(0)
        .min(FormatNumbersConfig::MAX_DECIMALS)
}

/// Add `delta`, keeping the original precision (`5.50 + 10 = 15.50`) and zero padding
/// (`007 + 1 = 008`)
fn increment(numeral: Numeral<'_>, delta: f64, delta_decimals: usize) -> String {
    let precision = numeral.decimals().max(delta_decimals);

    let integral_delta =
        delta.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&delta);
    let exact = if precision == 0 && integral_delta {
        numeral
            .integer
            .parse::<i64>()
            .ok()
            .map(|n| if numeral.negative { -n } else { n })
            .and_then(|n| n.checked_add(delta as i64))
            .map(|n| n.to_string())
    } else {
        None
    };
    let result = exact.unwrap_or_else(|| format_number(numeral.value() + delta, precision, false));

    let width = numeral.integer.len();
    let zero_padded = width > 1 && numeral.integer.starts_with('0') && !numeral.negative;
    match result.strip_prefix('-') {
        None if zero_padded => {
            let int_len = result.split('.').next().map(str::len).unwrap_or(0);
            if int_len < width {
                format!("{}{}", "0".repeat(width - int_len), result)
            } else {
                result
            }
        }
        _ => result,
    }
}
