//! Layout operations: word-wrap, indent / dedent, pad-align
//!
//! Widths are counted in characters, not bytes.

use super::config::{Align, IndentConfig, IndentMode, PadAlignConfig, WordWrapConfig};
use super::{map_lines, ExecutionContext, TextOperation};
use crate::operation::OperationId;

pub struct WordWrap;

impl TextOperation for WordWrap {
    type Config = WordWrapConfig;
    const ID: OperationId = OperationId::WordWrap;

    fn apply(&self, text: &str, config: &WordWrapConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        let Some(width) = config.width() else {
            return text.to_string();
        };
        map_lines(text, |line| wrap_line(line, width).join("\n"))
    }
}

/// Greedy wrap of a single line
///
/// Words are packed while they fit in `width` columns. A word longer than `width` is cut at
/// the column boundary; its tail starts a new line and can be followed by further words.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        while word_len > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let cut = word
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            out.push(word[..cut].to_string());
            word = &word[cut..];
            word_len -= width;
        }

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            out.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

pub struct Indent;

impl TextOperation for Indent {
    type Config = IndentConfig;
    const ID: OperationId = OperationId::Indent;

    fn apply(&self, text: &str, config: &IndentConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        let size = config.size();
        match config.mode {
            Some(IndentMode::Indent) => {
                let unit = if config.use_tabs {
                    "\t".to_string()
                } else {
                    " ".repeat(size)
                };
                map_lines(text, |line| format!("{}{}", unit, line))
            }
            Some(IndentMode::Dedent) => map_lines(text, |line| {
                if config.use_tabs {
                    line.strip_prefix('\t').unwrap_or(line).to_string()
                } else {
                    let spaces = line.bytes().take(size).take_while(|b| *b == b' ').count();
                    line[spaces..].to_string()
                }
            }),
            None => text.to_string(),
        }
    }
}

pub struct PadAlign;

impl TextOperation for PadAlign {
    type Config = PadAlignConfig;
    const ID: OperationId = OperationId::PadAlign;

    fn apply(&self, text: &str, config: &PadAlignConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        let Some(align) = config.align else {
            return text.to_string();
        };
        let width = config.width();
        let fill = config.fill();

        map_lines(text, |line| {
            let len = line.chars().count();
            if len >= width {
                return line.to_string();
            }
            let pad = width - len;
            let (left, right) = match align {
                Align::Left => (0, pad),
                Align::Right => (pad, 0),
                Align::Center => (pad / 2, pad - pad / 2),
            };
            let mut out = String::with_capacity(line.len() + pad * fill.len_utf8());
            out.extend(std::iter::repeat(fill).take(left));
            out.push_str(line);
            out.extend(std::iter::repeat(fill).take(right));
            out
        })
    }
}
