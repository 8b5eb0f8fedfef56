//! Whole-text operations: trim, change-case, remove-chars, slugify, quote

use super::case;
use super::config::{
    ChangeCaseConfig, CharClass, QuoteConfig, QuoteMode, RemoveCharsConfig, SlugifyConfig,
    TrimConfig,
};
use super::{per_unit, ExecutionContext, TextOperation};
use crate::operation::OperationId;

pub struct Trim;

impl TextOperation for Trim {
    type Config = TrimConfig;
    const ID: OperationId = OperationId::Trim;

    fn apply(&self, text: &str, config: &TrimConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        per_unit(text, config.lines, |unit| unit.trim().to_string())
    }
}

pub struct ChangeCase;

impl TextOperation for ChangeCase {
    type Config = ChangeCaseConfig;
    const ID: OperationId = OperationId::ChangeCase;

    fn apply(
        &self,
        text: &str,
        config: &ChangeCaseConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        match config.mode {
            Some(mode) => per_unit(text, config.lines, |unit| case::convert(unit, mode)),
            None => text.to_string(),
        }
    }
}

pub struct RemoveChars;

impl TextOperation for RemoveChars {
    type Config = RemoveCharsConfig;
    const ID: OperationId = OperationId::RemoveChars;

    fn apply(
        &self,
        text: &str,
        config: &RemoveCharsConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        let Some(mode) = config.mode else {
            return text.to_string();
        };
        let custom = config.custom.as_str();
        text.chars()
            .filter(|c| match mode {
                CharClass::Digits => !c.is_ascii_digit(),
                CharClass::Punctuation => !c.is_ascii_punctuation(),
                CharClass::NonAscii => c.is_ascii(),
                CharClass::Custom => !custom.contains(*c),
            })
            .collect()
    }
}

pub struct Slugify;

impl TextOperation for Slugify {
    type Config = SlugifyConfig;
    const ID: OperationId = OperationId::Slugify;

    fn apply(&self, text: &str, config: &SlugifyConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        per_unit(text, config.lines, slugify)
    }
}

/// Lowercase, drop everything but ASCII word characters, whitespace and hyphens, then
/// collapse whitespace, `_` and `-` runs into one hyphen and trim hyphens from both ends
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }
    slug
}

pub struct Quote;

impl TextOperation for Quote {
    type Config = QuoteConfig;
    const ID: OperationId = OperationId::Quote;

    fn apply(&self, text: &str, config: &QuoteConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        let quote = config.quote.as_str();
        let (Some(mode), false) = (config.mode, quote.is_empty()) else {
            return text.to_string();
        };
        per_unit(text, config.lines, |unit| match mode {
            QuoteMode::Add => format!("{quote}{unit}{quote}"),
            QuoteMode::Remove => unquote(unit, quote).to_string(),
        })
    }
}

fn unquote<'a>(unit: &'a str, quote: &str) -> &'a str {
    if unit.len() >= quote.len() * 2 {
        if let Some(inner) = unit
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::test_support::run;
    use serde_json::json;

    #[test]
    fn test_trim_whole_text() {
        assert_eq!(run(Trim, "  hello world  ", json!({})), "hello world");
        assert_eq!(run(Trim, "  a  \n  b  ", json!({})), "a  \n  b");
    }

    #[test]
    fn test_trim_lines() {
        assert_eq!(run(Trim, "  a  \n  b  ", json!({ "lines": true })), "a\nb");
    }

    #[test]
    fn test_change_case_defaults_to_per_line() {
        assert_eq!(
            run(ChangeCase, "hello world\nfoo bar", json!({ "mode": "camel" })),
            "helloWorld\nfooBar"
        );
        assert_eq!(
            run(ChangeCase, "hello world\nfoo bar", json!({ "mode": "camel", "lines": false })),
            "helloWorldFooBar"
        );
    }

    #[test]
    fn test_change_case_unknown_mode_is_passthrough() {
        assert_eq!(run(ChangeCase, "Hello", json!({ "mode": "zigzag" })), "Hello");
    }

    #[test]
    fn test_remove_chars_classes() {
        let input = "Café #42, ok!";
        assert_eq!(run(RemoveChars, input, json!({ "mode": "digits" })), "Café #, ok!");
        assert_eq!(run(RemoveChars, input, json!({ "mode": "punctuation" })), "Café 42 ok");
        assert_eq!(run(RemoveChars, input, json!({ "mode": "non-ascii" })), "Caf #42, ok!");
        assert_eq!(
            run(RemoveChars, input, json!({ "mode": "custom", "custom": "aeiou" })),
            "Cfé #42, k!"
        );
        assert_eq!(
            run(RemoveChars, input, json!({ "mode": "custom", "custom": "" })),
            input
        );
    }

    #[test]
    fn test_slugify_whole_text_collapses_line_breaks() {
        assert_eq!(run(Slugify, "Hello, World!\nSecond  Line", json!({})), "hello-world-second-line");
    }

    #[test]
    fn test_slugify_lines() {
        assert_eq!(
            run(Slugify, " Hello, World! \n__Second -- Line__", json!({ "lines": true })),
            "hello-world\nsecond-line"
        );
    }

    #[test]
    fn test_quote_add_and_remove() {
        assert_eq!(run(Quote, "a\nb", json!({})), "\"a\"\n\"b\"");
        assert_eq!(run(Quote, "a\nb", json!({ "lines": false, "char": "'" })), "'a\nb'");
        assert_eq!(run(Quote, "\"a\"\nb", json!({ "mode": "remove" })), "a\nb");
    }

    #[test]
    fn test_quote_remove_needs_both_ends() {
        assert_eq!(run(Quote, "\"", json!({ "mode": "remove" })), "\"");
        assert_eq!(run(Quote, "\"a", json!({ "mode": "remove" })), "\"a");
        assert_eq!(run(Quote, "\"\"", json!({ "mode": "remove" })), "");
    }
}
