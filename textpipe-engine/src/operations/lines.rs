//! Line list operations
//!
//! All of these split on `\n`, work on the list of lines and rejoin with `\n`, except
//! `join-lines` and `split-lines` which move between the two shapes.

use super::config::{
    DedupeLinesConfig, FilterLinesConfig, JoinLinesConfig, NoConfig, NumberLinesConfig,
    Occurrence, SortDirection, SortLinesConfig, SplitLinesConfig, WrapLinesConfig,
};
use super::{map_lines, split_lines, ExecutionContext, TextOperation};
use crate::operation::OperationId;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;

pub struct SortLines;

impl TextOperation for SortLines {
    type Config = SortLinesConfig;
    const ID: OperationId = OperationId::SortLines;

    fn apply(
        &self,
        text: &str,
        config: &SortLinesConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        let mut lines = split_lines(text);
        let compare: fn(&str, &str) -> Ordering = if config.numeric {
            numeric_cmp
        } else {
            natural_text_cmp
        };

        match config.direction {
            Some(SortDirection::Desc) => lines.sort_by(|a, b| compare(b, a)),
            _ => lines.sort_by(|a, b| compare(a, b)),
        }
        lines.join("\n")
    }
}

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
});

/// Leading numeric value of a line, like a browser's `parseFloat`; `0` when there is none
pub fn leading_number(line: &str) -> f64 {
    FLOAT_PREFIX
        .find(line)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn numeric_cmp(a: &str, b: &str) -> Ordering {
    leading_number(a)
        .partial_cmp(&leading_number(b))
        .unwrap_or(Ordering::Equal)
}

/// Case-insensitive ordering, lower case first when two lines differ only in case
fn natural_text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub struct JoinLines;

impl TextOperation for JoinLines {
    type Config = JoinLinesConfig;
    const ID: OperationId = OperationId::JoinLines;

    fn apply(
        &self,
        text: &str,
        config: &JoinLinesConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        split_lines(text).join(&config.separator)
    }
}

pub struct SplitLines;

impl TextOperation for SplitLines {
    type Config = SplitLinesConfig;
    const ID: OperationId = OperationId::SplitLines;

    fn apply(
        &self,
        text: &str,
        config: &SplitLinesConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        if config.separator.is_empty() {
            return text.to_string();
        }
        text.split(config.separator.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct FilterLines;

impl TextOperation for FilterLines {
    type Config = FilterLinesConfig;
    const ID: OperationId = OperationId::FilterLines;

    fn apply(
        &self,
        text: &str,
        config: &FilterLinesConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        split_lines(text)
            .into_iter()
            .filter(|line| !line.is_empty() && !(config.trim && line.trim().is_empty()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct DedupeLines;

impl TextOperation for DedupeLines {
    type Config = DedupeLinesConfig;
    const ID: OperationId = OperationId::DedupeLines;

    fn apply(
        &self,
        text: &str,
        config: &DedupeLinesConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        let key = |line: &str| {
            if config.case_sensitive {
                line.to_string()
            } else {
                line.to_lowercase()
            }
        };

        let lines = split_lines(text);
        let mut seen = HashSet::new();
        let kept: Vec<&str> = match config.keep {
            Some(Occurrence::Last) => {
                let mut kept: Vec<&str> = lines
                    .into_iter()
                    .rev()
                    .filter(|line| seen.insert(key(*line)))
                    .collect();
                kept.reverse();
                kept
            }
            _ => lines
                .into_iter()
                .filter(|line| seen.insert(key(*line)))
                .collect(),
        };
        kept.join("\n")
    }
}

pub struct ReverseLines;

impl TextOperation for ReverseLines {
    type Config = NoConfig;
    const ID: OperationId = OperationId::ReverseLines;

    fn apply(&self, text: &str, _config: &NoConfig, _ctx: &mut ExecutionContext<'_>) -> String {
        let mut lines = split_lines(text);
        lines.reverse();
        lines.join("\n")
    }
}

pub struct NumberLines;

impl TextOperation for NumberLines {
    type Config = NumberLinesConfig;
    const ID: OperationId = OperationId::NumberLines;

    fn apply(
        &self,
        text: &str,
        config: &NumberLinesConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        let mut n = config.start();
        map_lines(text, |line| {
            let numbered = format!("{}{}{}{}", config.prefix, n, config.separator, line);
            n = n.saturating_add(1);
            numbered
        })
    }
}

/// The one non-deterministic operation; the permutation comes from the context's generator
pub struct ShuffleLines;

impl TextOperation for ShuffleLines {
    type Config = NoConfig;
    const ID: OperationId = OperationId::ShuffleLines;

    fn apply(&self, text: &str, _config: &NoConfig, ctx: &mut ExecutionContext<'_>) -> String {
        let mut lines = split_lines(text);
        lines.shuffle(&mut *ctx.rng);
        lines.join("\n")
    }
}

pub struct WrapLines;

impl TextOperation for WrapLines {
    type Config = WrapLinesConfig;
    const ID: OperationId = OperationId::WrapLines;

    fn apply(
        &self,
        text: &str,
        config: &WrapLinesConfig,
        _ctx: &mut ExecutionContext<'_>,
    ) -> String {
        map_lines(text, |line| format!("{}{}{}", config.prefix, line, config.suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::test_support::run;
    use serde_json::json;

    #[test]
    fn test_sort_ascending() {
        assert_eq!(run(SortLines, "b\na\nc", json!({ "direction": "asc" })), "a\nb\nc");
    }

    #[test]
    fn test_sort_descending() {
        assert_eq!(run(SortLines, "b\na\nc", json!({ "direction": "desc" })), "c\nb\na");
    }

    #[test]
    fn test_sort_ignores_case_first() {
        assert_eq!(run(SortLines, "banana\nApple\ncherry", json!({})), "Apple\nbanana\ncherry");
        assert_eq!(run(SortLines, "A\na", json!({})), "a\nA");
    }

    #[test]
    fn test_sort_numeric() {
        assert_eq!(
            run(SortLines, "10 apples\n9 pears\n-1\n2.5", json!({ "numeric": true })),
            "-1\n2.5\n9 pears\n10 apples"
        );
    }

    #[test]
    fn test_sort_numeric_non_numbers_count_as_zero_and_stay_stable() {
        assert_eq!(
            run(SortLines, "x\n1\ny\n-2", json!({ "numeric": true })),
            "-2\nx\ny\n1"
        );
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("  3.5kg"), 3.5);
        assert_eq!(leading_number("1e3"), 1000.0);
        assert_eq!(leading_number(".5"), 0.5);
        assert_eq!(leading_number("abc 12"), 0.0);
    }

    #[test]
    fn test_join_and_split() {
        assert_eq!(run(JoinLines, "a\nb\nc", json!({})), "a b c");
        assert_eq!(run(JoinLines, "a\nb", json!({ "separator": ", " })), "a, b");
        assert_eq!(run(JoinLines, "", json!({})), "");
        assert_eq!(run(SplitLines, "a,b,,c", json!({})), "a\nb\n\nc");
        assert_eq!(run(SplitLines, "a|b", json!({ "separator": "" })), "a|b");
    }

    #[test]
    fn test_filter_lines() {
        let input = "a\n\n  \nb";
        assert_eq!(run(FilterLines, input, json!({})), "a\nb");
        assert_eq!(run(FilterLines, input, json!({ "trim": false })), "a\n  \nb");
    }

    #[test]
    fn test_dedupe_keep_first() {
        assert_eq!(
            run(DedupeLines, "a\nb\na\nc\nb", json!({ "keep": "first" })),
            "a\nb\nc"
        );
    }

    #[test]
    fn test_dedupe_keep_last_preserves_original_order() {
        assert_eq!(
            run(DedupeLines, "a\nb\na\nc\nb", json!({ "keep": "last" })),
            "a\nc\nb"
        );
    }

    #[test]
    fn test_dedupe_case_insensitive_keeps_first_spelling() {
        assert_eq!(
            run(DedupeLines, "Foo\nfoo\nFOO\nbar", json!({ "caseSensitive": false })),
            "Foo\nbar"
        );
    }

    #[test]
    fn test_reverse_lines_keeps_characters() {
        assert_eq!(run(ReverseLines, "abc\ndef", json!({})), "def\nabc");
    }

    #[test]
    fn test_number_lines() {
        assert_eq!(run(NumberLines, "a\nb", json!({})), "1. a\n2. b");
        assert_eq!(
            run(NumberLines, "a\nb", json!({ "start": 9, "prefix": "#", "separator": ") " })),
            "#9) a\n#10) b"
        );
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let input = "1\n2\n3\n4\n5\n6\n7\n8";
        let out = run(ShuffleLines, input, json!({}));
        let mut sorted: Vec<&str> = out.split('\n').collect();
        sorted.sort();
        assert_eq!(sorted.join("\n"), input);
    }

    #[test]
    fn test_wrap_lines() {
        assert_eq!(
            run(WrapLines, "a\nb", json!({ "prefix": "<li>", "suffix": "</li>" })),
            "<li>a</li>\n<li>b</li>"
        );
    }
}
