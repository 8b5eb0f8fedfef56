//! Pattern driven operations: replace, extract-matches, keep-lines, remove-lines
//!
//! Patterns come straight from the user. They are compiled through
//! [`ExecutionContext::compile`], so an invalid or oversized pattern turns the step into a
//! pass-through instead of an error. Matching never backtracks, see
//! [`EngineSettings`](crate::EngineSettings).
//!
//! Anchors follow the execution mode: in whole-text mode `^` and `$` match only at the start
//! and end of the whole string, in line mode each line is matched on its own so they match
//! at every line.

use super::config::{ExtractMatchesConfig, LineFilterConfig, ReplaceConfig};
use super::{per_unit, split_lines, ExecutionContext, TextOperation};
use crate::operation::OperationId;
use regex::{NoExpand, Regex};

pub struct Replace;

impl TextOperation for Replace {
    type Config = ReplaceConfig;
    const ID: OperationId = OperationId::Replace;

    fn apply(&self, text: &str, config: &ReplaceConfig, ctx: &mut ExecutionContext<'_>) -> String {
        if config.from.is_empty() {
            return text.to_string();
        }

        if config.regex {
            let Some(re) = ctx.compile(&config.from, config.case_insensitive) else {
                return text.to_string();
            };
            let replacement = expand_replacement(&config.to, &re);
            per_unit(text, config.lines, |unit| {
                re.replace_all(unit, replacement.as_str()).into_owned()
            })
        } else if config.case_insensitive {
            let Some(re) = ctx.compile(&regex::escape(&config.from), true) else {
                return text.to_string();
            };
            per_unit(text, config.lines, |unit| {
                re.replace_all(unit, NoExpand(&config.to)).into_owned()
            })
        } else {
            per_unit(text, config.lines, |unit| unit.replace(&config.from, &config.to))
        }
    }
}

/// Rewrite browser style replacement tokens into `regex` syntax for the groups of `re`
///
/// `$&` is the whole match and `$$` a literal dollar. `$nn` names a group when `re` has that
/// many, otherwise `$n` is tried with the second digit kept literally; `$0` and missing groups
/// stay literal. `$<name>` reads a named group when `re` has any named groups. Any other `$`
/// is kept literally.
pub fn expand_replacement(to: &str, re: &Regex) -> String {
    let groups = re.captures_len() - 1;
    let has_names = re.capture_names().flatten().next().is_some();
    let mut out = String::with_capacity(to.len());
    let mut rest = to;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push_str("$$");
            rest = tail;
        } else if let Some(tail) = after.strip_prefix('&') {
            out.push_str("${0}");
            rest = tail;
        } else if let Some(digits) = group_reference(after, groups) {
            out.push_str("${");
            out.push_str(&after[..digits]);
            out.push('}');
            rest = &after[digits..];
        } else if let Some((name, tail)) = after
            .strip_prefix('<')
            .and_then(|s| s.split_once('>'))
            .filter(|(name, _)| has_names && !name.is_empty())
        {
            out.push_str("${");
            out.push_str(name);
            out.push('}');
            rest = tail;
        } else {
            out.push_str("$$");
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Length of the leading group number in `after`, preferring two digits
fn group_reference(after: &str, groups: usize) -> Option<usize> {
    let digits = after
        .bytes()
        .take(2)
        .take_while(u8::is_ascii_digit)
        .count();
    (1..=digits).rev().find(|&len| {
        after[..len]
            .parse::<usize>()
            .is_ok_and(|n| (1..=groups).contains(&n))
    })
}

pub struct ExtractMatches;

impl TextOperation for ExtractMatches {
    type Config = ExtractMatchesConfig;
    const ID: OperationId = OperationId::ExtractMatches;

    fn apply(
        &self,
        text: &str,
        config: &ExtractMatchesConfig,
        ctx: &mut ExecutionContext<'_>,
    ) -> String {
        if config.pattern.is_empty() {
            return text.to_string();
        }
        let Some(re) = ctx.compile(&config.pattern, config.case_insensitive) else {
            return text.to_string();
        };
        re.find_iter(text)
            .map(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

enum LineMatcher {
    Pattern(Regex),
    Literal { needle: String, fold_case: bool },
}

impl LineMatcher {
    /// `None` when there is nothing to match with: empty or unusable pattern
    fn build(config: &LineFilterConfig, ctx: &ExecutionContext<'_>) -> Option<LineMatcher> {
        if config.pattern.is_empty() {
            return None;
        }
        if config.regex {
            ctx.compile(&config.pattern, config.case_insensitive)
                .map(LineMatcher::Pattern)
        } else if config.case_insensitive {
            Some(LineMatcher::Literal {
                needle: config.pattern.to_lowercase(),
                fold_case: true,
            })
        } else {
            Some(LineMatcher::Literal {
                needle: config.pattern.clone(),
                fold_case: false,
            })
        }
    }

    fn is_match(&self, line: &str) -> bool {
        match self {
            LineMatcher::Pattern(re) => re.is_match(line),
            LineMatcher::Literal {
                needle,
                fold_case: true,
            } => line.to_lowercase().contains(needle.as_str()),
            LineMatcher::Literal { needle, .. } => line.contains(needle.as_str()),
        }
    }
}

fn filter_by_match(
    text: &str,
    config: &LineFilterConfig,
    ctx: &ExecutionContext<'_>,
    keep_matching: bool,
) -> String {
    let Some(matcher) = LineMatcher::build(config, ctx) else {
        return text.to_string();
    };
    split_lines(text)
        .into_iter()
        .filter(|line| matcher.is_match(line) == keep_matching)
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct KeepLines;

impl TextOperation for KeepLines {
    type Config = LineFilterConfig;
    const ID: OperationId = OperationId::KeepLines;

    fn apply(&self, text: &str, config: &LineFilterConfig, ctx: &mut ExecutionContext<'_>) -> String {
        filter_by_match(text, config, ctx, true)
    }
}

pub struct RemoveLines;

impl TextOperation for RemoveLines {
    type Config = LineFilterConfig;
    const ID: OperationId = OperationId::RemoveLines;

    fn apply(&self, text: &str, config: &LineFilterConfig, ctx: &mut ExecutionContext<'_>) -> String {
        filter_by_match(text, config, ctx, false)
    }
}
