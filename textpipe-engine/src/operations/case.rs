//! Case conventions
//!
//! The identifier conventions (camel, snake, kebab, pascal, constant) first break the input
//! into words and then rejoin them. A word boundary is any non-alphanumeric character (which
//! is dropped), a lower-case letter or digit followed by an upper-case letter (`fooBar`,
//! `v2Beta`), or the last capital of an acronym that starts a new word (`HTTPServer`).

use super::config::CaseMode;

/// Convert `text` to the given convention
pub fn convert(text: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Upper => text.to_uppercase(),
        CaseMode::Lower => text.to_lowercase(),
        CaseMode::Title => title_case(text),
        CaseMode::Camel => {
            let words = split_words(text);
            let mut out = String::new();
            for (i, word) in words.iter().enumerate() {
                if i == 0 {
                    out.push_str(&word.to_lowercase());
                } else {
                    out.push_str(&capitalize(word));
                }
            }
            out
        }
        CaseMode::Pascal => split_words(text).iter().map(|w| capitalize(w)).collect(),
        CaseMode::Snake => join_words(text, "_", false),
        CaseMode::Kebab => join_words(text, "-", false),
        CaseMode::Constant => join_words(text, "_", true),
    }
}

/// Break `text` into words on separators and case transitions
pub fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_numeric()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn join_words(text: &str, separator: &str, upper: bool) -> String {
    split_words(text)
        .iter()
        .map(|w| if upper { w.to_uppercase() } else { w.to_lowercase() })
        .collect::<Vec<_>>()
        .join(separator)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Upper-case the first word character after every non-word character, lower-case the rest.
/// Separators are kept as they are.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !in_word {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        in_word = is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_on_separators() {
        assert_eq!(split_words("hello world-foo_bar"), vec!["hello", "world", "foo", "bar"]);
        assert_eq!(split_words("  --  "), Vec::<String>::new());
    }

    #[test]
    fn test_split_words_on_case_transitions() {
        assert_eq!(split_words("helloWorld"), vec!["hello", "World"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("version2Beta"), vec!["version2", "Beta"]);
        assert_eq!(split_words("utf8"), vec!["utf8"]);
    }

    #[test]
    fn test_identifier_conventions() {
        let input = "hello big World";
        assert_eq!(convert(input, CaseMode::Camel), "helloBigWorld");
        assert_eq!(convert(input, CaseMode::Pascal), "HelloBigWorld");
        assert_eq!(convert(input, CaseMode::Snake), "hello_big_world");
        assert_eq!(convert(input, CaseMode::Kebab), "hello-big-world");
        assert_eq!(convert(input, CaseMode::Constant), "HELLO_BIG_WORLD");
    }

    #[test]
    fn test_conventions_convert_between_each_other() {
        assert_eq!(convert("parseHTTPResponse", CaseMode::Snake), "parse_http_response");
        assert_eq!(convert("parse_http_response", CaseMode::Camel), "parseHttpResponse");
        assert_eq!(convert("MAX_RETRY_COUNT", CaseMode::Kebab), "max-retry-count");
    }

    #[test]
    fn test_title_case_keeps_separators() {
        assert_eq!(convert("the QUICK brown-fox", CaseMode::Title), "The Quick Brown-Fox");
        assert_eq!(convert("snake_case words", CaseMode::Title), "Snake_case Words");
    }

    #[test]
    fn test_upper_and_lower() {
        assert_eq!(convert("MiXeD 1", CaseMode::Upper), "MIXED 1");
        assert_eq!(convert("MiXeD 1", CaseMode::Lower), "mixed 1");
    }
}
