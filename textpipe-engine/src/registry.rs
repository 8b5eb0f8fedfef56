//! Operation catalog
//!
//! The catalog maps each [`OperationId`] to its display metadata and default configuration.
//! It is pure data, built once on first use and read-only afterwards. Steps created through
//! "add operation" copy the default config out of here.

use crate::operation::{Category, OperationDefinition, OperationId};
use crate::operations::config::ConfigMap;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;

static CATALOG: Lazy<OperationRegistry> = Lazy::new(OperationRegistry::with_defaults);

/// Registry of operation definitions
pub struct OperationRegistry {
    definitions: HashMap<OperationId, OperationDefinition>,
}

impl OperationRegistry {
    /// The process wide catalog
    pub fn global() -> &'static OperationRegistry {
        &CATALOG
    }

    /// Look up the definition of an operation
    pub fn lookup(&self, id: OperationId) -> Option<&OperationDefinition> {
        self.definitions.get(&id)
    }

    /// Look up by wire identifier; unknown identifiers are simply not found
    pub fn lookup_str(&self, id: &str) -> Option<&OperationDefinition> {
        id.parse::<OperationId>().ok().and_then(|id| self.lookup(id))
    }

    /// All definitions in catalog order
    pub fn list(&self) -> Vec<&OperationDefinition> {
        OperationId::ALL
            .iter()
            .filter_map(|id| self.definitions.get(id))
            .collect()
    }

    /// Definitions of one category, in catalog order
    pub fn by_category(&self, category: Category) -> Vec<&OperationDefinition> {
        self.list()
            .into_iter()
            .filter(|def| def.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn with_defaults() -> Self {
        let mut definitions = HashMap::new();
        for (id, name, description, icon, category, config) in catalog_entries() {
            definitions.insert(
                id,
                OperationDefinition {
                    id,
                    name,
                    description,
                    icon,
                    category,
                    default_config: into_map(config),
                },
            );
        }
        OperationRegistry { definitions }
    }
}

fn into_map(value: Value) -> ConfigMap {
    match value {
        Value::Object(map) => map,
        _ => ConfigMap::new(),
    }
}

type Entry = (
    OperationId,
    &'static str,
    &'static str,
    &'static str,
    Category,
    Value,
);

fn catalog_entries() -> Vec<Entry> {
    use Category::*;
    use OperationId as Op;

    vec![
        (
            Op::Trim,
            "Trim",
            "Remove leading and trailing whitespace",
            "scissors",
            Text,
            json!({ "lines": false }),
        ),
        (
            Op::Replace,
            "Find & Replace",
            "Replace text or regex matches",
            "replace",
            Search,
            json!({ "from": "", "to": "", "regex": false, "caseInsensitive": false, "lines": false }),
        ),
        (
            Op::ChangeCase,
            "Change Case",
            "Convert to upper, lower, title, camel, snake, kebab, pascal or constant case",
            "case-sensitive",
            Text,
            json!({ "mode": "upper", "lines": true }),
        ),
        (
            Op::SortLines,
            "Sort Lines",
            "Sort lines alphabetically or numerically",
            "arrow-up-down",
            Lines,
            json!({ "direction": "asc", "numeric": false }),
        ),
        (
            Op::JoinLines,
            "Join Lines",
            "Join all lines with a separator",
            "merge",
            Lines,
            json!({ "separator": " " }),
        ),
        (
            Op::SplitLines,
            "Split Into Lines",
            "Split text on a separator, one piece per line",
            "split",
            Lines,
            json!({ "separator": "," }),
        ),
        (
            Op::FilterLines,
            "Remove Empty Lines",
            "Drop empty and optionally whitespace-only lines",
            "filter",
            Lines,
            json!({ "trim": true }),
        ),
        (
            Op::DedupeLines,
            "Remove Duplicates",
            "Remove repeated lines",
            "copy-minus",
            Lines,
            json!({ "keep": "first", "caseSensitive": true }),
        ),
        (
            Op::ReverseLines,
            "Reverse Lines",
            "Reverse the order of lines",
            "arrow-down-up",
            Lines,
            json!({}),
        ),
        (
            Op::NumberLines,
            "Number Lines",
            "Prefix every line with a running number",
            "list-ordered",
            Lines,
            json!({ "start": 1, "prefix": "", "separator": ". " }),
        ),
        (
            Op::ShuffleLines,
            "Shuffle Lines",
            "Put lines in random order",
            "shuffle",
            Lines,
            json!({}),
        ),
        (
            Op::WrapLines,
            "Wrap Lines",
            "Add a prefix and suffix to every line",
            "brackets",
            Lines,
            json!({ "prefix": "", "suffix": "" }),
        ),
        (
            Op::WordWrap,
            "Word Wrap",
            "Break long lines at a column width",
            "wrap-text",
            Structure,
            json!({ "width": 80 }),
        ),
        (
            Op::Indent,
            "Indent / Dedent",
            "Add or remove leading indentation",
            "indent",
            Structure,
            json!({ "mode": "indent", "size": 2, "useTabs": false }),
        ),
        (
            Op::ExtractMatches,
            "Extract Matches",
            "Keep only the regex matches, one per line",
            "text-search",
            Search,
            json!({ "pattern": "", "caseInsensitive": false }),
        ),
        (
            Op::KeepLines,
            "Keep Matching Lines",
            "Keep only lines that contain a match",
            "list-checks",
            Search,
            json!({ "pattern": "", "regex": false, "caseInsensitive": false }),
        ),
        (
            Op::RemoveLines,
            "Remove Matching Lines",
            "Drop lines that contain a match",
            "list-x",
            Search,
            json!({ "pattern": "", "regex": false, "caseInsensitive": false }),
        ),
        (
            Op::RemoveChars,
            "Remove Characters",
            "Strip digits, punctuation, non-ASCII or custom characters",
            "eraser",
            Text,
            json!({ "mode": "digits", "custom": "" }),
        ),
        (
            Op::EncodeDecode,
            "Encode / Decode",
            "URL, Base64 and HTML entity encoding",
            "binary",
            Data,
            json!({ "mode": "url-encode" }),
        ),
        (
            Op::Escape,
            "Escape / Unescape",
            "JSON string and regex escaping",
            "code",
            Data,
            json!({ "mode": "json-escape" }),
        ),
        (
            Op::PadAlign,
            "Pad & Align",
            "Pad lines to a fixed width",
            "align-left",
            Structure,
            json!({ "align": "left", "width": 20, "char": " " }),
        ),
        (
            Op::FormatNumbers,
            "Format Numbers",
            "Fixed decimals and thousands separators",
            "hash",
            Data,
            json!({ "decimals": 2, "thousands": true }),
        ),
        (
            Op::IncrementNumbers,
            "Increment Numbers",
            "Add a value to every number",
            "plus",
            Data,
            json!({ "delta": 1 }),
        ),
        (
            Op::Slugify,
            "Slugify",
            "Lowercase, hyphen separated, URL safe",
            "link",
            Text,
            json!({ "lines": false }),
        ),
        (
            Op::Quote,
            "Quote / Unquote",
            "Add or remove surrounding quotes",
            "quote",
            Text,
            json!({ "mode": "add", "char": "\"", "lines": true }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operation_is_registered() {
        let registry = OperationRegistry::global();
        assert_eq!(registry.len(), OperationId::ALL.len());
        for id in OperationId::ALL {
            let def = registry.lookup(id).unwrap();
            assert_eq!(def.id, id);
            assert!(!def.name.is_empty());
            assert!(!def.icon.is_empty());
        }
    }

    #[test]
    fn test_list_follows_catalog_order() {
        let ids: Vec<_> = OperationRegistry::global()
            .list()
            .iter()
            .map(|def| def.id)
            .collect();
        assert_eq!(ids, OperationId::ALL.to_vec());
    }

    #[test]
    fn test_lookup_str() {
        let registry = OperationRegistry::global();
        assert_eq!(
            registry.lookup_str("sort-lines").map(|d| d.name),
            Some("Sort Lines")
        );
        assert!(registry.lookup_str("sort_lines").is_none());
    }

    #[test]
    fn test_by_category_partitions_catalog() {
        let registry = OperationRegistry::global();
        let total: usize = Category::ALL
            .iter()
            .map(|c| registry.by_category(*c).len())
            .sum();
        assert_eq!(total, registry.len());
        assert!(registry
            .by_category(Category::Search)
            .iter()
            .any(|d| d.id == OperationId::Replace));
    }

    #[test]
    fn test_default_configs_are_objects() {
        let def = OperationRegistry::global()
            .lookup(OperationId::NumberLines)
            .unwrap();
        assert_eq!(def.default_config.get("separator"), Some(&json!(". ")));
        assert_eq!(def.default_config.get("start"), Some(&json!(1)));
    }
}
