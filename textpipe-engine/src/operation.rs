//! Operation identifiers and catalog metadata
//!
//! `OperationId` is a closed set. Adding an operation means adding a variant here, a
//! definition in the [registry](crate::registry) and a [`TextOperation`](crate::TextOperation)
//! implementation registered in the default executor map.

use crate::operations::config::ConfigMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a registered operation
///
/// Serialized as the kebab-case identifier used in export files (`"change-case"`).
/// Deserializing an unknown identifier fails, which is what makes import strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationId {
    Trim,
    Replace,
    ChangeCase,
    SortLines,
    JoinLines,
    SplitLines,
    FilterLines,
    DedupeLines,
    ReverseLines,
    NumberLines,
    ShuffleLines,
    WrapLines,
    WordWrap,
    Indent,
    ExtractMatches,
    KeepLines,
    RemoveLines,
    RemoveChars,
    EncodeDecode,
    Escape,
    PadAlign,
    FormatNumbers,
    IncrementNumbers,
    Slugify,
    Quote,
}

impl OperationId {
    /// Every operation, in catalog order
    pub const ALL: [OperationId; 25] = [
        OperationId::Trim,
        OperationId::Replace,
        OperationId::ChangeCase,
        OperationId::SortLines,
        OperationId::JoinLines,
        OperationId::SplitLines,
        OperationId::FilterLines,
        OperationId::DedupeLines,
        OperationId::ReverseLines,
        OperationId::NumberLines,
        OperationId::ShuffleLines,
        OperationId::WrapLines,
        OperationId::WordWrap,
        OperationId::Indent,
        OperationId::ExtractMatches,
        OperationId::KeepLines,
        OperationId::RemoveLines,
        OperationId::RemoveChars,
        OperationId::EncodeDecode,
        OperationId::Escape,
        OperationId::PadAlign,
        OperationId::FormatNumbers,
        OperationId::IncrementNumbers,
        OperationId::Slugify,
        OperationId::Quote,
    ];

    /// The wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationId::Trim => "trim",
            OperationId::Replace => "replace",
            OperationId::ChangeCase => "change-case",
            OperationId::SortLines => "sort-lines",
            OperationId::JoinLines => "join-lines",
            OperationId::SplitLines => "split-lines",
            OperationId::FilterLines => "filter-lines",
            OperationId::DedupeLines => "dedupe-lines",
            OperationId::ReverseLines => "reverse-lines",
            OperationId::NumberLines => "number-lines",
            OperationId::ShuffleLines => "shuffle-lines",
            OperationId::WrapLines => "wrap-lines",
            OperationId::WordWrap => "word-wrap",
            OperationId::Indent => "indent",
            OperationId::ExtractMatches => "extract-matches",
            OperationId::KeepLines => "keep-lines",
            OperationId::RemoveLines => "remove-lines",
            OperationId::RemoveChars => "remove-chars",
            OperationId::EncodeDecode => "encode-decode",
            OperationId::Escape => "escape",
            OperationId::PadAlign => "pad-align",
            OperationId::FormatNumbers => "format-numbers",
            OperationId::IncrementNumbers => "increment-numbers",
            OperationId::Slugify => "slugify",
            OperationId::Quote => "quote",
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown operation '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for OperationId {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Catalog grouping used by the operation picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Text,
    Lines,
    Structure,
    Search,
    Data,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Text,
        Category::Lines,
        Category::Structure,
        Category::Search,
        Category::Data,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Text => "Text",
            Category::Lines => "Lines",
            Category::Structure => "Structure",
            Category::Search => "Search",
            Category::Data => "Data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// Display metadata and default configuration of one operation
///
/// Definitions live in the static catalog and are never copied into pipelines: steps refer
/// to them by [`OperationId`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinition {
    pub id: OperationId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: Category,
    pub default_config: ConfigMap,
}
