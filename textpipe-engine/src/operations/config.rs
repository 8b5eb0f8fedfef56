//! Typed step configuration
//!
//! On the wire a step config is a free-form JSON object: the editor UI may store extra keys
//! and newer versions may add keys. [`PipelineStep`](crate::PipelineStep) therefore keeps the
//! raw [`ConfigMap`] untouched, and each operation reads it through its own config struct.
//!
//! Parsing is lenient field by field:
//!
//! - a missing field takes the operation's default
//! - flags follow truthiness (`0`, `""` and `null` are false)
//! - numbers accept JSON numbers and numeric strings, anything else falls back to the default
//! - an unrecognized mode leaves the field `None`, which makes the operation a pass-through
//! - unknown keys are ignored
//!
//! [`StepConfig`] is the tagged union of all config structs keyed by operation, for callers
//! that want to inspect a step without running it.

use crate::operation::OperationId;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Raw step configuration as stored in pipelines and export files
pub type ConfigMap = serde_json::Map<String, Value>;

/// Parse a raw config into an operation's config struct
///
/// Never fails: the field deserializers accept any JSON value, so the only error left is a
/// non-object config, which yields the defaults.
pub fn parse_config<C>(raw: &ConfigMap) -> C
where
    C: DeserializeOwned + Default,
{
    serde_json::from_value(Value::Object(raw.clone())).unwrap_or_default()
}

/// Field deserializers that accept any JSON value
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(truthy(&Value::deserialize(deserializer)?))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        })
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_number(&Value::deserialize(deserializer)?))
    }

    pub fn choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn as_number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

choice_enum!(
    /// Target convention of `change-case`
    CaseMode {
        Upper => "upper",
        Lower => "lower",
        Title => "title",
        Camel => "camel",
        Snake => "snake",
        Kebab => "kebab",
        Pascal => "pascal",
        Constant => "constant",
    }
);

choice_enum!(SortDirection { Asc => "asc", Desc => "desc" });

choice_enum!(
    /// Which occurrence of a repeated line survives
    Occurrence { First => "first", Last => "last" }
);

choice_enum!(IndentMode { Indent => "indent", Dedent => "dedent" });

choice_enum!(
    /// Character class stripped by `remove-chars`
    CharClass {
        Digits => "digits",
        Punctuation => "punctuation",
        NonAscii => "non-ascii",
        Custom => "custom",
    }
);

choice_enum!(Align { Left => "left", Center => "center", Right => "right" });

choice_enum!(QuoteMode { Add => "add", Remove => "remove" });

choice_enum!(Codec { Url => "url", Base64 => "base64", Html => "html" });

choice_enum!(CodecDirection { Encode => "encode", Decode => "decode" });

choice_enum!(EscapeKind { Json => "json", Regex => "regex" });

choice_enum!(EscapeDirection { Escape => "escape", Unescape => "unescape" });

/// `{format}-{operation}` mode of `encode-decode`, e.g. `base64-decode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeMode {
    pub codec: Codec,
    pub direction: CodecDirection,
}

impl FromStr for EncodeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (codec, direction) = s.split_once('-').ok_or(())?;
        Ok(EncodeMode {
            codec: codec.parse()?,
            direction: direction.parse()?,
        })
    }
}

/// `{type}-{operation}` mode of `escape`, e.g. `json-unescape`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeMode {
    pub kind: EscapeKind,
    pub direction: EscapeDirection,
}

impl FromStr for EscapeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, direction) = s.split_once('-').ok_or(())?;
        Ok(EscapeMode {
            kind: kind.parse()?,
            direction: direction.parse()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrimConfig {
    #[serde(deserialize_with = "lenient::flag")]
    pub lines: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplaceConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub from: String,
    #[serde(deserialize_with = "lenient::text")]
    pub to: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub regex: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub case_insensitive: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub lines: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeCaseConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub mode: Option<CaseMode>,
    #[serde(deserialize_with = "lenient::flag")]
    pub lines: bool,
}

impl Default for ChangeCaseConfig {
    fn default() -> Self {
        ChangeCaseConfig {
            mode: Some(CaseMode::Upper),
            lines: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SortLinesConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub direction: Option<SortDirection>,
    #[serde(deserialize_with = "lenient::flag")]
    pub numeric: bool,
}

impl Default for SortLinesConfig {
    fn default() -> Self {
        SortLinesConfig {
            direction: Some(SortDirection::Asc),
            numeric: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoinLinesConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub separator: String,
}

impl Default for JoinLinesConfig {
    fn default() -> Self {
        JoinLinesConfig {
            separator: " ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitLinesConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub separator: String,
}

impl Default for SplitLinesConfig {
    fn default() -> Self {
        SplitLinesConfig {
            separator: ",".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterLinesConfig {
    #[serde(deserialize_with = "lenient::flag")]
    pub trim: bool,
}

impl Default for FilterLinesConfig {
    fn default() -> Self {
        FilterLinesConfig { trim: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DedupeLinesConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub keep: Option<Occurrence>,
    #[serde(deserialize_with = "lenient::flag")]
    pub case_sensitive: bool,
}

impl Default for DedupeLinesConfig {
    fn default() -> Self {
        DedupeLinesConfig {
            keep: Some(Occurrence::First),
            case_sensitive: true,
        }
    }
}

/// Config of operations that take no options
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NoConfig {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberLinesConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub start: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub prefix: String,
    #[serde(deserialize_with = "lenient::text")]
    pub separator: String,
}

impl NumberLinesConfig {
    pub const DEFAULT_START: i64 = 1;

    pub fn start(&self) -> i64 {
        self.start
            .map(|n| n.trunc() as i64)
            .unwrap_or(Self::DEFAULT_START)
    }
}

impl Default for NumberLinesConfig {
    fn default() -> Self {
        NumberLinesConfig {
            start: Some(Self::DEFAULT_START as f64),
            prefix: String::new(),
            separator: ". ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WrapLinesConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub prefix: String,
    #[serde(deserialize_with = "lenient::text")]
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordWrapConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f64>,
}

impl WordWrapConfig {
    pub const DEFAULT_WIDTH: usize = 80;

    /// Effective column width; `None` when the configured width is not positive
    pub fn width(&self) -> Option<usize> {
        match self.width {
            Some(w) if w >= 1.0 => Some(w.trunc() as usize),
            Some(_) => None,
            None => Some(Self::DEFAULT_WIDTH),
        }
    }
}

impl Default for WordWrapConfig {
    fn default() -> Self {
        WordWrapConfig {
            width: Some(Self::DEFAULT_WIDTH as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndentConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub mode: Option<IndentMode>,
    #[serde(deserialize_with = "lenient::number")]
    pub size: Option<f64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub use_tabs: bool,
}

impl IndentConfig {
    pub const DEFAULT_SIZE: usize = 2;
    pub const MAX_SIZE: usize = 64;

    pub fn size(&self) -> usize {
        match self.size {
            Some(n) if n >= 0.0 => (n.trunc() as usize).min(Self::MAX_SIZE),
            _ => Self::DEFAULT_SIZE,
        }
    }
}

impl Default for IndentConfig {
    fn default() -> Self {
        IndentConfig {
            mode: Some(IndentMode::Indent),
            size: Some(Self::DEFAULT_SIZE as f64),
            use_tabs: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractMatchesConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub pattern: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub case_insensitive: bool,
}

/// Shared by `keep-lines` and `remove-lines`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineFilterConfig {
    #[serde(deserialize_with = "lenient::text")]
    pub pattern: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub regex: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoveCharsConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub mode: Option<CharClass>,
    #[serde(deserialize_with = "lenient::text")]
    pub custom: String,
}

impl Default for RemoveCharsConfig {
    fn default() -> Self {
        RemoveCharsConfig {
            mode: Some(CharClass::Digits),
            custom: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncodeDecodeConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub mode: Option<EncodeMode>,
}

impl Default for EncodeDecodeConfig {
    fn default() -> Self {
        EncodeDecodeConfig {
            mode: Some(EncodeMode {
                codec: Codec::Url,
                direction: CodecDirection::Encode,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EscapeConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub mode: Option<EscapeMode>,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        EscapeConfig {
            mode: Some(EscapeMode {
                kind: EscapeKind::Json,
                direction: EscapeDirection::Escape,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PadAlignConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub align: Option<Align>,
    #[serde(deserialize_with = "lenient::number")]
    pub width: Option<f64>,
    #[serde(rename = "char", deserialize_with = "lenient::text")]
    pub pad_char: String,
}

impl PadAlignConfig {
    pub const DEFAULT_WIDTH: usize = 20;
    pub const MAX_WIDTH: usize = 10_000;

    pub fn width(&self) -> usize {
        match self.width {
            Some(n) if n >= 0.0 => (n.trunc() as usize).min(Self::MAX_WIDTH),
            _ => Self::DEFAULT_WIDTH,
        }
    }

    /// First character of `char`, a space when empty
    pub fn fill(&self) -> char {
        self.pad_char.chars().next().unwrap_or(' ')
    }
}

impl Default for PadAlignConfig {
    fn default() -> Self {
        PadAlignConfig {
            align: Some(Align::Left),
            width: Some(Self::DEFAULT_WIDTH as f64),
            pad_char: " ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatNumbersConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub decimals: Option<f64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub thousands: bool,
}

impl FormatNumbersConfig {
    pub const DEFAULT_DECIMALS: usize = 2;
    pub const MAX_DECIMALS: usize = 20;

    pub fn decimals(&self) -> usize {
        match self.decimals {
            Some(n) if n >= 0.0 => (n.trunc() as usize).min(Self::MAX_DECIMALS),
            _ => Self::DEFAULT_DECIMALS,
        }
    }
}

impl Default for FormatNumbersConfig {
    fn default() -> Self {
        FormatNumbersConfig {
            decimals: Some(Self::DEFAULT_DECIMALS as f64),
            thousands: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncrementNumbersConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub delta: Option<f64>,
}

impl IncrementNumbersConfig {
    pub const DEFAULT_DELTA: f64 = 1.0;

    pub fn delta(&self) -> f64 {
        self.delta.unwrap_or(Self::DEFAULT_DELTA)
    }
}

impl Default for IncrementNumbersConfig {
    fn default() -> Self {
        IncrementNumbersConfig {
            delta: Some(Self::DEFAULT_DELTA),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlugifyConfig {
    #[serde(deserialize_with = "lenient::flag")]
    pub lines: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteConfig {
    #[serde(deserialize_with = "lenient::choice")]
    pub mode: Option<QuoteMode>,
    #[serde(rename = "char", deserialize_with = "lenient::text")]
    pub quote: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub lines: bool,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            mode: Some(QuoteMode::Add),
            quote: "\"".to_string(),
            lines: true,
        }
    }
}

/// Typed view of a step's configuration, one variant per operation
#[derive(Debug, Clone, PartialEq)]
pub enum StepConfig {
    Trim(TrimConfig),
    Replace(ReplaceConfig),
    ChangeCase(ChangeCaseConfig),
    SortLines(SortLinesConfig),
    JoinLines(JoinLinesConfig),
    SplitLines(SplitLinesConfig),
    FilterLines(FilterLinesConfig),
    DedupeLines(DedupeLinesConfig),
    ReverseLines,
    NumberLines(NumberLinesConfig),
    ShuffleLines,
    WrapLines(WrapLinesConfig),
    WordWrap(WordWrapConfig),
    Indent(IndentConfig),
    ExtractMatches(ExtractMatchesConfig),
    KeepLines(LineFilterConfig),
    RemoveLines(LineFilterConfig),
    RemoveChars(RemoveCharsConfig),
    EncodeDecode(EncodeDecodeConfig),
    Escape(EscapeConfig),
    PadAlign(PadAlignConfig),
    FormatNumbers(FormatNumbersConfig),
    IncrementNumbers(IncrementNumbersConfig),
    Slugify(SlugifyConfig),
    Quote(QuoteConfig),
}

impl StepConfig {
    /// Read a raw config as the given operation's typed config
    pub fn parse(id: OperationId, raw: &ConfigMap) -> StepConfig {
        use OperationId as Op;
        match id {
            Op::Trim => StepConfig::Trim(parse_config(raw)),
            Op::Replace => StepConfig::Replace(parse_config(raw)),
            Op::ChangeCase => StepConfig::ChangeCase(parse_config(raw)),
            Op::SortLines => StepConfig::SortLines(parse_config(raw)),
            Op::JoinLines => StepConfig::JoinLines(parse_config(raw)),
            Op::SplitLines => StepConfig::SplitLines(parse_config(raw)),
            Op::FilterLines => StepConfig::FilterLines(parse_config(raw)),
            Op::DedupeLines => StepConfig::DedupeLines(parse_config(raw)),
            Op::ReverseLines => StepConfig::ReverseLines,
            Op::NumberLines => StepConfig::NumberLines(parse_config(raw)),
            Op::ShuffleLines => StepConfig::ShuffleLines,
            Op::WrapLines => StepConfig::WrapLines(parse_config(raw)),
            Op::WordWrap => StepConfig::WordWrap(parse_config(raw)),
            Op::Indent => StepConfig::Indent(parse_config(raw)),
            Op::ExtractMatches => StepConfig::ExtractMatches(parse_config(raw)),
            Op::KeepLines => StepConfig::KeepLines(parse_config(raw)),
            Op::RemoveLines => StepConfig::RemoveLines(parse_config(raw)),
            Op::RemoveChars => StepConfig::RemoveChars(parse_config(raw)),
            Op::EncodeDecode => StepConfig::EncodeDecode(parse_config(raw)),
            Op::Escape => StepConfig::Escape(parse_config(raw)),
            Op::PadAlign => StepConfig::PadAlign(parse_config(raw)),
            Op::FormatNumbers => StepConfig::FormatNumbers(parse_config(raw)),
            Op::IncrementNumbers => StepConfig::IncrementNumbers(parse_config(raw)),
            Op::Slugify => StepConfig::Slugify(parse_config(raw)),
            Op::Quote => StepConfig::Quote(parse_config(raw)),
        }
    }

    /// The defaults of an operation
    pub fn default_for(id: OperationId) -> StepConfig {
        StepConfig::parse(id, &ConfigMap::new())
    }

    pub fn operation_id(&self) -> OperationId {
        use OperationId as Op;
        match self {
            StepConfig::Trim(_) => Op::Trim,
            StepConfig::Replace(_) => Op::Replace,
            StepConfig::ChangeCase(_) => Op::ChangeCase,
            StepConfig::SortLines(_) => Op::SortLines,
            StepConfig::JoinLines(_) => Op::JoinLines,
            StepConfig::SplitLines(_) => Op::SplitLines,
            StepConfig::FilterLines(_) => Op::FilterLines,
            StepConfig::DedupeLines(_) => Op::DedupeLines,
            StepConfig::ReverseLines => Op::ReverseLines,
            StepConfig::NumberLines(_) => Op::NumberLines,
            StepConfig::ShuffleLines => Op::ShuffleLines,
            StepConfig::WrapLines(_) => Op::WrapLines,
            StepConfig::WordWrap(_) => Op::WordWrap,
            StepConfig::Indent(_) => Op::Indent,
            StepConfig::ExtractMatches(_) => Op::ExtractMatches,
            StepConfig::KeepLines(_) => Op::KeepLines,
            StepConfig::RemoveLines(_) => Op::RemoveLines,
            StepConfig::RemoveChars(_) => Op::RemoveChars,
            StepConfig::EncodeDecode(_) => Op::EncodeDecode,
            StepConfig::Escape(_) => Op::Escape,
            StepConfig::PadAlign(_) => Op::PadAlign,
            StepConfig::FormatNumbers(_) => Op::FormatNumbers,
            StepConfig::IncrementNumbers(_) => Op::IncrementNumbers,
            StepConfig::Slugify(_) => Op::Slugify,
            StepConfig::Quote(_) => Op::Quote,
        }
    }
}
