//! Operation executors
//!
//! Every operation is a pure `(text, config) -> text` function. Each one implements
//! [`TextOperation`] with its own typed config, and the [`ExecutorRegistry`] maps operation
//! ids to type-erased [`Executor`]s so the reducer can dispatch on the id alone.
//!
//! # Execution modes
//!
//! Most text operations take a `lines` flag choosing between applying once to the whole
//! string and applying to each `\n` separated line (rejoined with `\n`). The default differs
//! per operation: `trim`, `replace` and `slugify` default to whole text, `change-case` and
//! `quote` default to per line.
//!
//! # Failure model
//!
//! Executors never fail. A malformed value falls back to the field default, a bad pattern or
//! an unrecognized mode returns the input unchanged. See [`config`] for the parsing rules.
//!
//! # Module Organization
//!
//! - [`text`]: trim, change-case, remove-chars, slugify, quote
//! - [`lines`]: sort, join, split, filter, dedupe, reverse, number, shuffle, wrap
//! - [`structure`]: word-wrap, indent, pad-align
//! - [`search`]: replace, extract-matches, keep-lines, remove-lines
//! - [`data`]: encode-decode, escape, format-numbers, increment-numbers

pub mod case;
pub mod config;
pub mod data;
pub mod lines;
pub mod search;
pub mod structure;
pub mod text;

use crate::operation::OperationId;
use crate::settings::EngineSettings;
use config::{parse_config, ConfigMap};
use rand::RngCore;
use regex::{Regex, RegexBuilder};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Everything an executor may use besides its text and config
///
/// The random source is injected so that `shuffle-lines`, the only non-deterministic
/// operation, can be reproduced with a seeded generator.
pub struct ExecutionContext<'a> {
    pub settings: &'a EngineSettings,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(settings: &'a EngineSettings, rng: &'a mut dyn RngCore) -> Self {
        ExecutionContext { settings, rng }
    }

    /// Compile a user supplied pattern, `None` when invalid or over the size limits
    pub fn compile(&self, pattern: &str, case_insensitive: bool) -> Option<Regex> {
        match RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .size_limit(self.settings.regex_size_limit)
            .dfa_size_limit(self.settings.regex_dfa_size_limit)
            .build()
        {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("ignoring invalid pattern {:?}: {}", pattern, e);
                None
            }
        }
    }
}

/// A text transformation with its own typed configuration
pub trait TextOperation: Send + Sync {
    type Config: DeserializeOwned + Default;

    const ID: OperationId;

    fn apply(&self, text: &str, config: &Self::Config, ctx: &mut ExecutionContext<'_>) -> String;
}

type ExecuteFn = dyn Fn(&str, &ConfigMap, &mut ExecutionContext<'_>) -> String + Send + Sync;

/// Type-erased executor: parses the raw config, then runs the operation
pub struct Executor {
    id: OperationId,
    run: Box<ExecuteFn>,
}

impl Executor {
    pub fn from_operation<O>(operation: O) -> Self
    where
        O: TextOperation + 'static,
    {
        Executor {
            id: O::ID,
            run: Box::new(move |text: &str, raw: &ConfigMap, ctx: &mut ExecutionContext<'_>| {
                let config: O::Config = parse_config(raw);
                operation.apply(text, &config, ctx)
            }),
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn execute(&self, text: &str, raw: &ConfigMap, ctx: &mut ExecutionContext<'_>) -> String {
        (self.run)(text, raw, ctx)
    }
}

/// Strategy map from operation id to executor
pub struct ExecutorRegistry {
    executors: HashMap<OperationId, Executor>,
}

impl ExecutorRegistry {
    /// An empty registry; every step is skipped until operations are registered
    pub fn new() -> Self {
        ExecutorRegistry {
            executors: HashMap::new(),
        }
    }

    /// Register an operation, replacing any executor already registered for its id
    pub fn register<O>(&mut self, operation: O)
    where
        O: TextOperation + 'static,
    {
        self.executors
            .insert(O::ID, Executor::from_operation(operation));
    }

    pub fn get(&self, id: OperationId) -> Option<&Executor> {
        self.executors.get(&id)
    }

    pub fn has(&self, id: OperationId) -> bool {
        self.executors.contains_key(&id)
    }

    /// Run the executor for `id`, `None` when nothing is registered for it
    pub fn execute(
        &self,
        id: OperationId,
        text: &str,
        raw: &ConfigMap,
        ctx: &mut ExecutionContext<'_>,
    ) -> Option<String> {
        self.get(id).map(|executor| executor.execute(text, raw, ctx))
    }

    /// Registry with every built-in operation
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(text::Trim);
        registry.register(search::Replace);
        registry.register(text::ChangeCase);
        registry.register(lines::SortLines);
        registry.register(lines::JoinLines);
        registry.register(lines::SplitLines);
        registry.register(lines::FilterLines);
        registry.register(lines::DedupeLines);
        registry.register(lines::ReverseLines);
        registry.register(lines::NumberLines);
        registry.register(lines::ShuffleLines);
        registry.register(lines::WrapLines);
        registry.register(structure::WordWrap);
        registry.register(structure::Indent);
        registry.register(search::ExtractMatches);
        registry.register(search::KeepLines);
        registry.register(search::RemoveLines);
        registry.register(text::RemoveChars);
        registry.register(data::EncodeDecode);
        registry.register(data::Escape);
        registry.register(structure::PadAlign);
        registry.register(data::FormatNumbers);
        registry.register(data::IncrementNumbers);
        registry.register(text::Slugify);
        registry.register(text::Quote);

        registry
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Apply `f` to every `\n` separated line and rejoin
pub(crate) fn map_lines<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    text.split('\n').map(|line| f(line)).collect::<Vec<_>>().join("\n")
}

/// Apply `f` per line when `per_line` is set, otherwise to the whole text
pub(crate) fn per_unit<F>(text: &str, per_line: bool, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    if per_line {
        map_lines(text, f)
    } else {
        f(text)
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}
