//! Shared configuration loader for the textpipe tools.
//!
//! `defaults/textpipe.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer user files and single key
//! overrides on top of those defaults via [`Loader`] before deserializing into
//! [`TextpipeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use textpipe_engine::EngineSettings;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../defaults/textpipe.default.toml");

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{key} must be greater than zero")]
    NotPositive { key: &'static str },
}

/// Top-level configuration consumed by textpipe applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TextpipeConfig {
    pub engine: EngineConfig,
    pub pipeline: PipelineConfig,
    pub export: ExportConfig,
}

/// Limits applied while running pipelines.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub regex_size_limit: usize,
    pub regex_dfa_size_limit: usize,
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub default_icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub pretty: bool,
}

impl TextpipeConfig {
    /// The engine's view of these settings
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            regex_size_limit: self.engine.regex_size_limit,
            regex_dfa_size_limit: self.engine.regex_dfa_size_limit,
        }
    }

    fn check(self) -> Result<Self, SettingsError> {
        if self.engine.regex_size_limit == 0 {
            return Err(SettingsError::NotPositive {
                key: "engine.regex_size_limit",
            });
        }
        if self.engine.regex_dfa_size_limit == 0 {
            return Err(SettingsError::NotPositive {
                key: "engine.regex_dfa_size_limit",
            });
        }
        Ok(self)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `engine.shuffle_seed`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, SettingsError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and check the resulting configuration.
    pub fn build(self) -> Result<TextpipeConfig, SettingsError> {
        let config: TextpipeConfig = self.builder.build()?.try_deserialize()?;
        config.check()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TextpipeConfig, SettingsError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.engine_settings(), EngineSettings::default());
        assert_eq!(config.engine.shuffle_seed, None);
        assert_eq!(config.pipeline.default_icon, textpipe_engine::DEFAULT_PIPELINE_ICON);
        assert!(config.export.pretty);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("engine.shuffle_seed", 7)
            .expect("override to apply")
            .set_override("export.pretty", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.engine.shuffle_seed, Some(7));
        assert!(!config.export.pretty);
    }

    #[test]
    fn rejects_zero_limits() {
        let err = Loader::new()
            .set_override("engine.regex_size_limit", 0)
            .expect("override to apply")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "engine.regex_size_limit must be greater than zero");
    }

    #[test]
    fn layers_user_files() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "[pipeline]\ndefault_icon = \"🧹\"").expect("write temp file");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");

        assert_eq!(config.pipeline.default_icon, "🧹");
        assert_eq!(config.engine.regex_size_limit, 1 << 20);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        assert!(Loader::new().with_file("/nonexistent/textpipe.toml").build().is_err());
        assert!(Loader::new()
            .with_optional_file("/nonexistent/textpipe.toml")
            .build()
            .is_ok());
    }
}
