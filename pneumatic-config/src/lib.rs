//! Shared configuration loader for the pneumatic tools.
//!
//! `defaults/pneumatic.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`PneumaticConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use pneumatic_text::document::UuidIdGenerator;
use pneumatic_text::formats::markdown::is_writable_checklist_id;
use pneumatic_text::legacy::ClipboardOptions;
use pneumatic_text::DecodeOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/pneumatic.default.toml");

/// Top-level configuration consumed by pneumatic applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PneumaticConfig {
    pub markdown: MarkdownConfig,
    pub ids: IdsConfig,
    pub clipboard: ClipboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub normalize_checklists: bool,
}

impl From<&MarkdownConfig> for DecodeOptions {
    fn from(config: &MarkdownConfig) -> Self {
        DecodeOptions {
            normalize_checklists: config.normalize_checklists,
            ..DecodeOptions::default()
        }
    }
}

/// Prefixes for generated checklist ids.
#[derive(Debug, Clone, Deserialize)]
pub struct IdsConfig {
    pub list_prefix: String,
    pub item_prefix: String,
}

impl IdsConfig {
    /// A prefix ends up inside `[clist:<list>|<item>]`, so it must be
    /// writable there. An empty prefix yields bare uuids.
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, prefix) in [
            ("ids.list_prefix", &self.list_prefix),
            ("ids.item_prefix", &self.item_prefix),
        ] {
            if !prefix.is_empty() && !is_writable_checklist_id(prefix) {
                return Err(ConfigError::Message(format!(
                    "{key} {prefix:?} cannot appear in a checklist marker"
                )));
            }
        }
        Ok(())
    }
}

impl From<IdsConfig> for UuidIdGenerator {
    fn from(config: IdsConfig) -> Self {
        UuidIdGenerator::new(config.list_prefix, config.item_prefix)
    }
}

impl From<&IdsConfig> for UuidIdGenerator {
    fn from(config: &IdsConfig) -> Self {
        UuidIdGenerator::new(config.list_prefix.clone(), config.item_prefix.clone())
    }
}

/// Which rich flavours a copy writes next to plain text.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClipboardConfig {
    pub write_html: bool,
    pub write_json: bool,
}

impl From<ClipboardConfig> for ClipboardOptions {
    fn from(config: ClipboardConfig) -> Self {
        ClipboardOptions {
            write_html: config.write_html,
            write_json: config.write_json,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// A `tracing` filter directive, e.g. `warn` or `pneumatic_text=debug`.
    pub level: String,
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

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<PneumaticConfig, ConfigError> {
        let config: PneumaticConfig = self.builder.build()?.try_deserialize()?;
        config.ids.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PneumaticConfig, ConfigError> {
    Loader::new().build()
}
