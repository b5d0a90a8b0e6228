//! Layered configuration
//!
//! `defaults/rat.default.toml` is compiled in and always forms the bottom layer. The `rat`
//! binary stacks, in order: `rat.toml` from the working directory if it exists, the file
//! given with `--config`, then each `--set section.key=value`. Components only take their
//! own section, so library users can build sections by hand and never touch [Loader].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, FileSourceFile, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/rat.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatConfig {
    pub grammar: GrammarConfig,
    pub matcher: MatcherConfig,
    pub entities: EntityConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Grammar loading knobs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrammarConfig {
    pub empty_marker: String,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig {
            empty_marker: "є".to_string(),
        }
    }
}

/// Matching knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MatcherConfig {
    pub max_depth: usize,
    pub require_full_match: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            max_depth: 256,
            require_full_match: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EntityConfig {
    pub min_abbreviation: usize,
}

impl Default for EntityConfig {
    fn default() -> Self {
        EntityConfig {
            min_abbreviation: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Name of the project file picked up from the working directory when present
pub const PROJECT_FILE: &str = "rat.toml";

/// Builds a [RatConfig] from the embedded defaults plus any number of layers.
/// Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Add a TOML layer that must exist
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(toml_file(path.as_ref(), true));
        self
    }

    /// Add a TOML layer that is skipped when the file is absent
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(toml_file(path.as_ref(), false));
        self
    }

    /// Force `key` (dotted, e.g. `matcher.max_depth`) to `value` over every file layer
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Apply a `section.key=value` assignment as typed on a command line
    pub fn set_assignment(self, assignment: &str) -> Result<Self, ConfigError> {
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.set_override(key.trim(), value.trim().to_string())
            }
            _ => Err(ConfigError::Message(format!(
                "expected key=value, got '{}'",
                assignment
            ))),
        }
    }

    pub fn build(self) -> Result<RatConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn toml_file(path: &Path, required: bool) -> File<FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = Loader::new().build().expect("defaults to deserialize");
        assert_eq!(config.grammar, GrammarConfig::default());
        assert_eq!(config.matcher, MatcherConfig::default());
        assert_eq!(config.entities, EntityConfig::default());
        assert_eq!(config.output.format, "treeviz");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("matcher.max_depth", 12)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.matcher.max_depth, 12);
        assert!(config.matcher.require_full_match);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[entities]\nmin_abbreviation = 1").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert_eq!(config.entities.min_abbreviation, 1);
        assert_eq!(config.output.format, "treeviz");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here.toml")
            .build()
            .unwrap();
        assert_eq!(config.matcher.max_depth, 256);
    }

    #[test]
    fn command_line_assignments() {
        let config = Loader::new()
            .set_assignment("matcher.max_depth=12")
            .and_then(|loader| loader.set_assignment("output.format = tag"))
            .and_then(|loader| loader.set_assignment("matcher.require_full_match=false"))
            .expect("assignments to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.matcher.max_depth, 12);
        assert!(!config.matcher.require_full_match);
        assert_eq!(config.output.format, "tag");
    }

    #[test]
    fn malformed_assignment_is_rejected() {
        assert!(Loader::new().set_assignment("matcher.max_depth").is_err());
        assert!(Loader::new().set_assignment("=3").is_err());
    }

    #[test]
    fn missing_required_file_fails() {
        assert!(Loader::new().with_file("/definitely/not/here.toml").build().is_err());
    }
}
