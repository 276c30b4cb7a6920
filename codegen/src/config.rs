//! Generator configuration.
//!
//! A run is configured from defaults, then an optional TOML file, then
//! command-line overrides applied by the caller:
//!
//! ```toml
//! output-dir = "src/generated"
//! target = "rust"
//! rust-runtime = "simpleresource"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Source language of the generated classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Rust structs wrapping a `SimpleResource`.
    #[default]
    Rust,
    /// C++/Qt headers deriving from `Nepomuk::SimpleResource`.
    Qt,
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" => Ok(Target::Rust),
            "qt" | "cpp" | "c++" => Ok(Target::Qt),
            _ => Err(ConfigError::UnknownTarget(s.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Rust => f.write_str("rust"),
            Target::Qt => f.write_str("qt"),
        }
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Root of the generated tree. Namespace directories are created below it.
    pub output_dir: PathBuf,
    /// Report progress at info level.
    pub verbose: bool,
    /// Output language.
    pub target: Target,
    /// Crate path the Rust wrappers import `SimpleResource` and friends from.
    pub rust_runtime: String,
    /// Outer C++ namespace of the Qt headers.
    pub qt_namespace: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            verbose: true,
            target: Target::Rust,
            rust_runtime: "simpleresource".to_string(),
            qt_namespace: "Nepomuk".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML, unknown keys, or an
    /// unknown target name.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`GeneratorConfig::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }
}
