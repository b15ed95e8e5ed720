//! Persistent CLI configuration.
//!
//! Built-in defaults come from `config/default.toml`; a user file, when
//! present, is merged over them. Command-line flags override both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::output::GraphType;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Every configurable setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where snapshots are read from
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// Output defaults
    #[serde(default)]
    pub output: OutputConfig,
    /// Evaluation defaults
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl CliConfig {
    /// Configuration shipped with the binary.
    ///
    /// # Errors
    /// Fails only if the embedded defaults are not valid TOML.
    pub fn builtin() -> Result<Self> {
        toml::from_str(DEFAULT_CONFIG).context("embedded default configuration is invalid")
    }

    /// Overlay the settings `other` sets on top of these.
    pub fn merge(&mut self, other: &Self) {
        self.snapshot.merge(&other.snapshot);
        self.output.merge(&other.output);
        self.evaluation.merge(&other.evaluation);
    }
}

/// `[snapshot]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Main snapshot file; empty when unset
    pub path: String,
    /// Reference snapshot subtracted from results; empty when unset
    pub reference_path: String,
}

impl SnapshotConfig {
    fn merge(&mut self, other: &Self) {
        if !other.path.is_empty() {
            self.path.clone_from(&other.path);
        }
        if !other.reference_path.is_empty() {
            self.reference_path.clone_from(&other.reference_path);
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Graph format used when `graph` is run without `--type`
    pub graph_type: GraphType,
    /// Prefix for `href` links in dot output
    pub docs_url: String,
    /// Align tab-separated `list` columns
    pub align: bool,
}

impl OutputConfig {
    fn merge(&mut self, other: &Self) {
        self.graph_type = other.graph_type;
        if !other.docs_url.is_empty() {
            self.docs_url.clone_from(&other.docs_url);
        }
        self.align = other.align;
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graph_type: GraphType::Dot,
            docs_url: default_docs_url(),
            align: true,
        }
    }
}

fn default_docs_url() -> String {
    "https://pkg.go.dev/".to_string()
}

/// `[evaluation]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Resolve missing exact paths to nothing instead of failing
    pub lenient_packages: bool,
}

impl EvaluationConfig {
    #[allow(clippy::missing_const_for_fn)]
    fn merge(&mut self, other: &Self) {
        self.lenient_packages = other.lenient_packages;
    }
}

/// Loads, edits and saves the configuration file.
pub struct ConfigManager {
    path: PathBuf,
    config: CliConfig,
}

impl ConfigManager {
    /// Load from the default per-user location.
    ///
    /// # Errors
    /// Fails when the configuration directory cannot be determined or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = default_config_path()?;
        Self::load_with_path(path)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    ///
    /// # Errors
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let mut config = CliConfig::builtin()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            let user_config: CliConfig = toml::from_str(&contents)
                .with_context(|| format!("invalid config at {}", path.display()))?;
            config.merge(&user_config);
            tracing::debug!(path = %path.display(), "merged user configuration");
        }

        Ok(Self { path, config })
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// File the configuration is saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the configuration, creating parent directories.
    ///
    /// # Errors
    /// Fails when the directory or file cannot be written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        let toml = toml::to_string_pretty(&self.config)?;
        fs::write(&self.path, toml)
            .with_context(|| format!("failed to write config to {}", self.path.display()))?;
        Ok(())
    }

    /// Value of a dotted key such as `output.docs_url`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let config = &self.config;
        match key {
            "snapshot.path" => Some(config.snapshot.path.clone()),
            "snapshot.reference_path" => Some(config.snapshot.reference_path.clone()),
            "output.graph_type" => Some(config.output.graph_type.to_string()),
            "output.docs_url" => Some(config.output.docs_url.clone()),
            "output.align" => Some(config.output.align.to_string()),
            "evaluation.lenient_packages" => Some(config.evaluation.lenient_packages.to_string()),
            _ => None,
        }
    }

    /// Set a dotted key, validating the value.
    ///
    /// # Errors
    /// Fails for unknown keys and values of the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let config = &mut self.config;
        match key {
            "snapshot.path" => config.snapshot.path = value.to_string(),
            "snapshot.reference_path" => config.snapshot.reference_path = value.to_string(),
            "output.graph_type" => {
                config.output.graph_type = value.parse().map_err(|err: String| anyhow!(err))?;
            }
            "output.docs_url" => config.output.docs_url = value.to_string(),
            "output.align" => config.output.align = parse_bool(value)?,
            "evaluation.lenient_packages" => {
                config.evaluation.lenient_packages = parse_bool(value)?;
            }
            _ => return Err(anyhow!("unknown configuration key: {key}")),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("expected boolean value, received '{value}'")),
    }
}

fn default_config_path() -> Result<PathBuf> {
    let base =
        dirs::config_dir().ok_or_else(|| anyhow!("unable to determine configuration directory"))?;
    Ok(base.join("pkgsel").join("config.toml"))
}

/// `key=value` lines grouped by section, for `config list`.
#[must_use]
pub fn format_sections(config: &CliConfig) -> Vec<String> {
    vec![
        "[snapshot]".to_string(),
        format!("path=\"{}\"", config.snapshot.path),
        format!("reference_path=\"{}\"", config.snapshot.reference_path),
        String::new(),
        "[output]".to_string(),
        format!("graph_type=\"{}\"", config.output.graph_type),
        format!("docs_url=\"{}\"", config.output.docs_url),
        format!("align={}", config.output.align),
        String::new(),
        "[evaluation]".to_string(),
        format!("lenient_packages={}", config.evaluation.lenient_packages),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        assert_eq!(CliConfig::builtin().unwrap(), CliConfig::default());
    }

    #[test]
    fn test_merge_keeps_unset_strings() {
        let mut base = CliConfig::default();
        base.snapshot.path = "main.json".to_string();
        let mut user = CliConfig::default();
        user.snapshot.reference_path = "ref.json".to_string();
        user.output.align = false;

        base.merge(&user);
        assert_eq!(base.snapshot.path, "main.json");
        assert_eq!(base.snapshot.reference_path, "ref.json");
        assert!(!base.output.align);
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("On").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
