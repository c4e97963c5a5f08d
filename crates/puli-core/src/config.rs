// crates/puli-core/src/config.rs - Output Configuration
//
// Controls how the command line renders its output: colors, table style,
// nesting indentation and the style tags available inside cells.
//
// CONFIGURATION HIERARCHY (highest to lowest priority):
// 1. Command-line arguments (--color)
// 2. Environment variables (PULI_COLOR, PULI_TABLE_STYLE, PULI_LINE_WIDTH)
// 3. Project config file (<project>/.puli/cli.toml)
// 4. Global config file ($PULI_HOME/cli.toml)
// 5. Built-in defaults
//
// File layers are merged key by key, so a project file that only sets
// `output.color` keeps everything else the global file configured.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::table::TableStyle;

/// Errors that can occur during configuration loading and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid TOML in {file}: {error}")]
    ParseError { file: String, error: String },

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("I/O error reading config: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete output configuration
///
/// Every field has a default so partial files are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuliConfig {
    /// Rendering options
    #[serde(default)]
    pub output: OutputConfig,

    /// Style tags usable in cells, mapped to console dotted styles
    ///
    /// Example: `bad = "red.bold"`. Tags missing here fall back to the
    /// built-in set.
    #[serde(default = "default_styles")]
    pub styles: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Color output: "auto", "always", "never"
    #[serde(default)]
    pub color: ColorChoice,

    /// Table style for listings: "borderless", "compact", "bordered"
    #[serde(default)]
    pub table_style: TableStyle,

    /// Spaces per nesting level in grouped listings
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Fixed line width for grids; the terminal width is used when unset
    #[serde(default)]
    pub line_width: Option<usize>,

    /// Style tag wrapped around tree nodes that have children
    #[serde(default = "default_tree_highlight")]
    pub tree_highlight: String,
}

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        };
        f.write_str(name)
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "Invalid color '{}'. Must be one of: auto, always, never",
                other
            )),
        }
    }
}

/// Configuration loading and management
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration for a project from every source
    ///
    /// Missing files are not errors. Invalid TOML and invalid values are.
    pub fn load_config(project_dir: Option<&Path>) -> ConfigResult<PuliConfig> {
        let global = Self::global_config_path();
        let project = project_dir.map(Self::project_config_path);
        Self::load_from(global.as_deref(), project.as_deref(), |name| {
            std::env::var(name).ok()
        })
    }

    /// Load from explicit file locations and an environment lookup
    pub fn load_from<F>(
        global_file: Option<&Path>,
        project_file: Option<&Path>,
        env: F,
    ) -> ConfigResult<PuliConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = toml::Table::new();
        for path in [global_file, project_file].into_iter().flatten() {
            if let Some(layer) = Self::read_layer(path)? {
                debug!(file = %path.display(), "loaded config layer");
                merge_tables(&mut merged, layer);
            }
        }

        let mut config: PuliConfig =
            toml::Value::Table(merged)
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::ParseError {
                    file: "merged configuration".to_string(),
                    error: e.to_string(),
                })?;
        for (tag, style) in default_styles() {
            config.styles.entry(tag).or_insert(style);
        }

        Self::apply_env_overrides(&mut config, env)?;
        Self::validate_config(&config)?;

        Ok(config)
    }

    /// `$PULI_HOME/cli.toml`, when PULI_HOME is set
    pub fn global_config_path() -> Option<PathBuf> {
        std::env::var_os("PULI_HOME").map(|home| PathBuf::from(home).join("cli.toml"))
    }

    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".puli").join("cli.toml")
    }

    fn read_layer(path: &Path) -> ConfigResult<Option<toml::Table>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            ConfigError::ParseError {
                file: path.display().to_string(),
                error: e.to_string(),
            }
        })?;

        // Type errors are reported against the file that caused them
        toml::Value::Table(table.clone())
            .try_into::<PuliConfig>()
            .map_err(|e| ConfigError::ParseError {
                file: path.display().to_string(),
                error: e.to_string(),
            })?;

        Ok(Some(table))
    }

    /// Apply PULI_COLOR, PULI_TABLE_STYLE and PULI_LINE_WIDTH
    fn apply_env_overrides<F>(config: &mut PuliConfig, env: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(color) = env("PULI_COLOR") {
            config.output.color = color.parse().map_err(ConfigError::ValidationError)?;
        }

        if let Some(style) = env("PULI_TABLE_STYLE") {
            config.output.table_style = style.parse().map_err(ConfigError::ValidationError)?;
        }

        if let Some(width) = env("PULI_LINE_WIDTH") {
            let width = width.trim().parse::<usize>().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "PULI_LINE_WIDTH must be a positive number, got '{}'",
                    width
                ))
            })?;
            config.output.line_width = Some(width);
        }

        Ok(())
    }

    /// Validate the final configuration
    pub fn validate_config(config: &PuliConfig) -> ConfigResult<()> {
        if !(1..=16).contains(&config.output.indent) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid indent {}. Must be between 1 and 16",
                config.output.indent
            )));
        }

        if config.output.line_width == Some(0) {
            return Err(ConfigError::ValidationError(
                "line_width must be greater than zero".to_string(),
            ));
        }

        if let Some((tag, _)) = config.styles.iter().find(|(_, style)| style.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "Style for tag '{}' is empty",
                tag
            )));
        }

        if !config.output.tree_highlight.is_empty()
            && !config.styles.contains_key(&config.output.tree_highlight)
        {
            return Err(ConfigError::ValidationError(format!(
                "tree_highlight refers to unknown style tag '{}'",
                config.output.tree_highlight
            )));
        }

        Ok(())
    }
}

/// Recursively merge `overlay` into `base`; overlay values win
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(nested) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, nested);
                continue;
            }
            base.insert(key, toml::Value::Table(nested));
        } else {
            base.insert(key, value);
        }
    }
}

fn default_indent() -> usize {
    4
}
fn default_tree_highlight() -> String {
    "c1".to_string()
}

fn default_styles() -> IndexMap<String, String> {
    [
        ("c1", "cyan"),
        ("c2", "yellow"),
        ("b", "bold"),
        ("u", "underlined"),
        ("em", "italic"),
        ("good", "green"),
        ("bad", "red"),
        ("warn", "yellow"),
    ]
    .into_iter()
    .map(|(tag, style)| (tag.to_string(), style.to_string()))
    .collect()
}

impl Default for PuliConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            styles: default_styles(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::default(),
            table_style: TableStyle::default(),
            indent: default_indent(),
            line_width: None,
            tree_highlight: default_tree_highlight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PuliConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.output.table_style, TableStyle::Borderless);
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let config = ConfigManager::load_from(Some(&missing), None, no_env).unwrap();
        assert_eq!(config.output.color, ColorChoice::Auto);
    }

    #[test]
    fn test_project_layer_overrides_single_keys() {
        let dir = TempDir::new().unwrap();
        let global = write(
            &dir,
            "global.toml",
            "[output]\ncolor = \"never\"\ntable_style = \"bordered\"\n",
        );
        let project = write(&dir, "project.toml", "[output]\ncolor = \"always\"\n");

        let config = ConfigManager::load_from(Some(&global), Some(&project), no_env).unwrap();
        assert_eq!(config.output.color, ColorChoice::Always);
        assert_eq!(config.output.table_style, TableStyle::Bordered);
    }

    #[test]
    fn test_custom_styles_extend_defaults() {
        let dir = TempDir::new().unwrap();
        let project = write(&dir, "project.toml", "[styles]\nbad = \"red.bold\"\nhot = \"magenta\"\n");

        let config = ConfigManager::load_from(None, Some(&project), no_env).unwrap();
        assert_eq!(config.styles["bad"], "red.bold");
        assert_eq!(config.styles["hot"], "magenta");
        assert_eq!(config.styles["c1"], "cyan");
    }

    #[test]
    fn test_env_overrides_files() {
        let dir = TempDir::new().unwrap();
        let project = write(&dir, "project.toml", "[output]\ncolor = \"always\"\n");

        let env = |name: &str| match name {
            "PULI_COLOR" => Some("never".to_string()),
            "PULI_LINE_WIDTH" => Some("120".to_string()),
            _ => None,
        };
        let config = ConfigManager::load_from(None, Some(&project), env).unwrap();
        assert_eq!(config.output.color, ColorChoice::Never);
        assert_eq!(config.output.line_width, Some(120));
    }

    #[test]
    fn test_invalid_env_value_is_rejected() {
        let env = |name: &str| (name == "PULI_TABLE_STYLE").then(|| "fancy".to_string());
        let err = ConfigManager::load_from(None, None, env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("fancy")));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let project = write(&dir, "broken.toml", "[output\ncolor = ");

        let err = ConfigManager::load_from(None, Some(&project), no_env).unwrap_err();
        match err {
            ConfigError::ParseError { file, .. } => assert!(file.ends_with("broken.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_enum_value_in_file() {
        let dir = TempDir::new().unwrap();
        let project = write(&dir, "project.toml", "[output]\ncolor = \"sometimes\"\n");
        let err = ConfigManager::load_from(None, Some(&project), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_indent_out_of_range() {
        let mut config = PuliConfig::default();
        config.output.indent = 0;
        assert!(ConfigManager::validate_config(&config).is_err());
        config.output.indent = 17;
        assert!(ConfigManager::validate_config(&config).is_err());
    }

    #[test]
    fn test_tree_highlight_must_be_known() {
        let mut config = PuliConfig::default();
        config.output.tree_highlight = "sparkle".to_string();
        assert!(ConfigManager::validate_config(&config).is_err());
        config.output.tree_highlight = String::new();
        assert!(ConfigManager::validate_config(&config).is_ok());
    }

    #[test]
    fn test_merge_tables_is_deep() {
        let mut base: toml::Table = "[a]\nx = 1\ny = 2\n".parse().unwrap();
        let overlay: toml::Table = "[a]\ny = 3\n[b]\nz = 4\n".parse().unwrap();
        merge_tables(&mut base, overlay);
        assert_eq!(base["a"]["x"].as_integer(), Some(1));
        assert_eq!(base["a"]["y"].as_integer(), Some(3));
        assert_eq!(base["b"]["z"].as_integer(), Some(4));
    }
}
