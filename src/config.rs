//! bhugo configuration.
//!
//! Settings are layered, lowest priority first:
//!
//! 1. stock defaults ([`Config::default`]),
//! 2. a TOML file (`bhugo.toml` in the working directory, or `--config`),
//! 3. [`Overrides`]: command-line flags, or the matching `BHUGO_*`
//!    environment variables, which may come from a `.bhugo` dotenv file
//!    loaded at startup.
//!
//! Each layer is a sparse `toml::Value` merged onto the one below with
//! [`merge_toml`]; the result is deserialized and validated once.
//!
//! ## Configuration Options
//!
//! ```toml
//! interval_ms = 1000          # How often to poll Bear
//! database = "/path/to/database.sqlite"
//! note_tag = "blog"           # Notes tagged #blog are published
//!
//! [hugo]
//! dir = "/path/to/site"
//! content_dir = "content/blog"
//! image_dir = "/img/posts"
//!
//! [taxonomy]
//! categories = true           # Bear tags → categories: [...]
//! tags = false                # Bear tags → tags: [...]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use clap::Args;
use clap::builder::BoolishValueParser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "bhugo.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid override: {0}")]
    Override(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Milliseconds between two polls of the Bear database.
    pub interval_ms: u64,
    /// Path to Bear's `database.sqlite`.
    pub database: String,
    /// Root tag of published notes, without the `#`.
    pub note_tag: String,
    /// Where posts are written.
    pub hugo: HugoConfig,
    /// Which front matter lists receive the note's tags.
    pub taxonomy: TaxonomyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            database: String::new(),
            note_tag: "blog".to_string(),
            hugo: HugoConfig::default(),
            taxonomy: TaxonomyConfig::default(),
        }
    }
}

impl Config {
    /// Validate required values and ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "interval_ms must be greater than 0".into(),
            ));
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::Validation("database is required".into()));
        }
        if self.hugo.dir.trim().is_empty() {
            return Err(ConfigError::Validation("hugo.dir is required".into()));
        }
        if self.note_tag.is_empty()
            || self.note_tag.contains('#')
            || self.note_tag.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Validation(
                "note_tag must be a single tag name without '#'".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// The text a note must contain to be published, e.g. `#blog`.
    pub fn tag_marker(&self) -> String {
        format!("#{}", self.note_tag)
    }

    /// Directory posts are written to.
    pub fn content_path(&self) -> PathBuf {
        Path::new(&self.hugo.dir).join(&self.hugo.content_dir)
    }
}

/// Hugo site layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HugoConfig {
    /// Hugo site root.
    pub dir: String,
    /// Post directory, relative to the site root.
    pub content_dir: String,
    /// URL path images are served from.
    pub image_dir: String,
}

impl Default for HugoConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            content_dir: "content/blog".to_string(),
            image_dir: "/img/posts".to_string(),
        }
    }
}

/// Front matter lists filled from Bear tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxonomyConfig {
    pub categories: bool,
    pub tags: bool,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            categories: true,
            tags: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Command-line and `BHUGO_*` environment overrides, the top config layer.
///
/// Flattened into the CLI; clap reads each value from its flag or, failing
/// that, from its environment variable. Unset values are left out of the
/// overlay so lower layers show through.
#[derive(Args, Debug, Clone, Default, Serialize)]
pub struct Overrides {
    /// Milliseconds between two polls of the Bear database
    #[arg(long, env = "BHUGO_INTERVAL_MS", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    /// Path to Bear's database.sqlite
    #[arg(long, env = "BHUGO_DATABASE", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Root tag of published notes, without the '#'
    #[arg(long, env = "BHUGO_NOTE_TAG", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_tag: Option<String>,

    #[command(flatten)]
    pub hugo: HugoOverrides,

    #[command(flatten)]
    pub taxonomy: TaxonomyOverrides,
}

#[derive(Args, Debug, Clone, Default, Serialize)]
pub struct HugoOverrides {
    /// Hugo site root
    #[arg(long = "hugo-dir", env = "BHUGO_HUGO_DIR", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Post directory, relative to the site root
    #[arg(long, env = "BHUGO_CONTENT_DIR", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_dir: Option<String>,

    /// URL path images are served from
    #[arg(long, env = "BHUGO_IMAGE_DIR", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_dir: Option<String>,
}

#[derive(Args, Debug, Clone, Default, Serialize)]
pub struct TaxonomyOverrides {
    /// Write the note's tags as `categories: [...]`
    #[arg(long, env = "BHUGO_CATEGORIES", global = true, value_parser = BoolishValueParser::new())]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<bool>,

    /// Write the note's tags as `tags: [...]`
    #[arg(long, env = "BHUGO_TAGS", global = true, value_parser = BoolishValueParser::new())]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<bool>,
}

impl Overrides {
    /// The set values as a sparse `toml::Value` layer.
    pub fn to_layer(&self) -> Result<toml::Value, ConfigError> {
        Ok(toml::Value::try_from(self)?)
    }
}

/// Variables read by earlier bhugo releases, paired with their replacement.
pub const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("INTERVAL", "BHUGO_INTERVAL_MS"),
    ("DATABASE", "BHUGO_DATABASE"),
    ("NOTE_TAG", "BHUGO_NOTE_TAG"),
    ("HUGO_DIR", "BHUGO_HUGO_DIR"),
    ("CONTENT_DIR", "BHUGO_CONTENT_DIR"),
    ("IMAGE_DIR", "BHUGO_IMAGE_DIR"),
    ("CATEGORIES", "BHUGO_CATEGORIES"),
    ("TAGS", "BHUGO_TAGS"),
];

/// Legacy variables that are set (per `is_set`) and therefore ignored.
pub fn legacy_env_vars(is_set: impl Fn(&str) -> bool) -> Vec<(&'static str, &'static str)> {
    LEGACY_ENV_VARS
        .iter()
        .copied()
        .filter(|&(legacy, _)| is_set(legacy))
        .collect()
}

/// Merge the layers, then deserialize and validate.
pub fn resolve_config(layers: Vec<toml::Value>) -> Result<Config, ConfigError> {
    let merged = layers.into_iter().fold(stock_defaults_value(), merge_toml);
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path` (or [`DEFAULT_CONFIG_FILE`]) with `overrides`
/// on top.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let mut layers = Vec::new();
    if let Some(file) = load_raw_config(path)? {
        layers.push(file);
    }
    layers.push(overrides.to_layer()?);
    resolve_config(layers)
}

/// Returns a fully-commented stock `bhugo.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bhugo Configuration
# ===================
# Values shown below are the defaults, except for the two required paths.
# Every key can also be set from the environment (or a .bhugo dotenv file):
#   BHUGO_INTERVAL_MS, BHUGO_DATABASE, BHUGO_NOTE_TAG, BHUGO_HUGO_DIR,
#   BHUGO_CONTENT_DIR, BHUGO_IMAGE_DIR, BHUGO_CATEGORIES, BHUGO_TAGS
# or the matching flag (--interval-ms, --database, --hugo-dir, ...).
# Flags and environment values win over this file.
#
# The unprefixed names read by earlier bhugo releases (INTERVAL=1s,
# DATABASE, HUGO_DIR, ...) are no longer read; bhugo warns when it sees one.
# Unknown keys will cause an error.

# Milliseconds between two polls of the Bear database.
interval_ms = 1000

# Bear's database (required). On macOS it usually lives at
# ~/Library/Group Containers/9K33E3U3T4.net.shinyfrog.bear/Application Data/database.sqlite
database = ""

# Notes containing #<note_tag> are published. Nested tags such as
# #blog/rust become the "Rust" category.
note_tag = "blog"

# ---------------------------------------------------------------------------
# Hugo site
# ---------------------------------------------------------------------------
[hugo]
# Site root (required).
dir = ""

# Where posts are written, relative to the site root.
content_dir = "content/blog"

# URL path Bear images are linked from. Copy the images there yourself.
image_dir = "/img/posts"

# ---------------------------------------------------------------------------
# Front matter
# ---------------------------------------------------------------------------
[taxonomy]
# Write the note's tags as `categories: [...]`.
categories = true

# Write the note's tags as `tags: [...]`.
tags = false
"##
}
