//! Site configuration module.
//!
//! Handles loading, validating, and merging `sitesmith.toml`. Stock defaults
//! are the base layer; the user file overrides them key by key.
//!
//! ## Config File Location
//!
//! `sitesmith.toml` in the working directory, or any path given with
//! `--config`. The file is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! store_dir = "projects"        # Root of the project store
//! route_prefix = "/results"     # Sites are served at <route_prefix>/<project>/
//!
//! [metadata]
//! favicon = "/favicon.svg"      # URL, path, or data: URI (default: none)
//!
//! [metadata.seo]                # Defaults for every page (all optional)
//! title = "My Site"
//! description = "What the site is about"
//! keywords = ["bakery", "bread"]
//! image = "https://example.com/og.png"
//!
//! [metadata.pages."about.html"] # Per-page overrides, merged field by field
//! title = "About"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! route_prefix = "/sites"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::assemble::{DEFAULT_ROUTE_PREFIX, PageMetadata};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "sitesmith.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `sitesmith.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Root directory of the filesystem project store.
    pub store_dir: String,
    /// URL prefix projects are served under. No trailing slash.
    pub route_prefix: String,
    /// Favicon and SEO tags injected into assembled pages.
    pub metadata: PageMetadata,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            store_dir: "projects".to_string(),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            metadata: PageMetadata::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store_dir must not be empty".into(),
            ));
        }
        if !self.route_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "route_prefix must start with '/'".into(),
            ));
        }
        if self.route_prefix.len() > 1 && self.route_prefix.ends_with('/') {
            return Err(ConfigError::Validation(
                "route_prefix must not end with '/'".into(),
            ));
        }
        if let Some(path) = self.metadata.pages.keys().find(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "metadata.pages key {path:?} must name a page path"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `sitesmith.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Sitesmith Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Root directory of the project store. Each project is a subdirectory.
store_dir = "projects"

# URL prefix sites are served under. Assembled pages get
#   <base href="<route_prefix>/<project>/">
# so relative asset links resolve. Must start with "/", no trailing "/".
route_prefix = "/results"

# ---------------------------------------------------------------------------
# Page metadata
# ---------------------------------------------------------------------------
# Injected into the <head> of every assembled page.

[metadata]
# Favicon as a URL, a path, or a data: URI. The link type is derived from
# the data URI media type or the file extension.
# favicon = "/favicon.svg"

[metadata.seo]
# Global defaults. Each adds <title>/<meta> and the matching og: tag.
# title = "My Site"
# description = "What the site is about"
# keywords = ["bakery", "bread"]
# image = "https://example.com/og.png"

# Per-page overrides, keyed by project path. Fields not set here fall back
# to [metadata.seo].
# [metadata.pages."about.html"]
# title = "About us"
"##
}
