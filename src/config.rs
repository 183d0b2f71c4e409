//! Gallery configuration.
//!
//! Handles loading, validating, and layering gallery settings. Stock defaults
//! are overridden by an optional `gallery.toml` in the source directory, which
//! is in turn overridden by command-line flags:
//!
//! ```text
//! stock defaults  →  <source>/gallery.toml  →  --per-row / --gap
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! per_row_count = 4   # Images per row (must be at least 1)
//! gap = 8             # Gap between rows and between images, in pixels
//! ```
//!
//! Unknown keys are ignored, so a `gallery.toml` shared with other tools
//! loads cleanly. Invalid values (zero images per row, negative gap) are
//! rejected rather than coerced.
//!
//! The click callback cannot live in a TOML file; it is carried next to the
//! parsed settings in [`GalleryOptions`].

use crate::dom::Element;
use crate::gallery::GalleryEvent;
use crate::types::ImageDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// File name looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "gallery.toml";

pub const DEFAULT_PER_ROW_COUNT: usize = 4;
pub const DEFAULT_GAP: f64 = 8.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Layout settings loaded from `gallery.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Number of images in each row. The last row may hold fewer.
    pub per_row_count: usize,
    /// Gap between rows and between images within a row, in pixels.
    pub gap: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            per_row_count: DEFAULT_PER_ROW_COUNT,
            gap: DEFAULT_GAP,
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_row_count == 0 {
            return Err(ConfigError::Validation(
                "per_row_count must be at least 1".into(),
            ));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(ConfigError::Validation(format!(
                "gap must be a non-negative number of pixels, got {}",
                self.gap
            )));
        }
        Ok(())
    }

    /// Validated row size.
    pub fn per_row(&self) -> Result<NonZeroUsize, ConfigError> {
        self.validate()?;
        NonZeroUsize::new(self.per_row_count)
            .ok_or_else(|| ConfigError::Validation("per_row_count must be at least 1".into()))
    }

    /// CSS length for the gap, e.g. `8px`.
    pub fn gap_css(&self) -> String {
        format!("{}px", self.gap)
    }
}

/// Invoked with the original descriptor, the rendered `img` element, and the
/// image's index in the full list.
pub type ClickHandler = Rc<dyn Fn(&ImageDescriptor, &Element, usize)>;

/// Everything a [`Gallery`](crate::gallery::Gallery) is constructed with
/// besides the images and the container.
#[derive(Clone, Default)]
pub struct GalleryOptions {
    pub config: GalleryConfig,
    pub on_click: Option<ClickHandler>,
    /// Progress events, in the order they happen.
    pub events: Option<Sender<GalleryEvent>>,
}

impl GalleryOptions {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ImageDescriptor, &Element, usize) + 'static,
    {
        self.on_click = Some(Rc::new(handler));
        self
    }

    pub fn events(mut self, tx: Sender<GalleryEvent>) -> Self {
        self.events = Some(tx);
        self
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    let defaults = GalleryConfig::default();
    let mut table = toml::value::Table::new();
    table.insert(
        "per_row_count".into(),
        toml::Value::Integer(defaults.per_row_count as i64),
    );
    table.insert("gap".into(), toml::Value::Float(defaults.gap));
    toml::Value::Table(table)
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

/// Load `gallery.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `gallery.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Apply overlays in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `gallery.toml` in the given directory.
///
/// Merges user values on top of stock defaults and validates the result.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# row-gal configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Place this file as gallery.toml in the directory passed to --source.
# Command-line flags (--per-row, --gap) override values set here.
# Unknown keys are ignored.

# Number of images in each row. The last row holds the remainder.
# Must be at least 1.
per_row_count = 4

# Gap between rows and between images within a row, in pixels.
# Must be zero or positive.
gap = 8
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = GalleryConfig::default();
        assert_eq!(config.per_row_count, 4);
        assert_eq!(config.gap, 8.0);
        assert_eq!(config.gap_css(), "8px");
    }

    #[test]
    fn parse_partial_config() {
        let config: GalleryConfig = toml::from_str("per_row_count = 3").unwrap();
        assert_eq!(config.per_row_count, 3);
        assert_eq!(config.gap, 8.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: GalleryConfig = toml::from_str(
            r##"
gap = 12.5
lightbox = true
[colors]
background = "#fff"
"##,
        )
        .unwrap();
        assert_eq!(config.gap, 12.5);
        assert_eq!(config.per_row_count, 4);
    }

    #[test]
    fn validate_rejects_zero_per_row() {
        let config = GalleryConfig {
            per_row_count: 0,
            ..GalleryConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        assert!(config.per_row().is_err());
    }

    #[test]
    fn validate_rejects_negative_or_nan_gap() {
        for gap in [-1.0, f64::NAN, f64::INFINITY] {
            let config = GalleryConfig {
                gap,
                ..GalleryConfig::default()
            };
            assert!(config.validate().is_err(), "gap {gap} should be rejected");
        }
    }

    #[test]
    fn zero_gap_is_valid() {
        let config = GalleryConfig {
            gap: 0.0,
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.gap_css(), "0px");
    }

    #[test]
    fn merge_overlay_wins() {
        let overlay: toml::Value = toml::from_str("gap = 2.0").unwrap();
        let merged = merge_toml(stock_defaults_value(), overlay);
        let config: GalleryConfig = merged.try_into().unwrap();
        assert_eq!(config.gap, 2.0);
        assert_eq!(config.per_row_count, 4);
    }

    #[test]
    fn resolve_applies_overlays_in_order() {
        let file: toml::Value = toml::from_str("per_row_count = 3\ngap = 4.0").unwrap();
        let flags: toml::Value = toml::from_str("per_row_count = 6").unwrap();
        let config = resolve_config(stock_defaults_value(), [file, flags]).unwrap();
        assert_eq!(config.per_row_count, 6);
        assert_eq!(config.gap, 4.0);
    }

    #[test]
    fn resolve_validates_result() {
        let overlay: toml::Value = toml::from_str("per_row_count = 0").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "per_row_count = 2\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.per_row_count, 2);
        assert_eq!(config.gap, 8.0);
    }

    #[test]
    fn load_config_reports_bad_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "per_row_count = [").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn options_builder_sets_click_handler() {
        let options = GalleryOptions::default().on_click(|_, _, _| {});
        assert!(options.on_click.is_some());
        assert!(options.events.is_none());
    }
}
