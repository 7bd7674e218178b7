//! View options: what to show and how to lay it out.
//!
//! Options are plain values held by the presentation layer and can be read
//! from a YAML document:
//!
//! ```yaml
//! display: chords-only
//! layout: paging
//! packing:
//!   min-card-width: 280
//! ```

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

/// Which tokens of a chart are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Titles, annotations, lyrics and chords
    #[default]
    Both,
    /// Chords only
    #[serde(alias = "chords-only")]
    Chords,
    /// Everything except chords
    #[serde(alias = "notes-only")]
    Notes,
}

impl DisplayMode {
    /// Parse a display mode name such as `"both"`, `"chords"` or `"notes-only"`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" => Some(DisplayMode::Both),
            "chords" | "chords-only" => Some(DisplayMode::Chords),
            "notes" | "notes-only" => Some(DisplayMode::Notes),
            _ => None,
        }
    }

    pub fn shows_chords(self) -> bool {
        matches!(self, DisplayMode::Both | DisplayMode::Chords)
    }

    /// Titles, annotations and lyric text
    pub fn shows_notes(self) -> bool {
        matches!(self, DisplayMode::Both | DisplayMode::Notes)
    }
}

/// How sections are arranged on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Fixed-height pages of balanced columns
    #[default]
    Paging,
    /// One full-width column of every section
    Scrolling,
}

impl LayoutMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paging" => Some(LayoutMode::Paging),
            "scrolling" => Some(LayoutMode::Scrolling),
            _ => None,
        }
    }
}

/// Constants of the page packer, in layout units (CSS pixels in the browser).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LayoutConfig {
    pub min_card_width: f64,
    pub max_columns: usize,
    pub line_height: f64,
    pub card_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_card_width: 320.0,
            max_columns: 4,
            line_height: 18.0,
            card_padding: 48.0,
        }
    }
}

/// Everything the presentation layer passes down besides the chart and viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ViewOptions {
    pub display: DisplayMode,
    pub layout: LayoutMode,
    pub packing: LayoutConfig,
}

impl ViewOptions {
    /// Read options from YAML. Missing keys take their defaults; an empty document gives all defaults.
    pub fn from_yaml(source: &str) -> Result<Self, ChartError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: ViewOptions =
            serde_yaml::from_str(source).map_err(|e| ChartError::Config(e.to_string()))?;
        if options.packing.min_card_width <= 0.0 || options.packing.max_columns == 0 {
            return Err(ChartError::Config(
                "min-card-width and max-columns must be positive".to_string(),
            ));
        }
        Ok(options)
    }
}
