//! Chart-ready output structs.
//!
//! All structs derive `Serialize` so they can be handed to a rendering
//! adapter as JSON.

use serde::Serialize;

/// A single labelled bar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        SeriesPoint {
            label: label.into(),
            value,
        }
    }
}

/// Ranked bars, highest value first.
pub type Series = Vec<SeriesPoint>;

/// Two metrics for one entity, as drawn by the fossil vs land-use heatmap.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PairedPoint {
    pub label: String,
    pub first: f64,
    pub second: f64,
}

/// Per-country total for a choropleth map.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CodeTotal {
    /// Country code used to join against map features.
    pub code: String,
    /// Display name: the first entity seen with this code.
    pub name: String,
    pub value: f64,
}

/// Choropleth totals plus the colour-scale ceiling.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChoroplethSeries {
    pub entries: Vec<CodeTotal>,
    /// Largest entry value, 0 when empty.
    pub max: f64,
}
