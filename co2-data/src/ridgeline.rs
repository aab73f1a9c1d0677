//! Ridgeline rows: one density curve per named sample, all on a shared grid.

use crate::grid::{linspace, nice_ticks};
use crate::kde::{kde, peak, DensityCurve, Epanechnikov, KdeError};
use co2_model::climate::ClimateTable;
use log::debug;
use serde::{Deserialize, Serialize};

/// How the shared evaluation grid is laid out over the combined extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridStyle {
    /// Round-numbered ticks, roughly `tick_count` of them.
    #[default]
    NiceTicks,
    /// Exactly `tick_count` evenly spaced points from min to max.
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RidgelineParams {
    pub bandwidth: f64,
    pub tick_count: usize,
    #[serde(default)]
    pub grid: GridStyle,
}

/// Named samples drawn together on one ridgeline row.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup {
    pub label: String,
    pub series: Vec<(String, Vec<f64>)>,
}

impl SampleGroup {
    pub fn new(label: impl Into<String>) -> Self {
        SampleGroup {
            label: label.into(),
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, name: impl Into<String>, sample: Vec<f64>) -> Self {
        self.series.push((name.into(), sample));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCurve {
    pub name: String,
    pub points: DensityCurve,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RidgelineRow {
    pub label: String,
    pub curves: Vec<NamedCurve>,
    /// Highest density across this row's curves; scales the row height.
    pub peak: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ridgeline {
    pub grid: Vec<f64>,
    /// Min and max over every finite observation, `None` when there are none.
    pub extent: Option<(f64, f64)>,
    pub rows: Vec<RidgelineRow>,
}

impl Ridgeline {
    /// Highest peak over all rows.
    pub fn max_peak(&self) -> f64 {
        self.rows.iter().map(|row| row.peak).fold(0.0, f64::max)
    }
}

fn combined_extent(groups: &[SampleGroup]) -> Option<(f64, f64)> {
    groups
        .iter()
        .flat_map(|group| group.series.iter())
        .flat_map(|(_, sample)| sample.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Estimate every series of every group against one grid spanning the
/// combined extent, so rows stay comparable on a single x axis.
///
/// With no finite observations at all the grid is empty and every curve has
/// no points.
pub fn build_ridgeline(groups: &[SampleGroup], params: &RidgelineParams) -> Result<Ridgeline, KdeError> {
    let kernel = Epanechnikov::new(params.bandwidth)?;
    let extent = combined_extent(groups);
    let grid = match (extent, params.grid) {
        (None, _) => Vec::new(),
        (Some((lo, hi)), GridStyle::NiceTicks) => nice_ticks(lo, hi, params.tick_count),
        (Some((lo, hi)), GridStyle::Even) => linspace(lo, hi, params.tick_count),
    };
    let estimator = kde(kernel, grid);

    let rows: Vec<RidgelineRow> = groups
        .iter()
        .map(|group| {
            let curves: Vec<NamedCurve> = group
                .series
                .iter()
                .map(|(name, sample)| NamedCurve {
                    name: name.clone(),
                    points: estimator.estimate(sample),
                })
                .collect();
            let peak = curves.iter().map(|c| peak(&c.points)).fold(0.0, f64::max);
            RidgelineRow {
                label: group.label.clone(),
                curves,
                peak,
            }
        })
        .collect();

    debug!(
        "build_ridgeline: {} rows over {} grid points",
        rows.len(),
        estimator.eval_points().len()
    );
    Ok(Ridgeline {
        grid: estimator.eval_points().to_vec(),
        extent,
        rows,
    })
}

/// One group per year for `state`, ascending, each with `min` and `max`
/// monthly samples. Empty for an unknown state.
pub fn climate_sample_groups(table: &ClimateTable, state: &str) -> Vec<SampleGroup> {
    table
        .years(state)
        .into_iter()
        .filter_map(|year| {
            let monthly = table.monthly(state, year)?;
            Some(
                SampleGroup::new(year.to_string())
                    .with_series("min", monthly.min.clone())
                    .with_series("max", monthly.max.clone()),
            )
        })
        .collect()
}
