//! Top-K-plus-"Other" stacked series, raw or normalized to 100%.
//!
//! Each period ranks its own categories. The layer key list is the union of
//! every period's top K, ordered by total across periods (descending, ties in
//! first-encounter order) with [`OTHER`] always last, so a renderer can
//! assign colours and stacking order once for the whole window.

use crate::aggregate::{
    filter_by_period, filter_by_scope, group_and_sum, normalize_to_percentage, top_n,
};
use crate::models::SeriesPoint;
use co2_model::metric::Metric;
use co2_model::period::Period;
use co2_model::record::Record;
use co2_model::region::RegionScope;
use co2_utils::error::ParseError;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket name for everything outside a period's top K.
pub const OTHER: &str = "Other";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackMode {
    /// Absolute sums.
    #[default]
    Raw,
    /// Each row rescaled to sum to 100.
    Percentage,
}

impl fmt::Display for StackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StackMode::Raw => "raw",
            StackMode::Percentage => "percentage",
        })
    }
}

impl FromStr for StackMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" | "absolute" => Ok(StackMode::Raw),
            "percentage" | "percent" | "%" => Ok(StackMode::Percentage),
            _ => Err(ParseError::UnknownMode(s.to_string())),
        }
    }
}

/// Parameters for [`build_stacked_series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedParams {
    /// One output row per period, in this order.
    pub periods: Vec<Period>,
    pub scope: RegionScope,
    pub metric: Metric,
    pub top_k: usize,
    pub mode: StackMode,
}

/// Category values for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedRow {
    pub period: Period,
    /// The period's top K (rank order), zero-padded from the layer keys up
    /// to K, then [`OTHER`].
    pub category_values: IndexMap<String, f64>,
}

impl StackedRow {
    pub fn total(&self) -> f64 {
        self.category_values.values().sum()
    }

    /// Value for `key`, 0 when the key is not in this row.
    pub fn value(&self, key: &str) -> f64 {
        self.category_values.get(key).copied().unwrap_or(0.0)
    }
}

/// Cumulative `[start, end]` offsets of one key across all rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub key: String,
    pub segments: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedSeries {
    /// Stacking order, shared by every row. [`OTHER`] is last.
    pub keys: Vec<String>,
    pub rows: Vec<StackedRow>,
    pub mode: StackMode,
}

impl StackedSeries {
    /// Stack rows in key order starting from 0. Keys missing from a row
    /// contribute a zero-height segment.
    pub fn layers(&self) -> Vec<Layer> {
        let mut layers: Vec<Layer> = self
            .keys
            .iter()
            .map(|key| Layer {
                key: key.clone(),
                segments: Vec::with_capacity(self.rows.len()),
            })
            .collect();
        for row in &self.rows {
            let mut running = 0.0;
            for layer in layers.iter_mut() {
                let end = running + row.value(&layer.key);
                layer.segments.push([running, end]);
                running = end;
            }
        }
        layers
    }

    /// Largest row total, for sizing the value axis.
    pub fn max_total(&self) -> f64 {
        self.rows.iter().map(StackedRow::total).fold(0.0, f64::max)
    }
}

/// One period's ranking before padding and normalization.
struct RankedPeriod {
    period: Period,
    top: Vec<SeriesPoint>,
    other: f64,
}

fn rank_period(records: &[&Record], period: Period, metric: Metric, top_k: usize) -> RankedPeriod {
    let in_period = filter_by_period(records.iter().copied(), period);
    let groups = group_and_sum(in_period, |r| Some(r.entity.as_str()), |r| r.metric(metric));
    let mut top = Vec::with_capacity(top_k);
    let mut other = 0.0;
    for point in top_n(&groups, groups.len()) {
        // an entity literally named "Other" merges into the bucket
        if top.len() < top_k && point.label != OTHER {
            top.push(point);
        } else {
            other += point.value;
        }
    }
    RankedPeriod { period, top, other }
}

/// Build one top-K-plus-Other row per period.
pub fn build_stacked_series(records: &[Record], params: &StackedParams) -> StackedSeries {
    let scoped = filter_by_scope(records, &params.scope);
    let ranked: Vec<RankedPeriod> = params
        .periods
        .iter()
        .map(|period| rank_period(&scoped, *period, params.metric, params.top_k))
        .collect();

    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for period in &ranked {
        for point in &period.top {
            *totals.entry(point.label.as_str()).or_insert(0.0) += point.value;
        }
    }
    let mut ordered: Vec<(&str, f64)> = totals.into_iter().collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut keys: Vec<String> = ordered.into_iter().map(|(k, _)| k.to_string()).collect();
    if !ranked.is_empty() {
        keys.push(OTHER.to_string());
    }

    let rows: Vec<StackedRow> = ranked
        .iter()
        .map(|period| {
            let mut category_values: IndexMap<String, f64> = period
                .top
                .iter()
                .map(|p| (p.label.clone(), p.value))
                .collect();
            for key in keys.iter().filter(|k| k.as_str() != OTHER) {
                if category_values.len() >= params.top_k {
                    break;
                }
                category_values.entry(key.clone()).or_insert(0.0);
            }
            category_values.insert(OTHER.to_string(), period.other);
            if params.mode == StackMode::Percentage {
                let raw: Vec<f64> = category_values.values().copied().collect();
                let shares = normalize_to_percentage(&raw);
                for (value, share) in category_values.values_mut().zip(shares) {
                    *value = share;
                }
            }
            StackedRow {
                period: period.period,
                category_values,
            }
        })
        .collect();

    debug!(
        "build_stacked_series: {} rows, {} layer keys ({} mode)",
        rows.len(),
        keys.len(),
        params.mode
    );
    StackedSeries {
        keys,
        rows,
        mode: params.mode,
    }
}
