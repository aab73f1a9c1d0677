//! Default chart configurations and a single entry point that builds any of
//! them.
//!
//! A [`Chart`] is a chart family plus its parameters. It deserializes from a
//! tagged JSON object, so a dashboard can be described as a list of charts:
//!
//! ```rust
//! use co2_data::presets::Chart;
//!
//! let chart: Chart = serde_json::from_str(
//!     r#"{ "chart": "choropleth", "period": "1990s", "metric": "density" }"#,
//! ).unwrap();
//! assert_eq!(chart.name(), "choropleth");
//! ```

use crate::aggregate::{ranked_series, GroupKey, RankParams};
use crate::choropleth::{choropleth_totals, ChoroplethParams};
use crate::flow::{build_flow_graph, FlowGraph, FlowParams, Terminal};
use crate::models::{ChoroplethSeries, PairedPoint, Series};
use crate::paired::{paired_series, PairedParams};
use crate::ridgeline::{GridStyle, RidgelineParams};
use crate::stacked::{build_stacked_series, StackMode, StackedParams, StackedSeries};
use co2_model::metric::Metric;
use co2_model::period::Period;
use co2_model::record::Record;
use co2_model::region::RegionScope;
use log::info;
use serde::{Deserialize, Serialize};

pub const BAR_YEAR: i32 = 2020;
pub const BAR_TOP_N: usize = 10;

pub const ALLUVIAL_YEAR: i32 = 2020;
pub const ALLUVIAL_TOP_N: usize = 20;

pub const STACKED_DECADE: i32 = 2000;
pub const STACKED_REGION: &str = "Asia";
pub const STACKED_TOP_K: usize = 5;
pub const PERCENTAGE_YEARS: [i32; 3] = [2000, 2001, 2002];

pub const HEATMAP_YEAR: i32 = 1990;
pub const HEATMAP_TOP_N: usize = 10;

pub const CHOROPLETH_DECADE: i32 = 2000;

pub const RIDGELINE_BANDWIDTH: f64 = 7.0;
pub const RIDGELINE_TICKS: usize = 50;
pub const RIDGELINE_STATE: &str = "arizona";

/// Year preselected by the line and radar charts.
pub const MONTHLY_YEAR: i32 = 2018;

pub fn bar_params() -> RankParams {
    RankParams {
        period: Some(Period::Year(BAR_YEAR)),
        scope: RegionScope::All,
        metric: Metric::PerCapita,
        group_by: GroupKey::Entity,
        n: BAR_TOP_N,
    }
}

pub fn heatmap_params() -> PairedParams {
    PairedParams {
        period: Period::Year(HEATMAP_YEAR),
        scope: RegionScope::All,
        rank_metric: Metric::Annual,
        first: Metric::Annual,
        second: Metric::LandUse,
        n: HEATMAP_TOP_N,
    }
}

/// Every year of the default decade, one row each.
pub fn stacked_params() -> StackedParams {
    StackedParams {
        periods: Period::Decade(STACKED_DECADE).years(),
        scope: RegionScope::Only(STACKED_REGION.to_string()),
        metric: Metric::PerCapita,
        top_k: STACKED_TOP_K,
        mode: StackMode::Raw,
    }
}

pub fn percentage_params() -> StackedParams {
    StackedParams {
        periods: PERCENTAGE_YEARS.into_iter().map(Period::Year).collect(),
        scope: RegionScope::Only(STACKED_REGION.to_string()),
        metric: Metric::PerCapita,
        top_k: STACKED_TOP_K,
        mode: StackMode::Percentage,
    }
}

pub fn small_multiples_params() -> StackedParams {
    StackedParams {
        mode: StackMode::Raw,
        ..percentage_params()
    }
}

pub fn alluvial_params() -> FlowParams {
    FlowParams {
        period: Period::Year(ALLUVIAL_YEAR),
        top_n: ALLUVIAL_TOP_N,
        primary: Metric::IncludingLandUse,
        secondary: [Terminal::fossil(), Terminal::land_use()],
    }
}

pub fn choropleth_params() -> ChoroplethParams {
    ChoroplethParams {
        period: Period::Decade(CHOROPLETH_DECADE),
        metric: Metric::Annual,
    }
}

pub fn ridgeline_params() -> RidgelineParams {
    RidgelineParams {
        bandwidth: RIDGELINE_BANDWIDTH,
        tick_count: RIDGELINE_TICKS,
        grid: GridStyle::NiceTicks,
    }
}

/// A record-driven chart and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "kebab-case")]
pub enum Chart {
    VerticalBar(RankParams),
    HorizontalBar(RankParams),
    Heatmap(PairedParams),
    Stacked(StackedParams),
    /// Always built in [`StackMode::Percentage`].
    PercentageStacked(StackedParams),
    SmallMultiples(StackedParams),
    Alluvial(FlowParams),
    Choropleth(ChoroplethParams),
}

/// Output of [`Chart::build`], tagged with its shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "data", rename_all = "kebab-case")]
pub enum ChartData {
    Bars(Series),
    Paired(Vec<PairedPoint>),
    Stacked(StackedSeries),
    Flow(FlowGraph),
    Choropleth(ChoroplethSeries),
}

impl Chart {
    /// The dashboard's record-driven charts with their default settings.
    pub fn defaults() -> Vec<Chart> {
        vec![
            Chart::VerticalBar(bar_params()),
            Chart::HorizontalBar(bar_params()),
            Chart::Heatmap(heatmap_params()),
            Chart::Stacked(stacked_params()),
            Chart::PercentageStacked(percentage_params()),
            Chart::SmallMultiples(small_multiples_params()),
            Chart::Alluvial(alluvial_params()),
            Chart::Choropleth(choropleth_params()),
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Chart::VerticalBar(_) => "vertical-bar",
            Chart::HorizontalBar(_) => "horizontal-bar",
            Chart::Heatmap(_) => "heatmap",
            Chart::Stacked(_) => "stacked",
            Chart::PercentageStacked(_) => "percentage-stacked",
            Chart::SmallMultiples(_) => "small-multiples",
            Chart::Alluvial(_) => "alluvial",
            Chart::Choropleth(_) => "choropleth",
        }
    }

    pub fn build(&self, records: &[Record]) -> ChartData {
        info!("building {} chart from {} records", self.name(), records.len());
        match self {
            Chart::VerticalBar(params) | Chart::HorizontalBar(params) => {
                ChartData::Bars(ranked_series(records, params))
            }
            Chart::Heatmap(params) => ChartData::Paired(paired_series(records, params)),
            Chart::Stacked(params) | Chart::SmallMultiples(params) => {
                ChartData::Stacked(build_stacked_series(records, params))
            }
            Chart::PercentageStacked(params) => {
                let params = StackedParams {
                    mode: StackMode::Percentage,
                    ..params.clone()
                };
                ChartData::Stacked(build_stacked_series(records, &params))
            }
            Chart::Alluvial(params) => ChartData::Flow(build_flow_graph(records, params)),
            Chart::Choropleth(params) => ChartData::Choropleth(choropleth_totals(records, params)),
        }
    }
}
