//! Transforms from emissions [`Record`](co2_model::record::Record)s to
//! chart-ready series: ranked bars, top-K stacked rows, alluvial flow graphs,
//! choropleth totals, heatmap pairs, monthly temperature lines and ridgeline
//! density curves.
//!
//! Everything here is a pure function of its inputs and never fails on bad
//! data: missing numbers count as 0 and empty input gives empty output.
//!
//! ```rust
//! use co2_data::aggregate::{ranked_series, GroupKey, RankParams};
//! use co2_model::{metric::Metric, period::Period, record::Record, region::RegionScope};
//!
//! let records = vec![
//!     Record::new("A", 2000).with_region("Asia").with_metric(Metric::Annual, 10.0),
//!     Record::new("B", 2000).with_region("Asia").with_metric(Metric::Annual, 30.0),
//!     Record::new("C", 2000).with_region("Asia").with_metric(Metric::Annual, 5.0),
//! ];
//! let params = RankParams {
//!     period: Some(Period::Year(2000)),
//!     scope: RegionScope::All,
//!     metric: Metric::Annual,
//!     group_by: GroupKey::Entity,
//!     n: 2,
//! };
//! let series = ranked_series(&records, &params);
//! assert_eq!(series[0].label, "B");
//! assert_eq!(series[1].value, 10.0);
//! ```

pub mod aggregate;
pub mod choropleth;
pub mod flow;
pub mod grid;
pub mod kde;
pub mod models;
pub mod monthly;
pub mod paired;
pub mod presets;
pub mod ridgeline;
pub mod stacked;
