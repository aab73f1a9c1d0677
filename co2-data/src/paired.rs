//! Two metrics side by side for the top-ranked entities (heatmap rows).

use crate::aggregate::{filter_by_period, filter_by_scope, group_and_sum, top_n};
use crate::models::PairedPoint;
use co2_model::metric::Metric;
use co2_model::period::Period;
use co2_model::record::Record;
use co2_model::region::RegionScope;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedParams {
    pub period: Period,
    #[serde(default)]
    pub scope: RegionScope,
    /// Orders the rows; usually the same as `first`.
    pub rank_metric: Metric,
    pub first: Metric,
    pub second: Metric,
    pub n: usize,
}

/// Top `params.n` entities by `rank_metric`, each with its summed `first`
/// and `second` metrics over the period.
pub fn paired_series(records: &[Record], params: &PairedParams) -> Vec<PairedPoint> {
    let scoped = filter_by_scope(filter_by_period(records, params.period), &params.scope);
    let rank_metric = params.rank_metric;
    let ranked = top_n(
        &group_and_sum(
            scoped.iter().copied(),
            |r| Some(r.entity.as_str()),
            |r| r.metric(rank_metric),
        ),
        params.n,
    );
    let (first, second) = (params.first, params.second);
    let firsts = group_and_sum(
        scoped.iter().copied(),
        |r| Some(r.entity.as_str()),
        |r| r.metric(first),
    );
    let seconds = group_and_sum(
        scoped.iter().copied(),
        |r| Some(r.entity.as_str()),
        |r| r.metric(second),
    );

    let rows: Vec<PairedPoint> = ranked
        .into_iter()
        .map(|point| PairedPoint {
            first: firsts.get(&point.label).unwrap_or_default(),
            second: seconds.get(&point.label).unwrap_or_default(),
            label: point.label,
        })
        .collect();
    debug!(
        "paired_series: {} rows ranked by {} ({} vs {})",
        rows.len(),
        rank_metric,
        first,
        second
    );
    rows
}
