//! Per-country totals keyed by country code, for map fills.

use crate::aggregate::{exclude_unknown_region, filter_by_period, group_and_sum};
use crate::models::{ChoroplethSeries, CodeTotal};
use co2_model::metric::Metric;
use co2_model::period::Period;
use co2_model::record::Record;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethParams {
    pub period: Period,
    pub metric: Metric,
}

/// Sum `params.metric` per country code over `params.period`.
///
/// Records with an unknown region or no code are skipped. Entries keep
/// first-encounter order; a code's display name is the first entity in
/// `records` carrying that code, even if that row falls outside the period.
pub fn choropleth_totals(records: &[Record], params: &ChoroplethParams) -> ChoroplethSeries {
    let mut names: HashMap<&str, &str> = HashMap::new();
    for record in records {
        if let Some(code) = record.code.as_deref() {
            names.entry(code.trim()).or_insert(record.entity.trim());
        }
    }

    let in_period = exclude_unknown_region(filter_by_period(records, params.period));
    let metric = params.metric;
    let groups = group_and_sum(in_period, |r| r.code.as_deref(), |r| r.metric(metric));

    let entries: Vec<CodeTotal> = groups
        .iter()
        .map(|(code, value)| CodeTotal {
            code: code.to_string(),
            name: names.get(code).copied().unwrap_or(code).to_string(),
            value,
        })
        .collect();
    let max = entries.iter().map(|e| e.value).fold(0.0, f64::max);
    debug!(
        "choropleth_totals: {} codes for {} ({}), max {}",
        entries.len(),
        params.period,
        metric,
        max
    );
    ChoroplethSeries { entries, max }
}
