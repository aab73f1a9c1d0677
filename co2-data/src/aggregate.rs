//! Filter, group and rank records into a [`Series`].
//!
//! Every function here is total: empty input gives empty output, and a
//! record whose metric is missing or non-numeric contributes 0 to its group
//! while still counting as a member of it.

use crate::models::{Series, SeriesPoint};
use co2_model::metric::Metric;
use co2_model::period::Period;
use co2_model::record::Record;
use co2_model::region::RegionScope;
use co2_utils::error::ParseError;
use co2_utils::numbers::{coerce, percentage};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keep records inside `period`, in input order.
pub fn filter_by_period<'a, I>(records: I, period: Period) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| period.contains(record.year))
        .collect()
}

/// Drop records with a missing or `Unknown` region, in input order.
pub fn exclude_unknown_region<'a, I>(records: I) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| record.has_known_region())
        .collect()
}

/// Keep records admitted by `scope`, in input order.
pub fn filter_by_scope<'a, I>(records: I, scope: &RegionScope) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| scope.admits(record.region.as_deref()))
        .collect()
}

/// Summed values per group key.
///
/// Iteration follows first-encounter order, which is what breaks ties in
/// [`top_n`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Groups(IndexMap<String, f64>);

impl Groups {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of every group.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

/// Group records by `key_fn` and sum `metric_fn` per group.
///
/// Records whose key is missing or blank are discarded.
pub fn group_and_sum<'a, I, K, M>(records: I, key_fn: K, metric_fn: M) -> Groups
where
    I: IntoIterator<Item = &'a Record>,
    K: Fn(&'a Record) -> Option<&'a str>,
    M: Fn(&'a Record) -> f64,
{
    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let Some(key) = key_fn(record).map(str::trim).filter(|k| !k.is_empty()) else {
            continue;
        };
        let value = coerce(Some(metric_fn(record)));
        *groups.entry(key.to_string()).or_insert(0.0) += value;
    }
    Groups(groups)
}

/// The `n` largest groups, descending. Equal values keep first-encounter order.
pub fn top_n(groups: &Groups, n: usize) -> Series {
    let mut entries: Vec<SeriesPoint> = groups
        .iter()
        .map(|(label, value)| SeriesPoint::new(label, value))
        .collect();
    // stable: ties stay in encounter order
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries.truncate(n);
    entries
}

/// Total of `metric` over `records`.
pub fn sum_field<'a, I>(records: I, metric: Metric) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(|record| record.metric(metric)).sum()
}

/// Rescale `values` to percentages of their sum. A zero sum gives all zeros.
pub fn normalize_to_percentage(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    values.iter().map(|v| percentage(*v, total)).collect()
}

/// The record field series are grouped by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKey {
    #[default]
    Entity,
    Code,
    Region,
}

impl GroupKey {
    pub fn key<'a>(&self, record: &'a Record) -> Option<&'a str> {
        match self {
            GroupKey::Entity => Some(record.entity.as_str()),
            GroupKey::Code => record.code.as_deref(),
            GroupKey::Region => record.region.as_deref(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupKey::Entity => "entity",
            GroupKey::Code => "code",
            GroupKey::Region => "region",
        })
    }
}

impl FromStr for GroupKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entity" | "country" => Ok(GroupKey::Entity),
            "code" => Ok(GroupKey::Code),
            "region" | "continent" => Ok(GroupKey::Region),
            _ => Err(ParseError::UnknownGroupKey(s.to_string())),
        }
    }
}

/// Parameters for [`ranked_series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankParams {
    /// `None` ranks over every year.
    pub period: Option<Period>,
    pub scope: RegionScope,
    pub metric: Metric,
    pub group_by: GroupKey,
    pub n: usize,
}

/// Filter, group, sum and rank `records` into the top `params.n` bars.
///
/// Grouping by region always drops records with an unknown region.
pub fn ranked_series(records: &[Record], params: &RankParams) -> Series {
    let in_period = match params.period {
        Some(period) => filter_by_period(records, period),
        None => records.iter().collect(),
    };
    let scope = match (&params.scope, params.group_by) {
        (RegionScope::All, GroupKey::Region) => RegionScope::Known,
        (scope, _) => scope.clone(),
    };
    let scoped = filter_by_scope(in_period, &scope);
    let group_by = params.group_by;
    let metric = params.metric;
    let groups = group_and_sum(scoped, |r| group_by.key(r), |r| r.metric(metric));
    let series = top_n(&groups, params.n);
    debug!(
        "ranked_series: {} groups -> {} bars ({} by {})",
        groups.len(),
        series.len(),
        metric,
        group_by
    );
    series
}
