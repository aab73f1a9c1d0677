//! Monthly temperature tables used by the ridgeline, radar and line charts.
//!
//! The JSON shape is `{ state: { year: { "min": [..], "max": [..], "mean": [..] } } }`
//! with twelve monthly readings per series. Older exports spell the keys with
//! a trailing space (`"min "`) and store readings as strings; both are accepted.

use crate::error::Result;
use co2_utils::numbers::parse_metric;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Monthly minimum, maximum and mean temperatures for one state-year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTemperatures {
    #[serde(alias = "min ", default, deserialize_with = "readings")]
    pub min: Vec<f64>,
    #[serde(alias = "max ", default, deserialize_with = "readings")]
    pub max: Vec<f64>,
    #[serde(alias = "mean ", default, deserialize_with = "readings")]
    pub mean: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Reading {
    Number(f64),
    Text(String),
}

/// Unparseable readings are dropped, not zeroed.
fn readings<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error> {
    let raw: Vec<Option<Reading>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|reading| match reading? {
            Reading::Number(n) => Some(n).filter(|v| v.is_finite()),
            Reading::Text(s) => parse_metric(&s),
        })
        .collect())
}

/// Temperatures keyed by state, then year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClimateTable(pub BTreeMap<String, BTreeMap<i32, MonthlyTemperatures>>);

impl ClimateTable {
    pub fn from_json_str(json: &str) -> Result<ClimateTable> {
        let table: ClimateTable = serde_json::from_str(json)?;
        debug!("loaded climate table with {} states", table.0.len());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ClimateTable> {
        let table: ClimateTable = serde_json::from_reader(reader)?;
        debug!("loaded climate table with {} states", table.0.len());
        Ok(table)
    }

    pub fn states(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Years available for `state`, ascending. Empty for an unknown state.
    pub fn years(&self, state: &str) -> Vec<i32> {
        self.0
            .get(state)
            .map(|years| years.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn monthly(&self, state: &str, year: i32) -> Option<&MonthlyTemperatures> {
        self.0.get(state)?.get(&year)
    }

    /// Lowest monthly minimum and highest monthly maximum over `years`.
    ///
    /// Years missing from the table are ignored; `None` when nothing matches.
    pub fn extent(&self, state: &str, years: &[i32]) -> Option<(f64, f64)> {
        let selected: Vec<&MonthlyTemperatures> = years
            .iter()
            .filter_map(|year| self.monthly(state, *year))
            .collect();
        let low = selected
            .iter()
            .flat_map(|m| m.min.iter().copied())
            .reduce(f64::min)?;
        let high = selected
            .iter()
            .flat_map(|m| m.max.iter().copied())
            .reduce(f64::max)?;
        Some((low, high))
    }
}

#[cfg(test)]
mod tests {
    use super::ClimateTable;

    const JSON: &str = r#"{
        "arizona": {
            "2018": { "min ": ["1.5", "3", "bad"], "max ": [20, 25.5, null], "mean ": ["10", "12"] },
            "2019": { "min": [-2.0, 0.5], "max": [18, 30], "mean": [8, 15] }
        },
        "texas": {
            "2018": { "min": [5], "max": [35], "mean": [20] }
        }
    }"#;

    #[test]
    fn test_parse_lenient_json() {
        let table = ClimateTable::from_json_str(JSON).unwrap();
        assert_eq!(table.states(), vec!["arizona", "texas"]);
        assert_eq!(table.years("arizona"), vec![2018, 2019]);
        let monthly = table.monthly("arizona", 2018).unwrap();
        assert_eq!(monthly.min, vec![1.5, 3.0]);
        assert_eq!(monthly.max, vec![20.0, 25.5]);
        assert_eq!(monthly.mean, vec![10.0, 12.0]);
    }

    #[test]
    fn test_extent() {
        let table = ClimateTable::from_json_str(JSON).unwrap();
        assert_eq!(table.extent("arizona", &[2018]), Some((1.5, 25.5)));
        assert_eq!(table.extent("arizona", &[2018, 2019]), Some((-2.0, 30.0)));
        assert_eq!(table.extent("arizona", &[1850]), None);
        assert_eq!(table.extent("nevada", &[2018]), None);
    }

    #[test]
    fn test_unknown_state() {
        let table = ClimateTable::from_json_str(JSON).unwrap();
        assert!(table.years("nevada").is_empty());
        assert!(table.monthly("nevada", 2018).is_none());
    }
}
