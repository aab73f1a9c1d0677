//! Monthly temperature series for the line and radar charts.

use co2_model::climate::{ClimateTable, MonthlyTemperatures};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyYear {
    pub year: i32,
    #[serde(flatten)]
    pub temperatures: MonthlyTemperatures,
}

/// Selected years for one state plus the shared temperature scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub state: String,
    /// Lowest monthly minimum and highest monthly maximum over the selected
    /// years; `None` when none of them has data.
    pub extent: Option<(f64, f64)>,
    pub years: Vec<MonthlyYear>,
}

/// Monthly readings for `years` of `state`, in the order given. Years
/// missing from the table are skipped.
pub fn monthly_series(table: &ClimateTable, state: &str, years: &[i32]) -> MonthlySeries {
    let selected: Vec<MonthlyYear> = years
        .iter()
        .filter_map(|year| {
            table.monthly(state, *year).map(|temperatures| MonthlyYear {
                year: *year,
                temperatures: temperatures.clone(),
            })
        })
        .collect();
    let extent = table.extent(state, years);
    debug!(
        "monthly_series: {} of {} years for {}",
        selected.len(),
        years.len(),
        state
    );
    MonthlySeries {
        state: state.to_string(),
        extent,
        years: selected,
    }
}
