//! One run function per chart family: load, transform, write JSON.

use crate::load::{load_climate, load_records, write_json};
use co2_data::aggregate::{ranked_series, GroupKey, RankParams};
use co2_data::choropleth::{choropleth_totals, ChoroplethParams};
use co2_data::flow::{build_flow_graph, FlowParams, Terminal};
use co2_data::monthly::monthly_series;
use co2_data::paired::{paired_series, PairedParams};
use co2_data::presets::{Chart, ChartData};
use co2_data::ridgeline::{build_ridgeline, climate_sample_groups, GridStyle, RidgelineParams};
use co2_data::stacked::{build_stacked_series, StackMode, StackedParams};
use co2_model::metric::Metric;
use co2_model::period::Period;
use co2_model::region::RegionScope;
use log::info;
use serde::Serialize;

pub fn run_rank(
    data: &str,
    output: Option<&str>,
    period: Option<Period>,
    region: Option<String>,
    metric: Metric,
    group_by: GroupKey,
    top: usize,
) -> anyhow::Result<()> {
    let records = load_records(data)?;
    let params = RankParams {
        period,
        scope: RegionScope::from_selection(region),
        metric,
        group_by,
        n: top,
    };
    let series = ranked_series(&records, &params);
    info!("Ranked {} bars by {} ({})", series.len(), group_by, metric);
    write_json(&series, output)
}

/// Explicit `years` win over `decade`; with neither, every year of the
/// default decade gets a row.
pub fn stacked_periods(years: &[i32], decade: i32) -> anyhow::Result<Vec<Period>> {
    if !years.is_empty() {
        let periods = years
            .iter()
            .map(|year| Period::year(*year))
            .collect::<Result<Vec<Period>, _>>()?;
        return Ok(periods);
    }
    Ok(Period::decade(decade)?.years())
}

#[allow(clippy::too_many_arguments)]
pub fn run_stacked(
    data: &str,
    output: Option<&str>,
    years: &[i32],
    decade: i32,
    region: Option<String>,
    metric: Metric,
    top_k: usize,
    mode: StackMode,
) -> anyhow::Result<()> {
    let records = load_records(data)?;
    let params = StackedParams {
        periods: stacked_periods(years, decade)?,
        scope: RegionScope::from_selection(region),
        metric,
        top_k,
        mode,
    };
    let series = build_stacked_series(&records, &params);
    info!(
        "Stacked {} rows over {} keys ({})",
        series.rows.len(),
        series.keys.len(),
        mode
    );
    write_json(&series, output)
}

pub fn run_flow(
    data: &str,
    output: Option<&str>,
    period: Period,
    top: usize,
    primary: Metric,
) -> anyhow::Result<()> {
    let records = load_records(data)?;
    let params = FlowParams {
        period,
        top_n: top,
        primary,
        secondary: [Terminal::fossil(), Terminal::land_use()],
    };
    let graph = build_flow_graph(&records, &params);
    info!(
        "Flow graph for {}: {} nodes, {} edges",
        period,
        graph.nodes.len(),
        graph.edges.len()
    );
    write_json(&graph, output)
}

pub fn run_choropleth(
    data: &str,
    output: Option<&str>,
    period: Period,
    metric: Metric,
) -> anyhow::Result<()> {
    let records = load_records(data)?;
    let totals = choropleth_totals(&records, &ChoroplethParams { period, metric });
    info!("Choropleth for {}: {} countries", period, totals.entries.len());
    write_json(&totals, output)
}

pub fn run_heatmap(
    data: &str,
    output: Option<&str>,
    period: Period,
    top: usize,
) -> anyhow::Result<()> {
    let records = load_records(data)?;
    let params = PairedParams {
        period,
        scope: RegionScope::All,
        rank_metric: Metric::Annual,
        first: Metric::Annual,
        second: Metric::LandUse,
        n: top,
    };
    let rows = paired_series(&records, &params);
    info!("Heatmap for {}: {} rows", period, rows.len());
    write_json(&rows, output)
}

pub fn run_ridgeline(
    data: &str,
    output: Option<&str>,
    state: &str,
    bandwidth: f64,
    ticks: usize,
    even: bool,
) -> anyhow::Result<()> {
    let table = load_climate(data)?;
    let groups = climate_sample_groups(&table, state);
    if groups.is_empty() {
        anyhow::bail!(
            "No climate data for state '{}'. Available: {}",
            state,
            table.states().join(", ")
        );
    }
    let params = RidgelineParams {
        bandwidth,
        tick_count: ticks,
        grid: if even { GridStyle::Even } else { GridStyle::NiceTicks },
    };
    let ridgeline = build_ridgeline(&groups, &params)?;
    info!(
        "Ridgeline for {}: {} years over {} grid points, peak density {:.4}",
        state,
        ridgeline.rows.len(),
        ridgeline.grid.len(),
        ridgeline.max_peak()
    );
    write_json(&ridgeline, output)
}

pub fn run_monthly(
    data: &str,
    output: Option<&str>,
    state: &str,
    years: &[i32],
) -> anyhow::Result<()> {
    let table = load_climate(data)?;
    let series = monthly_series(&table, state, years);
    if series.years.is_empty() {
        anyhow::bail!(
            "No climate data for state '{}' in years {:?}. Available states: {}",
            state,
            years,
            table.states().join(", ")
        );
    }
    info!(
        "Monthly temperatures for {}: {} years, extent {:?}",
        state,
        series.years.len(),
        series.extent
    );
    write_json(&series, output)
}

#[derive(Serialize)]
struct BuiltChart {
    chart: &'static str,
    #[serde(flatten)]
    data: ChartData,
}

/// Build every chart in `config` (a JSON array of charts), or the default
/// dashboard when no config is given.
pub fn run_charts(data: &str, output: Option<&str>, config: Option<&str>) -> anyhow::Result<()> {
    let charts: Vec<Chart> = match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read chart config {}: {}", path, e))?;
            serde_json::from_str(&text)
                .map_err(|e| anyhow::anyhow!("Failed to parse chart config {}: {}", path, e))?
        }
        None => Chart::defaults(),
    };
    let records = load_records(data)?;
    let built: Vec<BuiltChart> = charts
        .iter()
        .map(|chart| BuiltChart {
            chart: chart.name(),
            data: chart.build(&records),
        })
        .collect();
    info!("Built {} charts", built.len());
    write_json(&built, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;

    const CSV: &str = "Entity,Code,Year,region,Annual CO₂ emissions,Annual CO₂ emissions from land-use change\n\
                       A,AAA,2000,Asia,10,1\n\
                       B,BBB,2000,Asia,30,2\n\
                       C,CCC,2000,Asia,5,3\n\
                       World,OWID_WRL,2000,Unknown,45,6\n";

    fn fixture() -> (tempfile::TempDir, String, String) {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("emissions.csv");
        fs::write(&data, CSV).unwrap();
        let out = dir.path().join("out.json");
        let data = data.to_str().unwrap().to_string();
        let out = out.to_str().unwrap().to_string();
        (dir, data, out)
    }

    fn read_json(path: &str) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_run_rank() {
        let (_dir, data, out) = fixture();
        run_rank(
            &data,
            Some(&out),
            Some(Period::Year(2000)),
            Some("Asia".to_string()),
            Metric::Annual,
            GroupKey::Entity,
            2,
        )
        .unwrap();
        let json = read_json(&out);
        assert_eq!(json[0]["label"], "B");
        assert_eq!(json[0]["value"], 30.0);
        assert_eq!(json[1]["label"], "A");
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_run_stacked_percentage() {
        let (_dir, data, out) = fixture();
        run_stacked(
            &data,
            Some(&out),
            &[2000],
            2000,
            Some("Asia".to_string()),
            Metric::Annual,
            2,
            StackMode::Percentage,
        )
        .unwrap();
        let json = read_json(&out);
        assert_eq!(json["keys"], serde_json::json!(["B", "A", "Other"]));
        assert_eq!(json["rows"][0]["period"], 2000);
        let other = json["rows"][0]["category_values"]["Other"].as_f64().unwrap();
        assert!((other - 100.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_stacked_periods() {
        assert_eq!(
            stacked_periods(&[2001, 2003], 1990).unwrap(),
            vec![Period::Year(2001), Period::Year(2003)]
        );
        assert_eq!(stacked_periods(&[], 1990).unwrap().len(), 10);
        assert!(stacked_periods(&[], 1995).is_err());
        assert!(stacked_periods(&[], 2147483640).is_err());
        assert!(stacked_periods(&[2000, 20001], 1990).is_err());
    }

    #[test]
    fn test_run_flow_and_heatmap() {
        let (_dir, data, out) = fixture();
        run_flow(&data, Some(&out), Period::Year(2000), 1, Metric::Annual).unwrap();
        let json = read_json(&out);
        assert_eq!(json["nodes"][0]["id"], "region-Asia");
        assert_eq!(json["nodes"][1]["id"], "country-B");

        run_heatmap(&data, Some(&out), Period::Year(2000), 1).unwrap();
        let json = read_json(&out);
        assert_eq!(json[0]["label"], "World");
        assert_eq!(json[0]["second"], 6.0);
    }

    #[test]
    fn test_run_choropleth() {
        let (_dir, data, out) = fixture();
        run_choropleth(&data, Some(&out), Period::Decade(2000), Metric::Annual).unwrap();
        let json = read_json(&out);
        assert_eq!(json["entries"].as_array().unwrap().len(), 3);
        assert_eq!(json["max"], 30.0);
    }

    #[test]
    fn test_run_ridgeline() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("climate.json");
        fs::write(
            &data,
            r#"{"arizona":{"2018":{"min":[0,2],"max":[20,30],"mean":[10,15]}}}"#,
        )
        .unwrap();
        let out = dir.path().join("ridgeline.json");
        let (data, out) = (data.to_str().unwrap(), out.to_str().unwrap());

        run_ridgeline(data, Some(out), "arizona", 7.0, 50, true).unwrap();
        let json = read_json(out);
        assert_eq!(json["grid"].as_array().unwrap().len(), 50);
        assert_eq!(json["rows"][0]["label"], "2018");

        let err = run_ridgeline(data, Some(out), "texas", 7.0, 50, false).unwrap_err();
        assert!(err.to_string().contains("arizona"));
        assert!(run_ridgeline(data, Some(out), "arizona", -1.0, 50, false).is_err());
    }

    #[test]
    fn test_run_monthly() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("climate.json");
        fs::write(
            &data,
            r#"{"arizona":{"2018":{"min ":["1","4"],"max ":["28","33"],"mean ":["14","18"]},
                           "2019":{"min":[-3],"max":[30],"mean":[12]}}}"#,
        )
        .unwrap();
        let out = dir.path().join("monthly.json");
        let (data, out) = (data.to_str().unwrap(), out.to_str().unwrap());

        run_monthly(data, Some(out), "arizona", &[2018, 2019]).unwrap();
        let json = read_json(out);
        assert_eq!(json["extent"], serde_json::json!([-3.0, 33.0]));
        assert_eq!(json["years"][0]["year"], 2018);
        assert_eq!(json["years"][1]["mean"][0], 12.0);

        assert!(run_monthly(data, Some(out), "arizona", &[1900]).is_err());
    }

    #[test]
    fn test_run_charts_with_config() {
        let (dir, data, out) = fixture();
        let config = dir.path().join("charts.json");
        fs::write(
            &config,
            r#"[
                { "chart": "choropleth", "period": "2000s", "metric": "annual" },
                { "chart": "heatmap", "period": 2000, "rank_metric": "annual",
                  "first": "annual", "second": "land-use", "n": 2 }
            ]"#,
        )
        .unwrap();
        run_charts(&data, Some(&out), config.to_str()).unwrap();
        let json = read_json(&out);
        assert_eq!(json[0]["chart"], "choropleth");
        assert_eq!(json[0]["shape"], "choropleth");
        assert_eq!(json[1]["chart"], "heatmap");
        assert_eq!(json[1]["data"][0]["label"], "World");
    }

    #[test]
    fn test_run_charts_defaults() {
        let (_dir, data, out) = fixture();
        run_charts(&data, Some(&out), None).unwrap();
        let json = read_json(&out);
        assert_eq!(json.as_array().unwrap().len(), Chart::defaults().len());
    }
}
