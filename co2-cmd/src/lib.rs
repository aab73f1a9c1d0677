//! Command implementations for the CO2 chart-data CLI.
//!
//! Each subcommand reads an emissions CSV (or the climate JSON), runs one
//! transform and writes the chart-ready result as pretty JSON.

use clap::Subcommand;
use co2_data::aggregate::GroupKey;
use co2_data::presets;
use co2_data::stacked::StackMode;
use co2_model::metric::Metric;
use co2_model::period::Period;

pub mod charts;
pub mod load;

#[derive(Subcommand)]
pub enum Command {
    /// Rank entities, codes or regions by a metric (bar charts)
    Rank {
        /// Emissions CSV, optionally gzipped
        #[arg(short = 'd', long)]
        data: String,

        /// Output JSON path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Year (`2020`) or decade (`2010s`); all years when omitted
        #[arg(short = 'p', long)]
        period: Option<Period>,

        /// Only rank records in this region
        #[arg(short = 'r', long)]
        region: Option<String>,

        #[arg(short = 'm', long, default_value_t = Metric::PerCapita)]
        metric: Metric,

        /// entity, code or region
        #[arg(short = 'g', long, default_value_t = GroupKey::Entity)]
        group_by: GroupKey,

        #[arg(short = 'n', long, default_value_t = presets::BAR_TOP_N)]
        top: usize,
    },

    /// Top-K plus "Other" stacked rows per year
    Stacked {
        #[arg(short = 'd', long)]
        data: String,

        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Comma-separated years; overrides --decade
        #[arg(short = 'y', long, value_delimiter = ',')]
        years: Vec<i32>,

        /// One row per year of this decade
        #[arg(long, default_value_t = presets::STACKED_DECADE)]
        decade: i32,

        /// Region to stack, or `all`
        #[arg(short = 'r', long, default_value = presets::STACKED_REGION)]
        region: Option<String>,

        #[arg(short = 'm', long, default_value_t = Metric::PerCapita)]
        metric: Metric,

        #[arg(short = 'k', long, default_value_t = presets::STACKED_TOP_K)]
        top_k: usize,

        /// raw or percentage
        #[arg(long, default_value_t = StackMode::Raw)]
        mode: StackMode,
    },

    /// Region to country to emission-type flow graph (alluvial chart)
    Flow {
        #[arg(short = 'd', long)]
        data: String,

        #[arg(short = 'o', long)]
        output: Option<String>,

        #[arg(short = 'p', long, default_value_t = Period::Year(presets::ALLUVIAL_YEAR))]
        period: Period,

        #[arg(short = 'n', long, default_value_t = presets::ALLUVIAL_TOP_N)]
        top: usize,

        /// Metric that ranks countries and weights region edges
        #[arg(short = 'm', long, default_value_t = Metric::IncludingLandUse)]
        primary: Metric,
    },

    /// Per-country totals keyed by country code (choropleth maps)
    Choropleth {
        #[arg(short = 'd', long)]
        data: String,

        #[arg(short = 'o', long)]
        output: Option<String>,

        #[arg(short = 'p', long, default_value_t = Period::Decade(presets::CHOROPLETH_DECADE))]
        period: Period,

        /// annual or density
        #[arg(short = 'm', long, default_value_t = Metric::Annual)]
        metric: Metric,
    },

    /// Fossil vs land-use emissions for the top emitters
    Heatmap {
        #[arg(short = 'd', long)]
        data: String,

        #[arg(short = 'o', long)]
        output: Option<String>,

        #[arg(short = 'p', long, default_value_t = Period::Year(presets::HEATMAP_YEAR))]
        period: Period,

        #[arg(short = 'n', long, default_value_t = presets::HEATMAP_TOP_N)]
        top: usize,
    },

    /// Monthly min/max temperature density curves per year for one state
    Ridgeline {
        /// Climate JSON, optionally gzipped
        #[arg(short = 'd', long)]
        data: String,

        #[arg(short = 'o', long)]
        output: Option<String>,

        #[arg(short = 's', long, default_value = presets::RIDGELINE_STATE)]
        state: String,

        #[arg(short = 'b', long, default_value_t = presets::RIDGELINE_BANDWIDTH)]
        bandwidth: f64,

        /// Approximate grid size
        #[arg(short = 't', long, default_value_t = presets::RIDGELINE_TICKS)]
        ticks: usize,

        /// Use exactly --ticks evenly spaced points instead of round ticks
        #[arg(long)]
        even: bool,
    },

    /// Monthly min/max/mean temperatures for selected years (line and radar charts)
    Monthly {
        /// Climate JSON, optionally gzipped
        #[arg(short = 'd', long)]
        data: String,

        #[arg(short = 'o', long)]
        output: Option<String>,

        #[arg(short = 's', long, default_value = presets::RIDGELINE_STATE)]
        state: String,

        /// Comma-separated years
        #[arg(short = 'y', long, value_delimiter = ',', default_values_t = [presets::MONTHLY_YEAR])]
        years: Vec<i32>,
    },

    /// Build a list of charts from a JSON config, or the default dashboard
    Charts {
        #[arg(short = 'd', long)]
        data: String,

        #[arg(short = 'o', long)]
        output: Option<String>,

        /// JSON array of chart definitions
        #[arg(short = 'c', long)]
        config: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Rank {
            data,
            output,
            period,
            region,
            metric,
            group_by,
            top,
        } => charts::run_rank(&data, output.as_deref(), period, region, metric, group_by, top),
        Command::Stacked {
            data,
            output,
            years,
            decade,
            region,
            metric,
            top_k,
            mode,
        } => charts::run_stacked(
            &data,
            output.as_deref(),
            &years,
            decade,
            region,
            metric,
            top_k,
            mode,
        ),
        Command::Flow {
            data,
            output,
            period,
            top,
            primary,
        } => charts::run_flow(&data, output.as_deref(), period, top, primary),
        Command::Choropleth {
            data,
            output,
            period,
            metric,
        } => charts::run_choropleth(&data, output.as_deref(), period, metric),
        Command::Heatmap {
            data,
            output,
            period,
            top,
        } => charts::run_heatmap(&data, output.as_deref(), period, top),
        Command::Ridgeline {
            data,
            output,
            state,
            bandwidth,
            ticks,
            even,
        } => charts::run_ridgeline(&data, output.as_deref(), &state, bandwidth, ticks, even),
        Command::Monthly {
            data,
            output,
            state,
            years,
        } => charts::run_monthly(&data, output.as_deref(), &state, &years),
        Command::Charts {
            data,
            output,
            config,
        } => charts::run_charts(&data, output.as_deref(), config.as_deref()),
    }
}
